/// A decoded CHIP-8 instruction. Register operands are indices 0x0-0xf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    Cls,
    /// 00EE
    Ret,
    /// 1nnn
    Jp(u16),
    /// 2nnn
    Call(u16),
    /// 3xkk
    SeImm(usize, u8),
    /// 4xkk
    SneImm(usize, u8),
    /// 5xy0
    SeReg(usize, usize),
    /// 6xkk
    LdImm(usize, u8),
    /// 7xkk
    AddImm(usize, u8),
    /// 8xy0
    LdReg(usize, usize),
    /// 8xy1
    Or(usize, usize),
    /// 8xy2
    And(usize, usize),
    /// 8xy3
    Xor(usize, usize),
    /// 8xy4
    AddReg(usize, usize),
    /// 8xy5
    Sub(usize, usize),
    /// 8xy6
    Shr(usize, usize),
    /// 8xy7
    Subn(usize, usize),
    /// 8xyE
    Shl(usize, usize),
    /// 9xy0
    SneReg(usize, usize),
    /// Annn
    LdI(u16),
    /// Bnnn
    JpV0(u16),
    /// Cxkk
    Rnd(usize, u8),
    /// Dxyn
    Drw(usize, usize, u8),
    /// Ex9E
    Skp(usize),
    /// ExA1
    Sknp(usize),
    /// Fx07
    LdFromDelay(usize),
    /// Fx0A
    WaitKey(usize),
    /// Fx15
    LdDelay(usize),
    /// Fx18
    LdSound(usize),
    /// Fx1E
    AddI(usize),
    /// Fx29
    LdGlyph(usize),
    /// Fx33
    Bcd(usize),
    /// Fx55
    Store(usize),
    /// Fx65
    Load(usize),
}

impl Instruction {
    /// decode a 16-bit opcode; None for anything outside the instruction set
    pub fn decode(opcode: u16) -> Option<Instruction> {
        use Instruction::*;

        let nnn = opcode & 0x0fff;
        let kk = (opcode & 0x00ff) as u8;
        let n = (opcode & 0x000f) as u8;
        let x = ((opcode >> 8) & 0xf) as usize;
        let y = ((opcode >> 4) & 0xf) as usize;

        let instruction = match opcode >> 12 {
            0x0 => match opcode {
                0x00e0 => Cls,
                0x00ee => Ret,
                _ => return None,
            },
            0x1 => Jp(nnn),
            0x2 => Call(nnn),
            0x3 => SeImm(x, kk),
            0x4 => SneImm(x, kk),
            0x5 if n == 0 => SeReg(x, y),
            0x6 => LdImm(x, kk),
            0x7 => AddImm(x, kk),
            0x8 => match n {
                0x0 => LdReg(x, y),
                0x1 => Or(x, y),
                0x2 => And(x, y),
                0x3 => Xor(x, y),
                0x4 => AddReg(x, y),
                0x5 => Sub(x, y),
                0x6 => Shr(x, y),
                0x7 => Subn(x, y),
                0xe => Shl(x, y),
                _ => return None,
            },
            0x9 if n == 0 => SneReg(x, y),
            0xa => LdI(nnn),
            0xb => JpV0(nnn),
            0xc => Rnd(x, kk),
            0xd => Drw(x, y, n),
            0xe => match kk {
                0x9e => Skp(x),
                0xa1 => Sknp(x),
                _ => return None,
            },
            0xf => match kk {
                0x07 => LdFromDelay(x),
                0x0a => WaitKey(x),
                0x15 => LdDelay(x),
                0x18 => LdSound(x),
                0x1e => AddI(x),
                0x29 => LdGlyph(x),
                0x33 => Bcd(x),
                0x55 => Store(x),
                0x65 => Load(x),
                _ => return None,
            },
            _ => return None,
        };
        Some(instruction)
    }
}
