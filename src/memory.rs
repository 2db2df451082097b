use crate::error::Error;
use std::io;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Represents the memory map seen by the interpreter
pub trait MemoryMap {
    /// write a chunk of bytes into "RAM"
    fn write(&mut self, data: &[u8], addr: u16) -> Result<(), Error> {
        self.get_rw_slice(addr, data.len())?.copy_from_slice(data);
        Ok(())
    }

    /// get a single byte
    fn get_byte(&self, addr: u16) -> Result<u8, Error> {
        Ok(self.get_ro_slice(addr, 1)?[0])
    }

    /// get a big-endian two-byte word (instructions)
    fn get_word(&self, addr: u16) -> Result<u16, Error> {
        let word = self.get_ro_slice(addr, 2)?;
        Ok(u16::from_be_bytes([word[0], word[1]]))
    }

    /// get a r/w slice of the underlying memory
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], Error>;

    /// get a r/o slice of the underlying memory
    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], Error>;
}

/// Defines the CHIP-8 memory map:
///   0x0000-0x01ff  interpreter (font lives at 0x050)
///   0x0200-0x0fff  program
///
/// Nothing is write-protected; programs are free to scribble over the font.
pub struct Chip8MemoryMap {
    bytes: Box<[u8]>,
    pub program_addr: u16,
    pub font_addr: u16,
}

impl MemoryMap for Chip8MemoryMap {
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], Error> {
        let range = checked_range(addr, len)?;
        Ok(&mut self.bytes[range])
    }

    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], Error> {
        let range = checked_range(addr, len)?;
        Ok(&self.bytes[range])
    }
}

fn checked_range(addr: u16, len: usize) -> Result<std::ops::Range<usize>, Error> {
    let a = addr as usize;
    match a.checked_add(len) {
        Some(end) if end <= MEMORY_SIZE => Ok(a..end),
        _ => Err(Error::MemoryOutOfBounds { addr, len }),
    }
}

/// how much RAM we have
pub const MEMORY_SIZE: usize = 4096;

/// addresses wrap into this mask
pub const ADDRESS_MASK: u16 = (MEMORY_SIZE - 1) as u16;

/// where the program is loaded
pub const PROGRAM_ORIGIN: u16 = 0x0200;

/// where the hex font is baked in
pub const FONT_ADDR: u16 = 0x050;

/// bytes per font glyph
pub const FONT_GLYPH_BYTES: u16 = 5;

impl Chip8MemoryMap {
    /// initialises memory with the font baked in and everything else zeroed
    pub fn new() -> Self {
        let mut bytes = vec![0u8; MEMORY_SIZE].into_boxed_slice();
        let font = FONT_ADDR as usize;
        bytes[font..font + CHIP8_FONT.len()].copy_from_slice(&CHIP8_FONT);
        Chip8MemoryMap {
            bytes,
            program_addr: PROGRAM_ORIGIN,
            font_addr: FONT_ADDR,
        }
    }

    /// how many bytes a program may occupy
    pub fn program_capacity(&self) -> usize {
        MEMORY_SIZE - self.program_addr as usize
    }

    /// load a CHIP-8 program at 0x200; refuses (without writing anything) if
    /// it won't fit
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Error> {
        if program.len() > self.program_capacity() {
            return Err(Error::ProgramTooLarge {
                len: program.len(),
                capacity: self.program_capacity(),
            });
        }
        self.write(program, self.program_addr)
    }

    /// read a program of unknown length and load it
    pub fn load_program_from(&mut self, reader: &mut impl io::Read) -> Result<(), Error> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        self.load_program(&buf)
    }

    /// address of the glyph for hex digit `digit` (upper nibble ignored)
    pub fn glyph_addr(&self, digit: u8) -> u16 {
        self.font_addr + (digit & 0xf) as u16 * FONT_GLYPH_BYTES
    }

    /// whole of memory, for debug views
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_zeroed() {
        let m = Chip8MemoryMap::new();
        // NB. memory is zeroed from 0x200 because before that we bake in the font
        assert_eq!(m.bytes[0x200..], [0; 0xe00]);
    }

    #[test]
    fn test_font_baked_in() -> Result<(), Error> {
        let m = Chip8MemoryMap::new();
        assert_eq!(m.get_ro_slice(m.glyph_addr(0), 5)?, &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(m.get_ro_slice(m.glyph_addr(0xf), 5)?, &[0xF0, 0x80, 0xF0, 0x80, 0x80]);
        assert_eq!(m.glyph_addr(0x1a), m.glyph_addr(0xa));
        Ok(())
    }

    #[test]
    fn test_write_slice_ok() -> Result<(), Error> {
        let mut dst = Chip8MemoryMap::new();
        dst.write(&[0, 1, 2, 3, 4, 5, 6, 7], 0x208)?;
        assert_eq!(
            dst.bytes[0x200..0x210],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7]
        );
        Ok(())
    }

    #[test]
    fn test_read_word() -> Result<(), Error> {
        let mut m = Chip8MemoryMap::new();
        m.write(&[0, 1, 2, 3, 4, 5, 6, 7], 0x300)?;
        assert_eq!(m.get_word(0x304)?, 0x0405);
        Ok(())
    }

    #[test]
    fn test_read_too_much_fails() {
        let m = Chip8MemoryMap::new();
        assert!(matches!(
            m.get_ro_slice(4089, 8),
            Err(Error::MemoryOutOfBounds { addr: 4089, len: 8 })
        ));
        assert!(m.get_word(0xfff).is_err());
        assert!(m.get_ro_slice(0xff8, 8).is_ok());
    }

    #[test]
    fn test_program_load_ok() -> Result<(), Error> {
        let mut dst = Chip8MemoryMap::new();
        let mut prog: &[u8] = &[0x00, 0xe0]; // clear screen
        dst.load_program_from(&mut prog)?;
        assert_eq!(dst.get_ro_slice(0x200, 2)?, &[0x00, 0xe0]);
        Ok(())
    }

    #[test]
    fn test_program_fills_memory_exactly() -> Result<(), Error> {
        let mut dst = Chip8MemoryMap::new();
        dst.load_program(&[0xaa; 0xe00])?;
        assert_eq!(dst.get_byte(0xfff)?, 0xaa);
        Ok(())
    }

    #[test]
    fn test_oversized_program_writes_nothing() {
        let mut dst = Chip8MemoryMap::new();
        let result = dst.load_program(&[0xaa; 0xe01]);
        assert!(matches!(
            result,
            Err(Error::ProgramTooLarge { len: 0xe01, capacity: 0xe00 })
        ));
        assert_eq!(dst.bytes[0x200..], [0; 0xe00]);
    }
}
