//! # interpreter
//!
//! The CHIP-8 machine proper: V0-VF, I, the program counter, a 16-deep call
//! stack and the two 60Hz timers, plus the memory map. Everything the program
//! can see of the outside world goes through a `Display` and an `Input`.
//!
//! One call to `step` runs exactly one instruction. The only instruction that
//! can't finish immediately is Fx0A (wait for key); it parks the machine in
//! `State::AwaitingKey` and each later `step` polls the input once until a key
//! turns up. Timers are ticked separately by `decay_timers`, so the host is
//! free to run instructions at whatever rate it likes.

use crate::config::{Config, PcOverflow};
use crate::debug::Snapshot;
use crate::display::Display;
use crate::error::Error;
use crate::input::Input;
use crate::instruction::Instruction;
use crate::memory::{self, MemoryMap, ADDRESS_MASK, MEMORY_SIZE, PROGRAM_ORIGIN};
use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;

/// how many return addresses fit on the call stack
pub const STACK_DEPTH: usize = 16;

/// VF doubles as the carry/borrow/shift/collision flag
pub const FLAG: usize = 0xf;

/// what the machine is doing between steps
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Running,
    /// Fx0A is waiting for a key press to land in V`register`
    AwaitingKey { register: usize },
}

/// what a single call to `step` did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Executed(Instruction),
    /// not an instruction we know; skipped over
    UnknownOpcode(u16),
    /// still waiting on Fx0A, nothing happened
    AwaitingKey,
    /// the key Fx0A was waiting for arrived
    KeyReceived(u8),
}

pub struct Chip8Interpreter<D: Display, I: Input> {
    memory: memory::Chip8MemoryMap,
    display: D,
    input: I,
    config: Config,
    rng: StdRng,
    v: [u8; 16],
    i: u16,
    program_counter: u16,
    stack: [u16; STACK_DEPTH],
    stack_pointer: usize,
    delay_timer: u8,
    sound_timer: u8,
    state: State,
}

impl<D: Display, I: Input> Chip8Interpreter<D, I> {
    pub fn new(display: D, input: I, config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Chip8Interpreter {
            memory: memory::Chip8MemoryMap::new(),
            display,
            input,
            config,
            rng,
            v: [0; 16],
            i: 0,
            program_counter: PROGRAM_ORIGIN,
            stack: [0; STACK_DEPTH],
            stack_pointer: 0,
            delay_timer: 0,
            sound_timer: 0,
            state: State::Running,
        }
    }

    /// back to power-on register state; memory (and so the program) is kept
    pub fn reset(&mut self) {
        self.v = [0; 16];
        self.i = 0;
        self.program_counter = self.memory.program_addr;
        self.stack = [0; STACK_DEPTH];
        self.stack_pointer = 0;
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.state = State::Running;
        self.display.clear();
        debug!("machine reset");
    }

    /// load a chip8 program at the program origin
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Error> {
        self.memory.load_program(program)?;
        debug!("loaded {} byte program", program.len());
        Ok(())
    }

    /// load a chip8 program of unknown length, e.g. from a file
    pub fn load_program_from(&mut self, reader: &mut impl io::Read) -> Result<(), Error> {
        self.memory.load_program_from(reader)?;
        debug!("loaded program from reader");
        Ok(())
    }

    /// tick both timers down towards zero; call at 60Hz
    pub fn decay_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    /// the buzzer sounds while the sound timer is non-zero
    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    /// run one instruction, or poll for the key Fx0A is waiting on
    pub fn step(&mut self) -> Result<Step, Error> {
        if let State::AwaitingKey { register } = self.state {
            return match self.input.next_key_press()? {
                Some(key) => {
                    let key = key & 0xf;
                    self.v[register] = key;
                    self.state = State::Running;
                    debug!("key {:x} -> V{:X}", key, register);
                    Ok(Step::KeyReceived(key))
                }
                None => Ok(Step::AwaitingKey),
            };
        }

        let pc = self.fetch_addr()?;
        let opcode = self.memory.get_word(pc)?;
        match Instruction::decode(opcode) {
            Some(instruction) => {
                trace!("{:03x}: {:04x} {:?}", pc, opcode, instruction);
                self.execute(pc, instruction)?;
                Ok(Step::Executed(instruction))
            }
            None => {
                warn!("{:03x}: unknown opcode {:04x}, skipping", pc, opcode);
                self.program_counter = pc.wrapping_add(2);
                Ok(Step::UnknownOpcode(opcode))
            }
        }
    }

    /// where the next instruction comes from, applying the overflow policy
    fn fetch_addr(&mut self) -> Result<u16, Error> {
        let pc = self.program_counter;
        if (pc as usize) + 2 <= MEMORY_SIZE {
            return Ok(pc);
        }
        match self.config.pc_overflow {
            PcOverflow::Wrap => {
                debug!("pc {:#06x} wrapped to program origin", pc);
                self.program_counter = self.memory.program_addr;
                Ok(self.program_counter)
            }
            PcOverflow::Fault => Err(Error::PcOutOfBounds(pc)),
        }
    }

    /// Carry out one decoded instruction fetched from `pc`. Every fallible
    /// check happens before any state changes, so a failed instruction leaves
    /// the machine exactly as it found it.
    fn execute(&mut self, pc: u16, instruction: Instruction) -> Result<(), Error> {
        use Instruction::*;

        let next = pc.wrapping_add(2);
        let skip = pc.wrapping_add(4);
        let mut new_pc = next;

        match instruction {
            Cls => self.display.clear(),
            Ret => {
                if self.stack_pointer == 0 {
                    return Err(Error::StackUnderflow { pc });
                }
                self.stack_pointer -= 1;
                new_pc = self.stack[self.stack_pointer];
            }
            Jp(nnn) => new_pc = nnn,
            Call(nnn) => {
                if self.stack_pointer == STACK_DEPTH {
                    return Err(Error::StackOverflow { pc });
                }
                self.stack[self.stack_pointer] = next;
                self.stack_pointer += 1;
                new_pc = nnn;
            }
            SeImm(x, kk) => {
                if self.v[x] == kk {
                    new_pc = skip;
                }
            }
            SneImm(x, kk) => {
                if self.v[x] != kk {
                    new_pc = skip;
                }
            }
            SeReg(x, y) => {
                if self.v[x] == self.v[y] {
                    new_pc = skip;
                }
            }
            SneReg(x, y) => {
                if self.v[x] != self.v[y] {
                    new_pc = skip;
                }
            }
            LdImm(x, kk) => self.v[x] = kk,
            AddImm(x, kk) => self.v[x] = self.v[x].wrapping_add(kk),
            LdReg(x, y) => self.v[x] = self.v[y],
            Or(x, y) => self.v[x] |= self.v[y],
            And(x, y) => self.v[x] &= self.v[y],
            Xor(x, y) => self.v[x] ^= self.v[y],
            AddReg(x, y) => {
                let (sum, carry) = self.v[x].overflowing_add(self.v[y]);
                self.set_with_flag(x, sum, carry as u8);
            }
            Sub(x, y) => {
                let (vx, vy) = (self.v[x], self.v[y]);
                self.set_with_flag(x, vx.wrapping_sub(vy), (vx >= vy) as u8);
            }
            Subn(x, y) => {
                let (vx, vy) = (self.v[x], self.v[y]);
                self.set_with_flag(x, vy.wrapping_sub(vx), (vy >= vx) as u8);
            }
            Shr(x, y) => {
                let src = self.shift_source(x, y);
                self.set_with_flag(x, src >> 1, src & 0x01);
            }
            Shl(x, y) => {
                let src = self.shift_source(x, y);
                self.set_with_flag(x, src << 1, src >> 7);
            }
            LdI(nnn) => self.i = nnn,
            JpV0(nnn) => new_pc = (nnn + self.v[0] as u16) & ADDRESS_MASK,
            Rnd(x, kk) => self.v[x] = self.rng.gen::<u8>() & kk,
            Drw(x, y, n) => self.draw_sprite(x, y, n)?,
            Skp(x) => {
                if self.input.is_key_down(self.v[x] & 0xf)? {
                    new_pc = skip;
                }
            }
            Sknp(x) => {
                if !self.input.is_key_down(self.v[x] & 0xf)? {
                    new_pc = skip;
                }
            }
            LdFromDelay(x) => self.v[x] = self.delay_timer,
            WaitKey(x) => {
                // only presses from here on count
                self.input.flush_keys()?;
                self.state = State::AwaitingKey { register: x };
                debug!("waiting for key into V{:X}", x);
            }
            LdDelay(x) => self.delay_timer = self.v[x],
            LdSound(x) => self.sound_timer = self.v[x],
            AddI(x) => self.i = (self.i + self.v[x] as u16) & ADDRESS_MASK,
            LdGlyph(x) => self.i = self.memory.glyph_addr(self.v[x]),
            Bcd(x) => {
                let value = self.v[x];
                self.memory
                    .write(&[value / 100, value / 10 % 10, value % 10], self.i)?;
            }
            Store(x) => {
                self.memory.write(&self.v[..=x], self.i)?;
                self.advance_i_after_load_store(x);
            }
            Load(x) => {
                let bytes = self.memory.get_ro_slice(self.i, x + 1)?;
                self.v[..=x].copy_from_slice(bytes);
                self.advance_i_after_load_store(x);
            }
        }

        self.program_counter = new_pc;
        Ok(())
    }

    /// operands are already read; the flag is written last so it survives
    /// when x is VF
    fn set_with_flag(&mut self, x: usize, value: u8, flag: u8) {
        self.v[x] = value;
        self.v[FLAG] = flag;
    }

    fn shift_source(&self, x: usize, y: usize) -> u8 {
        if self.config.shift_quirk {
            self.v[y]
        } else {
            self.v[x]
        }
    }

    fn advance_i_after_load_store(&mut self, x: usize) {
        if self.config.load_store_quirk {
            self.i = (self.i + x as u16 + 1) & ADDRESS_MASK;
        }
    }

    /// Dxyn: one display row per sprite byte; VF is set if any row collided
    fn draw_sprite(&mut self, x: usize, y: usize, n: u8) -> Result<(), Error> {
        let (origin_x, origin_y) = (self.v[x] as usize, self.v[y] as usize);
        let sprite = self.memory.get_ro_slice(self.i, n as usize)?;
        let mut collided = false;
        for (row, &bits) in sprite.iter().enumerate() {
            collided |= self.display.draw_sprite_row(bits, origin_x, origin_y + row);
        }
        self.v[FLAG] = collided as u8;
        Ok(())
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn pc(&self) -> u16 {
        self.program_counter
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.v
    }

    /// the live part of the call stack, oldest first
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.stack_pointer]
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn memory(&self) -> &memory::Chip8MemoryMap {
        &self.memory
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// copy of the register file, for debug views
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            v: self.v,
            i: self.i,
            pc: self.program_counter,
            stack: self.stack().to_vec(),
            delay_timer: self.delay_timer,
            sound_timer: self.sound_timer,
            state: self.state,
        }
    }
}
