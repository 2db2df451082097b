use std::io;
use thiserror::Error;

/// Faults the machine reports to whoever is driving it. A faulting instruction
/// has no effect on machine state.
#[derive(Debug, Error)]
pub enum Error {
    #[error("call stack overflow at pc {pc:#05x}")]
    StackOverflow { pc: u16 },

    #[error("return with empty call stack at pc {pc:#05x}")]
    StackUnderflow { pc: u16 },

    #[error("memory access of {len} byte(s) at {addr:#05x} is out of bounds")]
    MemoryOutOfBounds { addr: u16, len: usize },

    #[error("program of {len} bytes does not fit in {capacity} bytes of program memory")]
    ProgramTooLarge { len: usize, capacity: usize },

    #[error("program counter {0:#06x} ran off the end of memory")]
    PcOutOfBounds(u16),

    #[error(transparent)]
    Io(#[from] io::Error),
}
