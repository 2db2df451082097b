/// What to do when the program counter walks off the end of memory
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PcOverflow {
    /// carry on from the program origin
    Wrap,
    /// stop and report `Error::PcOutOfBounds`
    Fault,
}

/// Knobs for the places where CHIP-8 programs disagree about the machine
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub pc_overflow: PcOverflow,
    /// 8xy6/8xyE shift Vy into Vx, as the COSMAC VIP did
    pub shift_quirk: bool,
    /// Fx55/Fx65 leave I pointing past the last register copied
    pub load_store_quirk: bool,
    /// fixes the random sequence Cxkk sees
    pub seed: Option<u64>,
    /// instruction rate the runner aims for
    pub cycles_per_second: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pc_overflow: PcOverflow::Wrap,
            shift_quirk: false,
            load_store_quirk: false,
            seed: None,
            cycles_per_second: 700,
        }
    }
}

/// timers tick at this rate regardless of the instruction rate
pub const TIMER_HZ: u32 = 60;
