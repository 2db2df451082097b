//! Register and memory dumps for watching a program run.
use crate::interpreter::State;
use std::fmt;
use std::fmt::Write;

/// A copy of the register file at some instant
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub stack: Vec<u16>,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub state: State,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, regs) in self.v.chunks(8).enumerate() {
            for (k, r) in regs.iter().enumerate() {
                write!(f, "V{:X}={:02X} ", n * 8 + k, r)?;
            }
            writeln!(f)?;
        }
        writeln!(
            f,
            "PC={:03X} I={:03X} DT={:02X} ST={:02X} SP={:X}",
            self.pc,
            self.i,
            self.delay_timer,
            self.sound_timer,
            self.stack.len()
        )?;
        write!(f, "stack:")?;
        for addr in &self.stack {
            write!(f, " {:03X}", addr)?;
        }
        if let State::AwaitingKey { register } = self.state {
            write!(f, "\nwaiting for key -> V{:X}", register)?;
        }
        Ok(())
    }
}

/// hex dump of `words` big-endian words starting at `from`, one per line
pub fn memory_dump(memory: &[u8], from: u16, words: usize) -> String {
    let mut out = String::new();
    let start = from as usize;
    for (n, word) in memory[start.min(memory.len())..].chunks(2).take(words).enumerate() {
        let _ = write!(out, "{:03X}: ", start + n * 2);
        for byte in word {
            let _ = write!(out, "{:02X}", byte);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_dump() {
        let mut v = [0u8; 16];
        v[0xa] = 0x7f;
        let snap = Snapshot {
            v,
            i: 0x123,
            pc: 0x2fe,
            stack: vec![0x202, 0x304],
            delay_timer: 3,
            sound_timer: 0,
            state: State::AwaitingKey { register: 2 },
        };
        let text = snap.to_string();
        assert!(text.starts_with("V0=00 V1=00"));
        assert!(text.contains("VA=7F"));
        assert!(text.contains("PC=2FE I=123 DT=03 ST=00 SP=2"));
        assert!(text.contains("stack: 202 304"));
        assert!(text.ends_with("waiting for key -> V2"));
    }

    #[test]
    fn test_memory_dump() {
        let mem = [0x60, 0x05, 0x61, 0x02, 0x80];
        assert_eq!(memory_dump(&mem, 0, 8), "000: 6005\n002: 6102\n004: 80\n");
        assert_eq!(memory_dump(&mem, 2, 1), "002: 6102\n");
        assert_eq!(memory_dump(&mem, 9, 1), "");
    }
}
