//!
//! ## Design
//!
//! * bit-exact CHIP-8 instruction semantics; the flag register quirks are
//!   pinned down by tests rather than left to chance
//! * one instruction per `step()`; the host decides how fast to call it
//! * timers are ticked by the host at 60Hz, independently of `step()`
//! * abstract display and input so can plug alternatives; starting with TUI
//!   in-console
//! * waiting for a key (Fx0A) is a machine state, not a blocking call, so any
//!   kind of host loop can drive it by polling
//! * some config for where programs disagree (shift source, I after
//!   load/store, what happens when the pc runs off the end of memory)
//!
//! Model
//!
//! ```text
//! Host
//!  |-- display, input, config
//!  |-- interpreter(display, input, config)
//!  |    |-- memory map (font baked in, program at 0x200)
//!  |    |-- instruction decode
//!  |    `-- registers, stack, timers, key-wait state
//!  `-- main loop
//!       |-- every cycle: interpreter.step()
//!       |-- every 1/60s: interpreter.decay_timers(); redraw the display
//!       `-- sleep until the next cycle is due
//! ```

pub mod config;
pub mod debug;
pub mod display;
pub mod error;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod memory;

pub use config::{Config, PcOverflow};
pub use error::Error;
pub use interpreter::{Chip8Interpreter, State, Step};
