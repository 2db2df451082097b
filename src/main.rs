use std::env;
use std::error::Error;
use std::fs::File;
use std::time::{Duration, Instant};

use chip8::config::{Config, TIMER_HZ};
use chip8::debug::memory_dump;
use chip8::display::{MonoTermDisplay, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use chip8::input::{Input, StdinInput};
use chip8::Chip8Interpreter;
use log::info;

const USAGE: &str = "usage: chip8 <rom> [cycles-per-second]";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let path = args.next().ok_or(USAGE)?;
    let mut config = Config::default();
    if let Some(rate) = args.next() {
        config.cycles_per_second = rate.parse().map_err(|_| USAGE)?;
    }
    let cycle = Duration::from_secs(1) / config.cycles_per_second.max(1);
    let frame = Duration::from_secs(1) / TIMER_HZ;

    // open the rom before touching the terminal, so a bad path reads cleanly
    let mut f = File::open(&path)?;
    let display = MonoTermDisplay::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)?;
    let input = StdinInput::new()?;
    let mut interpreter = Chip8Interpreter::new(display, input, config);
    interpreter.load_program_from(&mut f)?;
    info!("running {} at {:?} per cycle", path, cycle);

    let mut next_cycle = Instant::now();
    let mut next_frame = next_cycle;
    while !interpreter.input().quit_requested() {
        if Instant::now() >= next_frame {
            interpreter.decay_timers();
            let mut status = interpreter.snapshot().to_string();
            status.push('\n');
            status.push_str(&memory_dump(interpreter.memory().as_slice(), interpreter.pc(), 4));
            if interpreter.sound_active() {
                status.push_str("\n*beep*");
            }
            interpreter.display_mut().present(&status, true)?;
            next_frame += frame;
        }

        interpreter.step()?;

        next_cycle += cycle;
        spin_sleep::sleep(next_cycle.saturating_duration_since(Instant::now()));
    }

    // shove some junk on stdout to stop the cli messing up the last frame
    drop(interpreter);
    for _ in 0..12 {
        println!();
    }
    Ok(())
}
