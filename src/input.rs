use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use log::warn;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::time::{Duration, Instant};

/// the hex keypad has keys 0x0-0xf
pub const KEY_COUNT: u8 = 16;

/// map of left-hand side of a qwerty keyboard onto the COSMAC hex keypad:
///   1 2 3 4      1 2 3 C
///   q w e r  ->  4 5 6 D
///   a s d f      7 8 9 E
///   z x c v      A 0 B F
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// terminals only report presses, so a key counts as held for this long
const KEY_HOLD: Duration = Duration::from_millis(150);

/// reads keypresses
pub trait Input {
    /// is hex key `key` held down right now
    fn is_key_down(&mut self, key: u8) -> Result<bool, io::Error>;

    /// take the oldest key press not yet handed out, if any
    fn next_key_press(&mut self) -> Result<Option<u8>, io::Error>;

    /// forget all pending key presses
    fn flush_keys(&mut self) -> Result<(), io::Error>;

    /// has the user asked to leave
    fn quit_requested(&self) -> bool {
        false
    }
}

/// Input over the terminal, using crossterm in raw mode
pub struct StdinInput {
    presses: VecDeque<u8>,
    held: HashMap<u8, Instant>,
    keymap: HashMap<char, u8>,
    quit: bool,
}

impl StdinInput {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(StdinInput {
            presses: VecDeque::new(),
            held: HashMap::new(),
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            quit: false,
        })
    }

    fn read_stdin(&mut self) -> Result<(), io::Error> {
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(evt) => match evt.code {
                    KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.quit = true
                    }
                    KeyCode::Char(key) => match self.keymap.get(&key.to_ascii_lowercase()) {
                        Some(&mapped_key) => {
                            self.presses.push_back(mapped_key);
                            self.held.insert(mapped_key, Instant::now());
                        }
                        None => warn!("can't map {:?} to a COSMAC key", key),
                    },
                    KeyCode::Esc => self.quit = true,
                    _ => warn!("unknown key event received"),
                },
                Event::Resize(..) => {}
                _ => warn!("unknown event received"),
            }
        }
        Ok(())
    }
}

impl Drop for StdinInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for StdinInput {
    fn is_key_down(&mut self, key: u8) -> Result<bool, io::Error> {
        self.read_stdin()?;
        Ok(self
            .held
            .get(&key)
            .map_or(false, |pressed| pressed.elapsed() < KEY_HOLD))
    }

    fn next_key_press(&mut self) -> Result<Option<u8>, io::Error> {
        self.read_stdin()?;
        Ok(self.presses.pop_front())
    }

    fn flush_keys(&mut self) -> Result<(), io::Error> {
        self.read_stdin()?;
        self.presses.clear();
        Ok(())
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

/// dummy Input implementation for testing: a fixed set of held keys plus a
/// queue of presses to hand out
#[derive(Default)]
pub struct DummyInput {
    down: Vec<u8>,
    presses: VecDeque<u8>,
}

impl DummyInput {
    pub fn new(keys: &[u8]) -> Self {
        DummyInput {
            down: Vec::from(keys),
            presses: VecDeque::new(),
        }
    }

    /// queue up a key press (also holds the key down)
    pub fn press(&mut self, key: u8) {
        self.presses.push_back(key);
        if !self.down.contains(&key) {
            self.down.push(key);
        }
    }

    pub fn release(&mut self, key: u8) {
        self.down.retain(|&k| k != key);
    }
}

impl Input for DummyInput {
    fn is_key_down(&mut self, key: u8) -> Result<bool, io::Error> {
        Ok(self.down.contains(&key))
    }

    fn next_key_press(&mut self) -> Result<Option<u8>, io::Error> {
        Ok(self.presses.pop_front())
    }

    fn flush_keys(&mut self) -> Result<(), io::Error> {
        self.presses.clear();
        Ok(())
    }
}
