use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders, Paragraph};
use tui::Terminal;

/// native CHIP-8 resolution
pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Display is used by the interpreter to draw things on the screen. It should
/// abstract the implementation details, so a variety of kinds of screen would
/// work. The display owns the pixel state; the interpreter only asks it to
/// XOR rows in and reports the collisions it hands back.
pub trait Display {
    /// turn every pixel off
    fn clear(&mut self);

    /// XOR the 8 bits of `row` (msb leftmost) onto the screen starting at
    /// column `x`, row `y`. Both axes wrap per pixel. Returns true if any lit
    /// pixel was turned off.
    fn draw_sprite_row(&mut self, row: u8, x: usize, y: usize) -> bool;
}

/// In-memory monochrome screen with toroidal addressing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
    dirty: bool,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "FrameBuffer needs a non-empty area");
        FrameBuffer {
            width,
            height,
            pixels: vec![false; width * height],
            dirty: true,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// pixel state; coordinates wrap just like drawing does
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[self.index(x, y)]
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }

    /// true if anything changed since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// pack the screen into bytes, msb first, row-major
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = vec![0u8; (self.pixels.len() + 7) / 8];
        for (n, _) in self.pixels.iter().enumerate().filter(|(_, p)| **p) {
            data[n / 8] |= 0x80 >> (n % 8);
        }
        data
    }

    fn index(&self, x: usize, y: usize) -> usize {
        (y % self.height) * self.width + (x % self.width)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        FrameBuffer::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

impl Display for FrameBuffer {
    fn clear(&mut self) {
        self.pixels.iter_mut().for_each(|p| *p = false);
        self.dirty = true;
    }

    fn draw_sprite_row(&mut self, row: u8, x: usize, y: usize) -> bool {
        let mut collided = false;
        for bit in 0..8 {
            if row & (0x80 >> bit) == 0 {
                continue;
            }
            let i = self.index(x + bit, y);
            collided |= self.pixels[i];
            self.pixels[i] ^= true;
            self.dirty = true;
        }
        collided
    }
}

// store useful metadata about the terminal
struct Resolution(usize, usize);

impl Resolution {
    fn pixel_count(&self) -> usize {
        self.0 * self.1
    }

    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    fn bitplane_from_data<'a>(
        &self,
        data: &'a [u8],
        bitplane: u8,
    ) -> impl std::iter::Iterator<Item = (f64, f64)> + 'a {
        let mut count = self.pixel_count();
        let w = self.0;
        std::iter::from_fn(move || {
            while count > 0 {
                count -= 1;
                let bit = 1 & (data[count / 8] >> (7 - count % 8));
                if bit == bitplane {
                    return Some((
                        (count % w) as f64,        // x
                        -1.0 * (count / w) as f64, // y
                    ));
                }
            }
            None
        })
    }
}

/// monochrome display in a terminal, rendered using TUI over crossterm.
/// Drawing goes into a FrameBuffer; `present` puts it on screen.
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    frame: FrameBuffer,
    resolution: Resolution,
}

impl MonoTermDisplay {
    pub fn new(x: usize, y: usize) -> Result<MonoTermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        Ok(MonoTermDisplay {
            terminal,
            frame: FrameBuffer::new(x, y),
            resolution: Resolution(x, y),
        })
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// redraw the terminal if the screen changed or `force` is set; `status`
    /// is printed underneath (e.g. a register dump)
    pub fn present(&mut self, status: &str, force: bool) -> Result<(), io::Error> {
        if !self.frame.take_dirty() && !force {
            return Ok(());
        }
        let data = self.frame.to_bytes();
        let resolution = &self.resolution;

        // for now this assumes a 1:1 ratio between terminal, chip8 and the
        // internal TUI canvas
        self.terminal.draw(|f| {
            let screen = Rect::new(0, 0, 2 + resolution.0 as u16, 2 + resolution.1 as u16);
            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(resolution.x_bounds())
                .y_bounds(resolution.y_bounds())
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &resolution.bitplane_from_data(&data, 1).collect::<Vec<_>>(),
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, screen);

            let size = f.size();
            let below = screen.height.min(size.height);
            let info = Rect::new(0, below, screen.width.min(size.width), size.height - below);
            f.render_widget(Paragraph::new(status), info);
        })?;
        Ok(())
    }
}

impl Display for MonoTermDisplay {
    fn clear(&mut self) {
        self.frame.clear()
    }

    fn draw_sprite_row(&mut self, row: u8, x: usize, y: usize) -> bool {
        self.frame.draw_sprite_row(row, x, y)
    }
}

impl Drop for MonoTermDisplay {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
    }
}
