/// Terminal blit: all screen output lives here.
///
/// The framebuffer is scaled onto the terminal grid with the upper
/// half-block glyph, two pixel rows per cell (foreground paints the top
/// half, background the bottom). Only cells that changed since the last
/// blit are re-emitted.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::raster::FrameBuffer;

const HALF_BLOCK: char = '▀';

/// Palette index to RGB. Indices follow the 64-colour `rgbRGB` layout:
/// the low three bits carry two-thirds intensity, the high three one third.
pub fn palette_rgb(index: u8) -> (u8, u8, u8) {
    let i = index & 0x3F;
    let channel = |low: u8, high: u8| 0x55 * ((i >> low) & 1) + 0xAA * ((i >> high) & 1);
    (channel(5, 2), channel(4, 1), channel(3, 0))
}

fn color_for(index: u8) -> Color {
    let (r, g, b) = palette_rgb(index);
    Color::Rgb { r, g, b }
}

/// Colour for the block `[x0, x1) x [y0, y1)`: the first pixel that differs
/// from `background`, so thin outlines survive downscaling.
pub fn sample_block(
    fb: &FrameBuffer,
    (x0, x1): (usize, usize),
    (y0, y1): (usize, usize),
    background: u8,
) -> u8 {
    let width = fb.width();
    let pixels = fb.as_bytes();
    for y in y0..y1.max(y0 + 1) {
        let row = &pixels[y * width..(y + 1) * width];
        if let Some(&ink) = row[x0..x1.max(x0 + 1)].iter().find(|&&p| p != background) {
            return ink;
        }
    }
    background
}

pub struct TerminalDisplay<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    /// (top, bottom) colour of every cell as last emitted.
    cells: Vec<Option<(u8, u8)>>,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        TerminalDisplay {
            out,
            cols: 0,
            rows: 0,
            cells: Vec::new(),
        }
    }

    /// Draw `fb` on a `cols` x `rows` grid.
    pub fn blit_sized(&mut self, fb: &FrameBuffer, cols: u16, rows: u16) -> std::io::Result<()> {
        if cols == 0 || rows == 0 || fb.width() == 0 || fb.height() == 0 {
            return Ok(());
        }
        if (cols, rows) != (self.cols, self.rows) {
            self.cols = cols;
            self.rows = rows;
            self.cells = vec![None; usize::from(cols) * usize::from(rows)];
            self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        }

        let (w, h) = (fb.width(), fb.height());
        let (c, r) = (usize::from(cols), usize::from(rows) * 2);
        let background = fb.as_bytes()[0];
        let span = |i: usize, cells: usize, len: usize| (i * len / cells, ((i + 1) * len / cells).min(len));

        for row in 0..usize::from(rows) {
            let mut cursor_at: Option<usize> = None;
            for col in 0..c {
                let xs = span(col, c, w);
                let top = sample_block(fb, xs, span(2 * row, r, h), background);
                let bottom = sample_block(fb, xs, span(2 * row + 1, r, h), background);
                let cell = &mut self.cells[row * c + col];
                if *cell == Some((top, bottom)) {
                    continue;
                }
                *cell = Some((top, bottom));
                if cursor_at != Some(col) {
                    self.out.queue(cursor::MoveTo(col as u16, row as u16))?;
                }
                self.out.queue(style::SetForegroundColor(color_for(top)))?;
                self.out.queue(style::SetBackgroundColor(color_for(bottom)))?;
                self.out.queue(Print(HALF_BLOCK))?;
                cursor_at = Some(col + 1);
            }
        }
        self.out.queue(style::ResetColor)?;
        self.out.flush()
    }

    /// Draw `fb` on the whole terminal.
    pub fn blit(&mut self, fb: &FrameBuffer) -> std::io::Result<()> {
        let (cols, rows) = terminal::size()?;
        self.blit_sized(fb, cols, rows)
    }
}
