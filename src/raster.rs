/// Software rasterizer over an 8-bit indexed pixel buffer.
///
/// Every primitive validates its coordinates up front and fails with
/// `DrawError::OutOfBounds` instead of clipping. Nothing here allocates after
/// the buffer itself is created.

use crate::error::DrawError;

/// One byte per pixel, row-major.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        FrameBuffer {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    fn check(&self, x: i32, y: i32) -> Result<(), DrawError> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Err(DrawError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Write without checking. Callers validate both ends of a primitive first.
    fn put(&mut self, x: i32, y: i32, color: u8) {
        self.pixels[y as usize * self.width + x as usize] = color;
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: u8) -> Result<(), DrawError> {
        self.check(x, y)?;
        self.put(x, y, color);
        Ok(())
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Result<u8, DrawError> {
        self.check(x, y)?;
        Ok(self.pixels[y as usize * self.width + x as usize])
    }

    pub fn fill(&mut self, color: u8) {
        self.pixels.fill(color);
    }

    /// Colour every pixel in the half-open rectangle `[x0, x1) x [y0, y1)`.
    pub fn fill_region(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: u8,
    ) -> Result<(), DrawError> {
        if x0 >= x1 || y0 >= y1 {
            return Ok(());
        }
        self.check(x0, y0)?;
        self.check(x1 - 1, y1 - 1)?;
        for y in y0..y1 {
            let row = y as usize * self.width;
            self.pixels[row + x0 as usize..row + x1 as usize].fill(color);
        }
        Ok(())
    }

    /// Draw a line including both endpoints.
    ///
    /// Endpoints are put in canonical order before stepping, so swapping them
    /// yields the same pixels.
    pub fn draw_line(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: u8,
    ) -> Result<(), DrawError> {
        self.check(x0, y0)?;
        self.check(x1, y1)?;

        let dx = x1 - x0;
        let dy = y1 - y0;

        if dx == 0 {
            for y in y0.min(y1)..=y0.max(y1) {
                self.put(x0, y, color);
            }
        } else if dy == 0 {
            for x in x0.min(x1)..=x0.max(x1) {
                self.put(x, y0, color);
            }
        } else if dx.abs() == dy.abs() {
            // Unit slope: only glyph diagonals hit this.
            let (sx, sy) = if x0 < x1 { (x0, y0) } else { (x1, y1) };
            let step = if dx.signum() == dy.signum() { 1 } else { -1 };
            for i in 0..=dx.abs() {
                self.put(sx + i, sy + step * i, color);
            }
        } else if dx.abs() > dy.abs() {
            let ((sx, sy), (ex, ey)) = if x0 < x1 {
                ((x0, y0), (x1, y1))
            } else {
                ((x1, y1), (x0, y0))
            };
            for (x, y) in Midpoint::new(sx, sy, ex, ey) {
                self.put(x, y, color);
            }
        } else {
            let ((sx, sy), (ex, ey)) = if y0 < y1 {
                ((x0, y0), (x1, y1))
            } else {
                ((x1, y1), (x0, y0))
            };
            for (y, x) in Midpoint::new(sy, sx, ey, ex) {
                self.put(x, y, color);
            }
        }
        Ok(())
    }

    pub fn draw_square(&mut self, x: i32, y: i32, size: i32, color: u8) -> Result<(), DrawError> {
        if size <= 0 {
            return Err(DrawError::EmptyShape);
        }
        self.draw_rectangle(x, y, x + size, y + size, color)
    }

    pub fn draw_rectangle(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: u8,
    ) -> Result<(), DrawError> {
        self.draw_line(x0, y0, x1, y0, color)?;
        self.draw_line(x0, y1, x1, y1, color)?;
        self.draw_line(x0, y0, x0, y1, color)?;
        self.draw_line(x1, y0, x1, y1, color)
    }

    /// Square outline whose sides are split in half, one colour per division.
    ///
    /// Divisions run clockwise from the left half of the top edge:
    /// 0 top-left, 1 top-right, 2 right-upper, 3 right-lower,
    /// 4 bottom-right, 5 bottom-left, 6 left-lower, 7 left-upper.
    pub fn draw_segmented_square(
        &mut self,
        x: i32,
        y: i32,
        size: i32,
        colors: &[u8; 8],
    ) -> Result<(), DrawError> {
        if size <= 0 {
            return Err(DrawError::EmptyShape);
        }
        let half = size / 2;
        let (xe, ye) = (x + size, y + size);

        self.draw_line(x, y, x + half, y, colors[0])?;
        self.draw_line(x + half, y, xe, y, colors[1])?;
        self.draw_line(xe, y, xe, y + half, colors[2])?;
        self.draw_line(xe, y + half, xe, ye, colors[3])?;
        self.draw_line(x + half, ye, xe, ye, colors[4])?;
        self.draw_line(x, ye, x + half, ye, colors[5])?;
        self.draw_line(x, y + half, x, ye, colors[6])?;
        self.draw_line(x, y, x, y + half, colors[7])
    }
}

/// Walks the major axis of a shallow line one unit at a time, moving the
/// minor axis by one whenever the ideal line `m*u + b` passes more than half
/// a pixel beyond the current minor coordinate. Exact ties stay put.
///
/// Coordinates are `(major, minor)`; `u0 < u1` and `|v1 - v0| < u1 - u0`.
struct Midpoint {
    u0: i32,
    v0: i32,
    du: i32,
    dv: i32,
    u: i32,
    v: i32,
    end: i32,
}

impl Midpoint {
    fn new(u0: i32, v0: i32, u1: i32, v1: i32) -> Self {
        Midpoint {
            u0,
            v0,
            du: u1 - u0,
            dv: v1 - v0,
            u: u0,
            v: v0,
            end: u1,
        }
    }
}

impl Iterator for Midpoint {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        if self.u > self.end {
            return None;
        }
        // Scaled by 2*du to stay in integers: ideal = v0 + dv*(u-u0)/du.
        let ideal = 2 * i64::from(self.dv) * i64::from(self.u - self.u0);
        let offset = i64::from(self.v - self.v0);
        let du = i64::from(self.du);
        if self.dv > 0 && ideal > (2 * offset + 1) * du {
            self.v += 1;
        } else if self.dv < 0 && ideal < (2 * offset - 1) * du {
            self.v -= 1;
        }
        let point = (self.u, self.v);
        self.u += 1;
        Some(point)
    }
}
