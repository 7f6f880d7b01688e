/// Vector font built from straight strokes.
///
/// Each glyph is an ordered list of strokes on a grid whose unit is the
/// requested character size, so text scales by one integer without any
/// bitmap copies. Strokes are drawn `STROKE_WIDTH` pixels thick.

use crate::config::{STR_END, STR_NEWLINE, STROKE_WIDTH};
use crate::error::DrawError;
use crate::raster::FrameBuffer;

/// `units * size + widths * STROKE_WIDTH` pixels from the glyph origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Len {
    units: i32,
    widths: i32,
}

const fn l(units: i32, widths: i32) -> Len {
    Len { units, widths }
}

impl Len {
    fn at(self, size: i32) -> i32 {
        self.units * size + self.widths * STROKE_WIDTH
    }
}

/// Direction the stroke is repeated in to give it thickness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Thicken {
    Down,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stroke {
    pub from: (Len, Len),
    pub to: (Len, Len),
    pub thicken: Thicken,
}

const fn h(x0: Len, y: Len, x1: Len) -> Stroke {
    Stroke {
        from: (x0, y),
        to: (x1, y),
        thicken: Thicken::Down,
    }
}

const fn v(x: Len, y0: Len, y1: Len) -> Stroke {
    Stroke {
        from: (x, y0),
        to: (x, y1),
        thicken: Thicken::Right,
    }
}

const fn d(from: (Len, Len), to: (Len, Len)) -> Stroke {
    Stroke {
        from,
        to,
        thicken: Thicken::Down,
    }
}

// ── Letter grid: 2 units wide, 4 units tall ──────────────────────────────────

const H0: Stroke = h(l(0, 0), l(0, 0), l(1, 0));
const H1: Stroke = h(l(1, 0), l(0, 0), l(2, 0));
const H2: Stroke = h(l(0, 0), l(1, 0), l(1, 0));
const H3: Stroke = h(l(1, 1), l(1, 0), l(2, 1));
const H4: Stroke = h(l(0, 0), l(2, 0), l(1, 0));
const H5: Stroke = h(l(1, 0), l(2, 0), l(2, 0));
const H6: Stroke = h(l(0, 0), l(3, 0), l(1, 0));
const H7: Stroke = h(l(1, 0), l(3, 0), l(2, 0));
const H8: Stroke = h(l(0, 0), l(4, 0), l(1, 0));
const H9: Stroke = h(l(1, 0), l(4, 0), l(2, 0));

const V0: Stroke = v(l(0, 0), l(0, 0), l(1, 0));
const V1: Stroke = v(l(2, 0), l(0, 0), l(1, 0));
const V2: Stroke = v(l(0, 0), l(1, 0), l(2, 0));
const V3: Stroke = v(l(2, 0), l(1, 0), l(2, 0));
const V4: Stroke = v(l(0, 0), l(2, 0), l(3, 0));
const V5: Stroke = v(l(2, 0), l(2, 0), l(3, 0));
const V6: Stroke = v(l(0, 0), l(3, 0), l(4, 0));
const V7: Stroke = v(l(2, 0), l(3, 0), l(4, 0));
const V8: Stroke = v(l(1, 0), l(0, 0), l(2, 0));
const V9: Stroke = v(l(1, 0), l(2, 0), l(4, 0));

const D0: Stroke = d((l(0, 1), l(2, 0)), (l(1, 1), l(1, 0)));
const D1: Stroke = d((l(0, 0), l(4, 0)), (l(2, 0), l(2, 0)));
const D2: Stroke = d((l(0, 0), l(2, 0)), (l(2, 0), l(4, 0)));

/// Short stroke over i and j. Positioned from the unlowered origin.
const DOT: Stroke = h(l(1, 0), l(1, 0), l(1, 1));

// ── Digit grid: seven segments, `size` long ──────────────────────────────────

const SEG_TOP: Stroke = h(l(0, 1), l(0, 0), l(1, 1));
const SEG_MID: Stroke = h(l(0, 1), l(1, 1), l(1, 1));
const SEG_BOTTOM: Stroke = h(l(0, 1), l(2, 2), l(1, 1));
const SEG_UPPER_LEFT: Stroke = v(l(0, 0), l(0, 1), l(1, 1));
const SEG_LOWER_LEFT: Stroke = v(l(0, 0), l(1, 2), l(2, 2));
const SEG_UPPER_RIGHT: Stroke = v(l(1, 1), l(0, 1), l(1, 1));
const SEG_LOWER_RIGHT: Stroke = v(l(1, 1), l(1, 2), l(2, 2));

const DIGITS: [&[Stroke]; 10] = [
    &[SEG_TOP, SEG_UPPER_LEFT, SEG_UPPER_RIGHT, SEG_LOWER_LEFT, SEG_LOWER_RIGHT, SEG_BOTTOM],
    &[SEG_UPPER_RIGHT, SEG_LOWER_RIGHT],
    &[SEG_TOP, SEG_UPPER_RIGHT, SEG_MID, SEG_LOWER_LEFT, SEG_BOTTOM],
    &[SEG_TOP, SEG_UPPER_RIGHT, SEG_MID, SEG_LOWER_RIGHT, SEG_BOTTOM],
    &[SEG_UPPER_LEFT, SEG_UPPER_RIGHT, SEG_MID, SEG_LOWER_RIGHT],
    &[SEG_TOP, SEG_UPPER_LEFT, SEG_MID, SEG_LOWER_RIGHT, SEG_BOTTOM],
    &[SEG_TOP, SEG_UPPER_LEFT, SEG_MID, SEG_LOWER_LEFT, SEG_LOWER_RIGHT, SEG_BOTTOM],
    &[SEG_TOP, SEG_UPPER_RIGHT, SEG_LOWER_RIGHT],
    &[SEG_TOP, SEG_UPPER_LEFT, SEG_UPPER_RIGHT, SEG_MID, SEG_LOWER_LEFT, SEG_LOWER_RIGHT, SEG_BOTTOM],
    &[SEG_TOP, SEG_UPPER_LEFT, SEG_UPPER_RIGHT, SEG_MID, SEG_LOWER_RIGHT, SEG_BOTTOM],
];

#[derive(Clone, Copy, Debug)]
pub struct Glyph {
    pub strokes: &'static [Stroke],
    /// Baseline shifted down two units, for descenders.
    pub lowered: bool,
    pub dot: bool,
    /// Drawn twice side by side (m, w).
    pub wide: bool,
}

const fn glyph(strokes: &'static [Stroke]) -> Glyph {
    Glyph {
        strokes,
        lowered: false,
        dot: false,
        wide: false,
    }
}

const fn lowered(strokes: &'static [Stroke]) -> Glyph {
    Glyph {
        strokes,
        lowered: true,
        dot: false,
        wide: false,
    }
}

const fn wide(strokes: &'static [Stroke]) -> Glyph {
    Glyph {
        strokes,
        lowered: false,
        dot: false,
        wide: true,
    }
}

const LETTERS: [Glyph; 26] = [
    glyph(&[H4, H5, H6, H7, H8, H9, V5, V6, V7]),
    glyph(&[H4, H5, H8, H9, V0, V2, V4, V5, V6, V7]),
    glyph(&[H4, H5, H8, H9, V4, V6]),
    glyph(&[H4, H5, H8, H9, V1, V3, V4, V5, V6, V7]),
    glyph(&[H4, H5, H6, H7, H8, H9, V4, V5, V6]),
    glyph(&[H1, H4, H5, V8, V9]),
    lowered(&[H0, H1, H4, H5, H8, H9, V0, V1, V2, V3, V5, V6, V7]),
    glyph(&[H4, H5, V0, V2, V4, V5, V6, V7]),
    Glyph {
        strokes: &[V9],
        lowered: false,
        dot: true,
        wide: false,
    },
    Glyph {
        strokes: &[H8, V6, V8, V9],
        lowered: true,
        dot: true,
        wide: false,
    },
    glyph(&[V0, V2, V4, V6, D0, D2]),
    glyph(&[V8, V9]),
    wide(&[H4, H5, V4, V5, V6, V7]),
    glyph(&[H4, H5, V4, V5, V6, V7]),
    glyph(&[H4, H5, H8, H9, V4, V5, V6, V7]),
    lowered(&[H0, H1, H4, H5, V0, V1, V2, V3, V4, V6]),
    lowered(&[H0, H1, H4, H5, V0, V1, V2, V3, V5, V7]),
    glyph(&[H5, V9]),
    glyph(&[H4, H5, H6, H7, H8, H9, V4, V7]),
    glyph(&[H2, H3, V8, V9]),
    glyph(&[H8, H9, V4, V5, V6, V7]),
    glyph(&[V4, V6, D1]),
    wide(&[V4, V6, D1]),
    glyph(&[D1, D2]),
    lowered(&[H4, H5, H8, H9, V0, V1, V2, V3, V5, V7]),
    glyph(&[H4, H5, H8, H9, D1]),
];

const OPEN_PAREN: Glyph = glyph(&[H0, H8, V0, V2, V4, V6]);
const CLOSE_PAREN: Glyph = glyph(&[H1, H9, V1, V3, V5, V7]);
const APOSTROPHE: Glyph = glyph(&[V8]);

/// Look up the strokes for a letter or punctuation mark.
pub fn glyph_for(c: char) -> Option<&'static Glyph> {
    match c {
        'a'..='z' => Some(&LETTERS[c as usize - 'a' as usize]),
        '(' => Some(&OPEN_PAREN),
        ')' => Some(&CLOSE_PAREN),
        '\'' => Some(&APOSTROPHE),
        _ => None,
    }
}

fn draw_stroke(
    fb: &mut FrameBuffer,
    x: i32,
    y: i32,
    size: i32,
    stroke: &Stroke,
    color: u8,
) -> Result<(), DrawError> {
    let (x0, y0) = (x + stroke.from.0.at(size), y + stroke.from.1.at(size));
    let (x1, y1) = (x + stroke.to.0.at(size), y + stroke.to.1.at(size));
    for t in 0..STROKE_WIDTH {
        let (ox, oy) = match stroke.thicken {
            Thicken::Down => (0, t),
            Thicken::Right => (t, 0),
        };
        fb.draw_line(x0 + ox, y0 + oy, x1 + ox, y1 + oy, color)?;
    }
    Ok(())
}

fn draw_strokes(
    fb: &mut FrameBuffer,
    x: i32,
    y: i32,
    size: i32,
    strokes: &[Stroke],
    color: u8,
) -> Result<(), DrawError> {
    strokes
        .iter()
        .try_for_each(|stroke| draw_stroke(fb, x, y, size, stroke, color))
}

/// Draw one seven-segment digit with segments `size` long. Returns `size`.
pub fn draw_digit(
    fb: &mut FrameBuffer,
    x: i32,
    y: i32,
    digit: u8,
    size: i32,
    color: u8,
) -> Result<i32, DrawError> {
    let strokes = DIGITS[usize::from(digit % 10)];
    draw_strokes(fb, x, y, size, strokes, color)?;
    Ok(size)
}

/// Draw a letter glyph and return how far its ink extends past the
/// caller's spacing.
pub fn draw_glyph(
    fb: &mut FrameBuffer,
    x: i32,
    y: i32,
    size: i32,
    glyph: &Glyph,
    color: u8,
) -> Result<i32, DrawError> {
    if glyph.dot {
        draw_stroke(fb, x, y, size, &DOT, color)?;
    }
    let base_y = if glyph.lowered { y + 2 * size } else { y };
    let copies = if glyph.wide { 2 } else { 1 };
    for copy in 0..copies {
        draw_strokes(fb, x + copy * 2 * size, base_y, size, glyph.strokes, color)?;
    }
    Ok(if glyph.wide { 5 * size / 2 } else { size / 2 })
}

/// Draw one character and return the extra horizontal advance it needs.
///
/// Digits are drawn at twice the letter size so both share a cap height.
/// Punctuation takes no extra room; characters without a glyph draw nothing.
pub fn draw_char(
    fb: &mut FrameBuffer,
    x: i32,
    y: i32,
    c: char,
    size: i32,
    color: u8,
) -> Result<i32, DrawError> {
    if let Some(digit) = c.to_digit(10) {
        return draw_digit(fb, x, y, digit as u8, 2 * size, color);
    }
    match glyph_for(c) {
        Some(g) if c.is_ascii_lowercase() => draw_glyph(fb, x, y, size, g, color),
        Some(g) => draw_glyph(fb, x, y, size, g, color).map(|_| 0),
        None => Ok(0),
    }
}

/// Lay out `text` left to right.
///
/// `:` starts a new line, `.` ends the string early. Returns the width of
/// the last line drawn.
pub fn draw_string(
    fb: &mut FrameBuffer,
    x: i32,
    y: i32,
    text: &str,
    size: i32,
    color: u8,
) -> Result<i32, DrawError> {
    let (mut cx, mut cy) = (x, y);
    for c in text.chars() {
        if c == STR_END {
            break;
        }
        if c == STR_NEWLINE {
            cy += 6 * size;
            cx = x;
            continue;
        }
        cx += draw_char(fb, cx, cy, c, size, color)?;
        cx += 2 * size;
    }
    Ok(cx - x)
}

/// Draw a signed decimal number and return the width it occupies.
pub fn draw_number(
    fb: &mut FrameBuffer,
    x: i32,
    y: i32,
    number: i64,
    size: i32,
    color: u8,
) -> Result<i32, DrawError> {
    draw_number_padded(fb, x, y, number, 1, size, color)
}

/// Like `draw_number`, zero-padding the magnitude to `min_digits`.
///
/// One `size`-wide slot is reserved on the left for the sign marker; digits
/// are then emitted right to left, `2 * size` apart.
pub fn draw_number_padded(
    fb: &mut FrameBuffer,
    x: i32,
    y: i32,
    number: i64,
    min_digits: u32,
    size: i32,
    color: u8,
) -> Result<i32, DrawError> {
    let mut magnitude = number.unsigned_abs();
    let digits = count_digits(magnitude).max(min_digits.max(1)) as i32;
    let pitch = 2 * size;

    if number < 0 {
        fb.draw_line(x, y + 3 * size / 4, x + size, y + size / 2, color)?;
        fb.draw_line(x, y + 3 * size / 4 + 1, x + size, y + size / 2 + 1, color)?;
    }

    let mut dx = x + size + pitch * (digits - 1);
    for _ in 0..digits {
        draw_digit(fb, dx, y, (magnitude % 10) as u8, size, color)?;
        magnitude /= 10;
        dx -= pitch;
    }
    Ok(size + pitch * digits)
}

fn count_digits(mut n: u64) -> u32 {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}
