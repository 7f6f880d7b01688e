/// Menus, side bars, sprites and full-screen messages, all composed from
/// raster primitives and the vector font.

use crate::clock::RtcSnapshot;
use crate::config::{
    BLUE, CHAR_COLOR, CHAR_SIZE, CHAR_SPACE, CURSOR_BLOCK, CURSOR_PIX_SIZE, DATE_COLOR,
    GAME_BACKGROUND, GREEN, MAX_LIVES, MAX_POWER, MENU_BACKGROUND, ORANGE, PALETTE,
    PALETTE_FADED, PLAYER_COLORS, PLAYER_PIX_SIZE, RED, WALL_BAND, WALL_COLOR, WHITE, YELLOW,
};
use crate::entities::{
    bar_for, BarId, Board, Divisions, Player, Round, TitleId, PLAYER_SPRITE, TITLES,
};
use crate::error::DrawError;
use crate::glyph::{draw_number, draw_number_padded, draw_string};
use crate::input::{Cursor, CURSOR_SPRITE};
use crate::raster::FrameBuffer;

type DrawResult = Result<(), DrawError>;

const FRAME_LINES: i32 = 4;

const TEXT_X: i32 = 51;
const TEXT_Y: i32 = 38;
const SCREEN_Y: i32 = 15;
const HINT_X: i32 = 204;
const HINT_Y: i32 = 706;
const HINT_SIZE: i32 = 6;

const DATE_X: i32 = 716;
const DATE_Y: i32 = 76;
const DATE_SIZE: i32 = 10;
const MONTH_SIZE: i32 = 6;
const DATE_LINE: i32 = 40;

const ERROR_X: i32 = 102;
const ERROR_Y: i32 = 76;

/// Gap between a gauge's label and its fill.
const BAR_TOP: i32 = 48;
const BAR_BOTTOM: i32 = 32;

pub const HELP_TEXT: &str = "the game consists in escaping the bad colors::\
each round a safe color is chosen::\
if the player's figure is not on that color:\
upon the round's ending the player loses:\
a life or power, depending on the color of:\
the tile the player is in::\
(a round is the time that the red square:\
takes to fill the game board)::\
use 'a' 'w' 's' 'd' to control the figure::\
exit   (esc).";

pub const OPTIONS_TEXT: &str = " there are no options actually.";

pub const CREDITS_TEXT: &str = " black division:::\
  an arcade game about standing:\
  on the right colour:::::\
  press esc to return to the menu.";

pub const HINT_TEXT: &str = "keep in the safe color.";

// ── Common ───────────────────────────────────────────────────────────────────

/// Four nested outlines around the screen edge.
pub fn draw_frame(fb: &mut FrameBuffer) -> DrawResult {
    let (w, h) = (fb.width() as i32, fb.height() as i32);
    for i in 1..=FRAME_LINES {
        fb.draw_rectangle(i, i, w - i, h - i, CHAR_COLOR)?;
    }
    Ok(())
}

pub fn draw_cursor(fb: &mut FrameBuffer, cursor: &Cursor) -> DrawResult {
    draw_sprite(fb, cursor.x, cursor.y, &CURSOR_SPRITE, CURSOR_PIX_SIZE, CURSOR_BLOCK, |_| {
        CHAR_COLOR
    })
}

/// Paint every non-blank sprite cell as a `block`-sized square, cells `pitch` apart.
fn draw_sprite(
    fb: &mut FrameBuffer,
    x: i32,
    y: i32,
    rows: &[&str],
    pitch: i32,
    block: i32,
    color_of: impl Fn(char) -> u8,
) -> DrawResult {
    for (i, row) in rows.iter().enumerate() {
        for (j, cell) in row.chars().enumerate() {
            if cell == ' ' {
                continue;
            }
            let (px, py) = (x + j as i32 * pitch, y + i as i32 * pitch);
            fb.fill_region(px, py, px + block, py + block, color_of(cell))?;
        }
    }
    Ok(())
}

/// Clear to black and show `message`. Used when a frame could not be drawn.
pub fn draw_error(fb: &mut FrameBuffer, message: &str) -> DrawResult {
    fb.fill(GAME_BACKGROUND);
    draw_string(fb, ERROR_X, ERROR_Y, message, CHAR_SIZE, CHAR_COLOR).map(|_| ())
}

// ── Menus ────────────────────────────────────────────────────────────────────

/// Title under the point, if any. Box edges count as inside; the banner
/// never matches.
pub fn hit_title(x: i32, y: i32) -> Option<TitleId> {
    TITLES
        .iter()
        .filter(|t| t.clickable)
        .find(|t| x >= t.x && x <= t.x + t.width && y >= t.y && y <= t.y + t.height)
        .map(|t| t.id)
}

pub fn draw_menu(fb: &mut FrameBuffer, rtc: &RtcSnapshot) -> DrawResult {
    draw_date(fb, rtc)?;
    for t in &TITLES {
        draw_string(fb, t.x, t.y, t.label, CHAR_SIZE, CHAR_COLOR)?;
    }
    Ok(())
}

/// Day and month on one line, `hh mm ss` below.
pub fn draw_date(fb: &mut FrameBuffer, rtc: &RtcSnapshot) -> DrawResult {
    let mut x = DATE_X;
    x += draw_number_padded(fb, x, DATE_Y, rtc.day_of_month().into(), 2, DATE_SIZE, DATE_COLOR)?;
    x += 2 * DATE_SIZE;
    draw_string(fb, x, DATE_Y, rtc.month_name(), MONTH_SIZE, DATE_COLOR)?;

    let y = DATE_Y + DATE_LINE;
    x = DATE_X;
    for (i, part) in [rtc.hours(), rtc.minutes(), rtc.seconds()].into_iter().enumerate() {
        if i > 0 {
            x += DATE_SIZE + 4;
        }
        x += draw_number_padded(fb, x, y, part.into(), 2, DATE_SIZE, DATE_COLOR)?;
    }
    Ok(())
}

pub fn draw_help(fb: &mut FrameBuffer) -> DrawResult {
    draw_string(fb, TEXT_X, TEXT_Y, HELP_TEXT, CHAR_SIZE, CHAR_COLOR).map(|_| ())
}

pub fn draw_options(fb: &mut FrameBuffer) -> DrawResult {
    draw_string(fb, TEXT_X, TEXT_Y, OPTIONS_TEXT, CHAR_SIZE, CHAR_COLOR).map(|_| ())
}

pub fn draw_credits(fb: &mut FrameBuffer) -> DrawResult {
    draw_string(fb, TEXT_X, TEXT_Y, CREDITS_TEXT, CHAR_SIZE, CHAR_COLOR).map(|_| ())
}

// ── Gameplay ─────────────────────────────────────────────────────────────────

pub fn draw_hint(fb: &mut FrameBuffer) -> DrawResult {
    draw_string(fb, HINT_X, HINT_Y, HINT_TEXT, HINT_SIZE, CHAR_COLOR).map(|_| ())
}

/// The outer edge in the wall colour, every ring inside the wall in its
/// division colours, and the wall itself as a band of `WALL_BAND` rings.
/// With `outline_only` just the outer edge is drawn.
pub fn draw_board(
    fb: &mut FrameBuffer,
    board: &Board,
    divisions: &Divisions,
    outline_only: bool,
) -> DrawResult {
    let Some(outer) = board.outermost() else {
        return Ok(());
    };
    fb.draw_square(outer.x, outer.y, outer.size, WALL_COLOR)?;
    if outline_only {
        return Ok(());
    }

    let colors = divisions.palette();
    for ring in board.rings.iter().take(board.active).skip(1) {
        fb.draw_segmented_square(ring.x, ring.y, ring.size, &colors)?;
    }
    for ring in board.rings.iter().skip(board.active).take(WALL_BAND) {
        fb.draw_square(ring.x, ring.y, ring.size, WALL_COLOR)?;
    }
    Ok(())
}

pub fn draw_player(fb: &mut FrameBuffer, player: &Player) -> DrawResult {
    draw_sprite(fb, player.x, player.y, &PLAYER_SPRITE, PLAYER_PIX_SIZE, PLAYER_PIX_SIZE, |c| {
        let index = c.to_digit(10).unwrap_or(0) as usize;
        PLAYER_COLORS.get(index).copied().unwrap_or(PLAYER_COLORS[0])
    })
}

/// Fill length and colour of the lives gauge.
pub fn lives_gauge(lives: u8) -> (i32, u8) {
    let full = bar_for(BarId::Lives).width;
    let length = full * i32::from(lives.min(MAX_LIVES)) / i32::from(MAX_LIVES);
    let color = match lives {
        1 => PALETTE[RED],
        2 => PALETTE[YELLOW],
        3.. => PALETTE[GREEN],
        0 => PALETTE_FADED[RED],
    };
    (length, color)
}

/// Fill length and colour of the power gauge.
pub fn power_gauge(power: i32) -> (i32, u8) {
    let full = bar_for(BarId::Power).width;
    let length = full * power.clamp(0, MAX_POWER) / MAX_POWER;
    let color = match power {
        p if p > 90 => PALETTE[BLUE],
        p if p > 70 => PALETTE[GREEN],
        p if p > 50 => PALETTE[YELLOW],
        p if p > 30 => PALETTE[ORANGE],
        p if p > 10 => PALETTE_FADED[ORANGE],
        _ => PALETTE_FADED[RED],
    };
    (length, color)
}

fn draw_gauge(fb: &mut FrameBuffer, id: BarId, length: i32, color: u8) -> DrawResult {
    let bar = bar_for(id);
    draw_string(fb, bar.x, bar.y, bar.label, CHAR_SIZE, CHAR_COLOR)?;
    let bottom = bar.y + BAR_BOTTOM + bar.height;
    fb.fill_region(bar.x, bar.y + BAR_TOP, bar.x + length, bottom, color)?;
    fb.draw_rectangle(
        bar.x - 1,
        bar.y - 1 + BAR_TOP,
        bar.x + bar_for(BarId::Lives).width,
        bottom,
        PALETTE[WHITE],
    )
}

fn draw_readout(fb: &mut FrameBuffer, id: BarId, value: i64, color: u8) -> DrawResult {
    let bar = bar_for(id);
    draw_string(fb, bar.x, bar.y, bar.label, CHAR_SIZE, CHAR_COLOR)?;
    draw_number(fb, bar.x + bar.width, bar.y + CHAR_SPACE, value, CHAR_SIZE, color).map(|_| ())
}

/// Gauges, the safe-colour swatch and the score readouts.
pub fn draw_side_menu(fb: &mut FrameBuffer, player: &Player, round: &Round) -> DrawResult {
    let (length, color) = lives_gauge(player.lives);
    draw_gauge(fb, BarId::Lives, length, color)?;
    let (length, color) = power_gauge(player.power);
    draw_gauge(fb, BarId::Power, length, color)?;
    let swatch = bar_for(BarId::SafeColor).width;
    draw_gauge(fb, BarId::SafeColor, swatch, round.safe_color)?;

    let score_color = if player.score > 0 {
        PALETTE[GREEN]
    } else {
        PALETTE[RED]
    };
    draw_readout(fb, BarId::Score, player.score, score_color)?;
    draw_readout(fb, BarId::Level, round.level.into(), PALETTE[WHITE])?;
    draw_readout(fb, BarId::NextLevel, round.next_level_score, PALETTE[WHITE])
}

// ── End of game ──────────────────────────────────────────────────────────────

/// Headline, final score and seconds played on the menu background.
pub fn draw_summary(fb: &mut FrameBuffer, headline: &str, score: i64, seconds: i64) -> DrawResult {
    fb.fill(MENU_BACKGROUND);
    let mut y = SCREEN_Y;
    draw_string(fb, TEXT_X, y, headline, CHAR_SIZE, CHAR_COLOR)?;
    for (label, value) in [("score.", score), ("time played (sec).", seconds)] {
        y += 8 * CHAR_SIZE;
        let x = TEXT_X + draw_string(fb, TEXT_X, y, label, CHAR_SIZE, CHAR_COLOR)? + 2 * CHAR_SPACE;
        y += CHAR_SPACE - 1;
        draw_number(fb, x, y, value, CHAR_SIZE, PALETTE[GREEN])?;
    }
    Ok(())
}

pub fn draw_loser_screen(fb: &mut FrameBuffer, score: i64, seconds: i64) -> DrawResult {
    draw_summary(fb, "you kinda lost.", score, seconds)
}

pub fn draw_quit_screen(fb: &mut FrameBuffer, score: i64, seconds: i64) -> DrawResult {
    draw_summary(fb, "you quitter.", score, seconds)
}
