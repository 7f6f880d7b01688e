/// Tunables and fixed constants.
///
/// Layout positions follow the 1024x768 screen the game was designed for;
/// the board geometry is parameterized so the centre zone and octant lines
/// are derived rather than hardcoded.

use std::time::Duration;

// ── Screen ────────────────────────────────────────────────────────────────────

pub const H_RES: usize = 1024;
pub const V_RES: usize = 768;

// ── Palette (8-bit indices) ──────────────────────────────────────────────────

/// Board colours. Index 0 is never a safe or filler colour.
pub const PALETTE: [u8; 7] = [63, 36, 18, 27, 54, 38, 53];
/// Faded variants, used for bar colours near empty.
pub const PALETTE_FADED: [u8; 7] = [0, 4, 2, 57, 55, 20, 21];
/// Power (and score) taken when standing on `PALETTE[i]` at round end.
pub const PALETTE_TAKEAWAY: [i32; 7] = [100, 90, 20, 70, 50, 40, 30];

pub const WHITE: usize = 0;
pub const RED: usize = 1;
pub const GREEN: usize = 2;
pub const BLUE: usize = 3;
pub const YELLOW: usize = 4;
pub const ORANGE: usize = 5;

/// Colour of a danger ("black") hole. Standing on it forfeits a life.
pub const DANGER_COLOR: u8 = PALETTE_FADED[WHITE];
/// Drawn for divisions that have not been coloured yet this game.
pub const UNSET_COLOR: u8 = 8;

pub const CHAR_COLOR: u8 = 55;
pub const MENU_BACKGROUND: u8 = 57;
pub const GAME_BACKGROUND: u8 = 0;
pub const WALL_COLOR: u8 = 4;
pub const DATE_COLOR: u8 = 7;
pub const PLAYER_COLORS: [u8; 3] = [0, 32, 17];

// ── Text ──────────────────────────────────────────────────────────────────────

pub const CHAR_SIZE: i32 = 8;
pub const CHAR_SPACE: i32 = 12;
pub const STR_END: char = '.';
pub const STR_NEWLINE: char = ':';
/// Thickness of every glyph stroke.
pub const STROKE_WIDTH: i32 = 2;

// ── Scoring & difficulty ─────────────────────────────────────────────────────

pub const BASE_SCORE: i64 = 100;
pub const NEXT_LEVEL_SCORE: i64 = 200;
pub const BASE_DIFF_MULT: u32 = 8;

pub const DIVISIONS: usize = 8;
pub const DEFAULT_SAFE_HOLES: usize = 6;
pub const DEFAULT_BLACK_HOLES: usize = 0;
pub const MAX_BLACK_HOLES: usize = 6;
pub const MIN_SAFE_HOLES: usize = 2;
/// Sampling attempts per distribution pass before giving up.
pub const REASONABLE_ITERATIONS: u32 = 100;

pub const DEFAULT_WALL_SPEED: usize = 2;
/// Rings drawn in the wall colour starting at the active ring.
pub const WALL_BAND: usize = 4;

// ── Player & cursor ──────────────────────────────────────────────────────────

pub const MAX_POWER: i32 = 100;
pub const MAX_LIVES: u8 = 3;
pub const PLAYER_SPEED: i32 = 10;
pub const PLAYER_PIX_SIZE: i32 = 2;
/// Nudge applied when the player is pushed back in past the top/left wall.
pub const WALL_NUDGE: i32 = 2;

pub const CURSOR_PIX_SIZE: i32 = 2;
pub const CURSOR_BLOCK: i32 = 2;

/// Geometry of the square board and its closing wall.
///
/// `ring_count` concentric outlines are laid from the outer edge inward,
/// each `ring_step` pixels inside the previous one.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardGeometry {
    pub x: i32,
    pub y: i32,
    pub size: i32,
    pub ring_count: usize,
    pub ring_step: i32,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        BoardGeometry {
            x: 40,
            y: 40,
            size: 640,
            ring_count: 250,
            ring_step: 1,
        }
    }
}

impl BoardGeometry {
    pub fn x_end(&self) -> i32 {
        self.x + self.size
    }

    pub fn y_end(&self) -> i32 {
        self.y + self.size
    }

    /// The vertical line splitting the board into left and right halves.
    pub fn x_middle(&self) -> i32 {
        self.x + self.size / 2
    }

    pub fn y_middle(&self) -> i32 {
        self.y + self.size / 2
    }

    /// Top-left corner of the exempt centre zone, the area no ring ever covers.
    pub fn hole_origin(&self) -> (i32, i32) {
        let inset = self.ring_count as i32 * self.ring_step - 1;
        (self.x + inset, self.y + inset)
    }

    pub fn hole_size(&self) -> i32 {
        let uncovered = (self.size / 2 - self.ring_count as i32) * self.ring_step;
        uncovered * 2 + 3
    }
}

/// How the round generator places safe and danger holes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoleDistribution {
    /// Rejection sampling, abandoned after `ceiling` attempts per pass.
    BoundedRetry { ceiling: u32 },
    /// Exact sampling without replacement.
    Shuffle,
}

impl Default for HoleDistribution {
    fn default() -> Self {
        HoleDistribution::BoundedRetry {
            ceiling: REASONABLE_ITERATIONS,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub h_res: usize,
    pub v_res: usize,
    pub tick_rate: u32,
    /// Ticks between wall-clock samples.
    pub clock_resample: u64,
    /// Pause held on loss, quit and error screens.
    pub hold: Duration,
    pub board: BoardGeometry,
    pub distribution: HoleDistribution,
    /// Suppresses death-square and side-menu drawing and logs every event.
    pub debug: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            h_res: H_RES,
            v_res: V_RES,
            tick_rate: 60,
            clock_resample: 60,
            hold: Duration::from_secs(2),
            board: BoardGeometry::default(),
            distribution: HoleDistribution::default(),
            debug: false,
        }
    }
}

impl GameConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.tick_rate.max(1)))
    }
}
