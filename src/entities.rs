/// Game entity types: plain data plus a few read-only helpers.

use crate::config::{DIVISIONS, UNSET_COLOR};

// ── Modes ─────────────────────────────────────────────────────────────────────

/// Top-level dispatcher state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    MainMenu,
    Help,
    Options,
    Credits,
    Gameplay,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Idle,
    Up,
    Down,
    Left,
    Right,
}

/// Digits index `PLAYER_COLORS`; blanks are transparent.
pub const PLAYER_SPRITE: [&str; 21] = [
    "        2   2        ",
    "       212 212       ",
    "      212   212      ",
    "     212     212     ",
    "    212       212    ",
    "   212         212   ",
    "  212     1     212  ",
    " 212     111     212 ",
    "212     11211     212",
    " 2     112 211     2 ",
    "      112   211      ",
    " 2     112 211     2 ",
    "212     11211     212",
    " 212     111     212 ",
    "  212     1     212  ",
    "   212         212   ",
    "    212       212    ",
    "     212     212     ",
    "      212   212      ",
    "       212 212       ",
    "        2   2        ",
];

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: i32,
    pub y: i32,
    /// Edge length in pixels.
    pub size: i32,
    pub direction: Direction,
    pub speed: i32,
    pub power: i32,
    pub lives: u8,
    pub score: i64,
}

impl Player {
    pub fn x_end(&self) -> i32 {
        self.x + self.size
    }

    pub fn y_end(&self) -> i32 {
        self.y + self.size
    }

    pub fn center(&self) -> (i32, i32) {
        ((self.x + self.x_end()) / 2, (self.y + self.y_end()) / 2)
    }
}

// ── Board ─────────────────────────────────────────────────────────────────────

/// One square outline of the closing wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ring {
    pub x: i32,
    pub y: i32,
    pub size: i32,
}

/// Concentric rings, index 0 innermost, plus the wall position.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    pub rings: Vec<Ring>,
    /// Ring the wall currently sits on. A round ends each time it wraps.
    pub active: usize,
    /// Rings advanced per gameplay tick.
    pub speed: usize,
}

impl Board {
    pub fn outermost(&self) -> Option<&Ring> {
        self.rings.last()
    }
}

/// Colour of each of the eight angular sectors, `None` until assigned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Divisions(pub [Option<u8>; DIVISIONS]);

impl Divisions {
    pub fn get(&self, division: usize) -> Option<u8> {
        self.0.get(division).copied().flatten()
    }

    pub fn clear(&mut self) {
        self.0 = [None; DIVISIONS];
    }

    pub fn count(&self, color: u8) -> usize {
        self.0.iter().filter(|c| **c == Some(color)).count()
    }

    /// Colours ready for `draw_segmented_square`.
    pub fn palette(&self) -> [u8; DIVISIONS] {
        self.0.map(|c| c.unwrap_or(UNSET_COLOR))
    }
}

/// Which sector the player's centre occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Division {
    Octant(usize),
    /// The centre square no ring ever covers.
    Exempt,
}

// ── Round & level ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Round {
    pub safe_color: u8,
    pub safe_holes: usize,
    pub black_holes: usize,
    pub level: u32,
    pub difficulty: u32,
    pub next_level_score: i64,
}

/// What a finished wall cycle did to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    Safe,
    /// Stood on a non-safe colour: power and score reduced by this amount.
    Drained(i32),
    /// Stood on a danger hole or the centre square.
    LifeLost,
}

// ── UI widgets ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TitleId {
    Banner,
    Play,
    Help,
    Options,
    Credits,
    Quit,
}

/// A menu label and its clickable box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Title {
    pub id: TitleId,
    pub label: &'static str,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Whether a click on the box selects it.
    pub clickable: bool,
}

const MENU_X: i32 = 102;
const BAR_LENGTH: i32 = 248;
const BAR_HEIGHT: i32 = 32;

const fn title(id: TitleId, label: &'static str, y: i32, clickable: bool) -> Title {
    Title {
        id,
        label,
        x: MENU_X,
        y,
        width: BAR_LENGTH,
        height: BAR_HEIGHT,
        clickable,
    }
}

pub const TITLES: [Title; 6] = [
    title(TitleId::Banner, "black division.", 76, false),
    title(TitleId::Play, "play.", 153, true),
    title(TitleId::Help, "help.", 230, true),
    title(TitleId::Options, "options.", 307, true),
    title(TitleId::Credits, "credits.", 384, true),
    title(TitleId::Quit, "quit.", 460, true),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarId {
    Lives,
    Power,
    SafeColor,
    Score,
    Level,
    NextLevel,
}

/// A side-menu entry. For gauges `width` is the full length and `height`
/// the fill height; for readouts `width` is the offset of the number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bar {
    pub id: BarId,
    pub label: &'static str,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

pub const BAR_X: i32 = 716;

const fn bar(id: BarId, label: &'static str, y: i32, width: i32, height: i32) -> Bar {
    Bar {
        id,
        label,
        x: BAR_X,
        y,
        width,
        height,
    }
}

pub const BARS: [Bar; 6] = [
    bar(BarId::Lives, "lives.", 76, BAR_LENGTH, BAR_HEIGHT),
    bar(BarId::Power, "power.", 153, BAR_LENGTH, BAR_HEIGHT),
    bar(BarId::SafeColor, "safe color.", 230, BAR_LENGTH, 8 * BAR_HEIGHT),
    bar(BarId::Score, "score.", 563, BAR_LENGTH / 2, BAR_HEIGHT),
    bar(BarId::Level, "level.", 640, BAR_LENGTH / 2, BAR_HEIGHT),
    bar(BarId::NextLevel, "next level.", 716, 3 * BAR_LENGTH / 4, BAR_HEIGHT),
];

pub fn bar_for(id: BarId) -> &'static Bar {
    match id {
        BarId::Lives => &BARS[0],
        BarId::Power => &BARS[1],
        BarId::SafeColor => &BARS[2],
        BarId::Score => &BARS[3],
        BarId::Level => &BARS[4],
        BarId::NextLevel => &BARS[5],
    }
}
