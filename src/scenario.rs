/// Board construction, per-round colouring and level progression.
///
/// All randomness comes through the injected RNG so a seeded generator
/// reproduces a whole game.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::config::{
    BoardGeometry, HoleDistribution, DANGER_COLOR, DEFAULT_BLACK_HOLES, DEFAULT_SAFE_HOLES,
    DEFAULT_WALL_SPEED, DIVISIONS, MAX_BLACK_HOLES, MIN_SAFE_HOLES, NEXT_LEVEL_SCORE, PALETTE,
};
use crate::entities::{Board, Divisions, Ring, Round};

/// Ring the wall restarts from after each wrap.
pub const WALL_START: usize = 1;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Lay the rings out from the outer edge inward, `ring_step` apart.
pub fn build_board(geometry: &BoardGeometry) -> Board {
    let count = geometry.ring_count;
    let rings = (0..count)
        .map(|i| {
            let inset = (count - 1 - i) as i32 * geometry.ring_step;
            Ring {
                x: geometry.x + inset,
                y: geometry.y + inset,
                size: geometry.size - 2 * inset,
            }
        })
        .collect();
    Board {
        rings,
        active: WALL_START,
        speed: DEFAULT_WALL_SPEED,
    }
}

/// Round state at the start of a game. The safe colour is the danger colour
/// until the first board is coloured.
pub fn initial_round() -> Round {
    Round {
        safe_color: DANGER_COLOR,
        safe_holes: DEFAULT_SAFE_HOLES,
        black_holes: DEFAULT_BLACK_HOLES,
        level: 1,
        difficulty: 1,
        next_level_score: NEXT_LEVEL_SCORE,
    }
}

// ── Wall ─────────────────────────────────────────────────────────────────────

/// Move the wall outward by its speed. Returns `true` when it wrapped back to
/// the start, which ends the round.
pub fn advance_wall(board: &mut Board) -> bool {
    board.active += board.speed;
    if board.active >= board.rings.len().saturating_sub(1) {
        board.active = WALL_START;
        return true;
    }
    false
}

// ── Round colouring ──────────────────────────────────────────────────────────

/// How many holes of each kind actually landed on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub safe: usize,
    pub black: usize,
}

/// Pick a new safe colour and colour all eight divisions.
///
/// `round.safe_holes` divisions get the safe colour and `round.black_holes`
/// the danger colour; the rest get random palette colours other than the safe
/// one. Under `BoundedRetry` a pass that runs out of attempts stops early and
/// the board keeps fewer holes of that kind.
pub fn advance_round(
    divisions: &mut Divisions,
    round: &mut Round,
    policy: HoleDistribution,
    rng: &mut impl Rng,
) -> Placement {
    // Index 0 of the palette is never a board colour.
    let safe_index = rng.gen_range(1..PALETTE.len());
    round.safe_color = PALETTE[safe_index];
    divisions.clear();

    let placement = match policy {
        HoleDistribution::BoundedRetry { ceiling } => {
            distribute_bounded(divisions, round, ceiling, rng)
        }
        HoleDistribution::Shuffle => distribute_shuffled(divisions, round, rng),
    };
    if placement.safe < round.safe_holes || placement.black < round.black_holes {
        debug!(
            wanted_safe = round.safe_holes,
            wanted_black = round.black_holes,
            safe = placement.safe,
            black = placement.black,
            "hole distribution gave up early"
        );
    }

    for slot in divisions.0.iter_mut() {
        if *slot == Some(round.safe_color) || *slot == Some(DANGER_COLOR) {
            continue;
        }
        let mut filler = rng.gen_range(1..PALETTE.len() - 1);
        if filler >= safe_index {
            filler += 1;
        }
        *slot = Some(PALETTE[filler]);
    }
    placement
}

fn distribute_bounded(
    divisions: &mut Divisions,
    round: &Round,
    ceiling: u32,
    rng: &mut impl Rng,
) -> Placement {
    let safe = round.safe_color;
    let mut placed_safe = 0;
    let mut attempts = 0;
    while placed_safe < round.safe_holes && attempts <= ceiling {
        let i = rng.gen_range(0..DIVISIONS);
        if divisions.0[i] != Some(safe) {
            divisions.0[i] = Some(safe);
            placed_safe += 1;
        }
        attempts += 1;
    }

    let mut placed_black = 0;
    attempts = 0;
    while placed_black < round.black_holes && attempts <= ceiling {
        let i = rng.gen_range(0..DIVISIONS);
        if divisions.0[i] != Some(safe) && divisions.0[i] != Some(DANGER_COLOR) {
            divisions.0[i] = Some(DANGER_COLOR);
            placed_black += 1;
        }
        attempts += 1;
    }
    Placement {
        safe: placed_safe,
        black: placed_black,
    }
}

fn distribute_shuffled(divisions: &mut Divisions, round: &Round, rng: &mut impl Rng) -> Placement {
    let mut slots: [usize; DIVISIONS] = core::array::from_fn(|i| i);
    slots.shuffle(rng);
    let safe = round.safe_holes.min(DIVISIONS);
    let black = round.black_holes.min(DIVISIONS - safe);
    for &i in &slots[..safe] {
        divisions.0[i] = Some(round.safe_color);
    }
    for &i in &slots[safe..safe + black] {
        divisions.0[i] = Some(DANGER_COLOR);
    }
    Placement { safe, black }
}

// ── Levels ───────────────────────────────────────────────────────────────────

/// One more danger hole (up to the cap), one fewer safe hole (down to the floor).
pub fn advance_level(round: &mut Round) {
    round.level += 1;
    if round.black_holes < MAX_BLACK_HOLES {
        round.black_holes += 1;
    }
    if round.safe_holes > MIN_SAFE_HOLES {
        round.safe_holes -= 1;
    }
    info!(
        level = round.level,
        safe_holes = round.safe_holes,
        black_holes = round.black_holes,
        "level up"
    );
}

/// Speed the wall up and put the hole counts back to their defaults.
pub fn advance_difficulty(round: &mut Round, board: &mut Board) {
    round.difficulty += 1;
    board.speed += 1;
    round.safe_holes = DEFAULT_SAFE_HOLES;
    round.black_holes = DEFAULT_BLACK_HOLES;
    info!(
        difficulty = round.difficulty,
        wall_speed = board.speed,
        "difficulty up"
    );
}
