/// Player movement, collision and scoring.
///
/// Every function mutates only the values it is handed; board geometry is
/// passed in so the octant lines and the centre square follow the
/// configured board rather than fixed pixel positions.

use tracing::debug;

use crate::config::{
    BoardGeometry, BASE_DIFF_MULT, BASE_SCORE, DANGER_COLOR, MAX_LIVES, MAX_POWER,
    NEXT_LEVEL_SCORE, PALETTE, PALETTE_TAKEAWAY, PLAYER_PIX_SIZE, PLAYER_SPEED, WALL_NUDGE, WHITE,
};
use crate::entities::{
    Board, Direction, Division, Divisions, Player, Round, RoundOutcome, PLAYER_SPRITE,
};
use crate::input::KeyAction;
use crate::scenario::{advance_difficulty, advance_level};

// ── Constructors ─────────────────────────────────────────────────────────────

/// A fresh player standing at the board's centre lines.
pub fn init_player(board: &BoardGeometry) -> Player {
    Player {
        x: board.x_middle(),
        y: board.y_middle(),
        size: PLAYER_SPRITE.len() as i32 * PLAYER_PIX_SIZE,
        direction: Direction::Idle,
        speed: PLAYER_SPEED,
        power: MAX_POWER,
        lives: MAX_LIVES,
        score: 0,
    }
}

// ── Input-driven transitions ─────────────────────────────────────────────────

/// A press sets the direction; a release only stops the player when it
/// matches the direction currently held.
pub fn steer(player: &mut Player, action: KeyAction) {
    match action {
        KeyAction::Press(direction) => player.direction = direction,
        KeyAction::Release(direction) if player.direction == direction => {
            player.direction = Direction::Idle;
        }
        _ => {}
    }
}

// ── Per-tick movement ────────────────────────────────────────────────────────

pub fn update_position(player: &mut Player) {
    match player.direction {
        Direction::Up => player.y -= player.speed,
        Direction::Down => player.y += player.speed,
        Direction::Right => player.x += player.speed,
        Direction::Left => player.x -= player.speed,
        Direction::Idle => {}
    }
}

/// Push the player back inside the board. Any correction stops them.
/// Returns whether a wall was hit.
pub fn resolve_bounds_collision(player: &mut Player, board: &BoardGeometry) -> bool {
    let mut hit = false;
    if player.x < board.x {
        player.x = board.x + WALL_NUDGE;
        hit = true;
    } else if player.x_end() > board.x_end() {
        player.x = board.x_end() - player.size;
        hit = true;
    }
    if player.y < board.y {
        player.y = board.y + WALL_NUDGE;
        hit = true;
    } else if player.y_end() > board.y_end() {
        player.y = board.y_end() - player.size;
        hit = true;
    }
    if hit {
        player.direction = Direction::Idle;
    }
    hit
}

// ── Classification ───────────────────────────────────────────────────────────

/// Division containing the point `(x, y)`.
///
/// Points strictly inside the centre square are `Exempt`. Otherwise the board
/// is split into left/right halves and top/bottom quarters, and each quarter
/// into two octants by its corner diagonal. Points exactly on a diagonal fall
/// to the octant the strict comparison does not select.
pub fn classify_point(x: i32, y: i32, board: &BoardGeometry) -> Division {
    let (hx, hy) = board.hole_origin();
    let hole = board.hole_size();
    if x > hx && x < hx + hole && y > hy && y < hy + hole {
        return Division::Exempt;
    }

    let (rx, ry) = (x - board.x, y - board.y);
    let size = board.size;
    let octant = if x < board.x_middle() {
        if y < board.y_middle() {
            if rx > ry {
                0
            } else {
                7
            }
        } else if rx > size - ry {
            5
        } else {
            6
        }
    } else if y < board.y_middle() {
        if size - rx < ry {
            2
        } else {
            1
        }
    } else if rx > ry {
        3
    } else {
        4
    };
    Division::Octant(octant)
}

pub fn classify_division(player: &Player, board: &BoardGeometry) -> Division {
    let (cx, cy) = player.center();
    classify_point(cx, cy, board)
}

// ── Round end ────────────────────────────────────────────────────────────────

/// Charge the player for where they stand when the wall wraps.
pub fn evaluate_round_end(
    player: &mut Player,
    divisions: &Divisions,
    round: &Round,
    board: &BoardGeometry,
) -> RoundOutcome {
    let division = classify_division(player, board);
    let color = match division {
        Division::Exempt => None,
        Division::Octant(i) => divisions.get(i),
    };

    let outcome = match (division, color) {
        (Division::Exempt, _) => RoundOutcome::LifeLost,
        (_, Some(c)) if c == DANGER_COLOR => RoundOutcome::LifeLost,
        (_, Some(c)) if c != round.safe_color => PALETTE
            .iter()
            .skip(1)
            .position(|p| *p == c)
            .map(|i| RoundOutcome::Drained(PALETTE_TAKEAWAY[i + 1]))
            .unwrap_or(RoundOutcome::Safe),
        _ => RoundOutcome::Safe,
    };

    match outcome {
        RoundOutcome::LifeLost => {
            player.lives = player.lives.saturating_sub(1);
            player.score -= i64::from(PALETTE_TAKEAWAY[WHITE]);
        }
        RoundOutcome::Drained(amount) => {
            player.power -= amount;
            player.score -= i64::from(amount);
        }
        RoundOutcome::Safe => {}
    }
    debug!(?division, ?color, ?outcome, "round evaluated");
    outcome
}

/// Trade an exhausted power gauge for a life. Returns `true` on game over.
pub fn evaluate_lives(player: &mut Player) -> bool {
    if player.power <= 0 {
        player.lives = player.lives.saturating_sub(1);
        player.power = MAX_POWER;
    }
    player.lives == 0
}

/// Award the per-round score and level up when the threshold is reached.
/// Returns whether the level changed.
pub fn evaluate_score_progress(player: &mut Player, round: &mut Round, board: &mut Board) -> bool {
    player.score += BASE_SCORE;
    if player.score < round.next_level_score {
        return false;
    }
    advance_level(round);
    if round.level == round.difficulty * BASE_DIFF_MULT {
        advance_difficulty(round, board);
    }
    round.next_level_score = i64::from(round.level) * NEXT_LEVEL_SCORE;
    true
}
