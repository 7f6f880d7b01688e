use black_division::clock::RtcSnapshot;
use black_division::compute::init_player;
use black_division::config::*;
use black_division::entities::*;
use black_division::hud::*;
use black_division::input::Cursor;
use black_division::raster::FrameBuffer;
use black_division::scenario::{build_board, initial_round};

fn screen() -> FrameBuffer {
    FrameBuffer::new(H_RES, V_RES)
}

// ── hit_title ─────────────────────────────────────────────────────────────────

#[test]
fn click_inside_each_title() {
    assert_eq!(hit_title(150, 160), Some(TitleId::Play));
    assert_eq!(hit_title(150, 240), Some(TitleId::Help));
    assert_eq!(hit_title(150, 320), Some(TitleId::Options));
    assert_eq!(hit_title(150, 400), Some(TitleId::Credits));
    assert_eq!(hit_title(150, 470), Some(TitleId::Quit));
}

#[test]
fn title_edges_are_inclusive() {
    assert_eq!(hit_title(102, 153), Some(TitleId::Play));
    assert_eq!(hit_title(350, 185), Some(TitleId::Play));
    assert_eq!(hit_title(101, 160), None);
    assert_eq!(hit_title(351, 160), None);
    assert_eq!(hit_title(150, 186), None);
}

#[test]
fn banner_and_empty_space_miss() {
    assert_eq!(hit_title(150, 80), None);
    assert_eq!(hit_title(700, 700), None);
    assert_eq!(hit_title(0, 0), None);
}

// ── Gauges ────────────────────────────────────────────────────────────────────

#[test]
fn lives_gauge_scales_and_colours() {
    assert_eq!(lives_gauge(3), (248, PALETTE[GREEN]));
    assert_eq!(lives_gauge(2), (165, PALETTE[YELLOW]));
    assert_eq!(lives_gauge(1), (82, PALETTE[RED]));
    assert_eq!(lives_gauge(0), (0, PALETTE_FADED[RED]));
}

#[test]
fn power_gauge_scales_and_clamps() {
    assert_eq!(power_gauge(100), (248, PALETTE[BLUE]));
    assert_eq!(power_gauge(50).0, 124);
    assert_eq!(power_gauge(-40), (0, PALETTE_FADED[RED]));
    assert_eq!(power_gauge(150).0, 248);
}

#[test]
fn power_gauge_colour_bands() {
    assert_eq!(power_gauge(91).1, PALETTE[BLUE]);
    assert_eq!(power_gauge(90).1, PALETTE[GREEN]);
    assert_eq!(power_gauge(60).1, PALETTE[YELLOW]);
    assert_eq!(power_gauge(40).1, PALETTE[ORANGE]);
    assert_eq!(power_gauge(20).1, PALETTE_FADED[ORANGE]);
    assert_eq!(power_gauge(10).1, PALETTE_FADED[RED]);
}

// ── Screens fit on the display ────────────────────────────────────────────────

#[test]
fn menu_screens_draw_in_bounds() {
    let mut fb = screen();
    let rtc = RtcSnapshot::from_unix(1_000_000_000);
    draw_frame(&mut fb).unwrap();
    draw_menu(&mut fb, &rtc).unwrap();
    draw_help(&mut fb).unwrap();
    draw_options(&mut fb).unwrap();
    draw_credits(&mut fb).unwrap();
    assert!(fb.as_bytes().contains(&CHAR_COLOR));
    assert!(fb.as_bytes().contains(&DATE_COLOR));
}

#[test]
fn gameplay_screen_draws_in_bounds() {
    let mut fb = screen();
    let geometry = BoardGeometry::default();
    let mut board = build_board(&geometry);
    board.active = 247;
    let divisions = Divisions([Some(PALETTE[GREEN]); DIVISIONS]);
    let mut player = init_player(&geometry);
    player.score = -340;
    draw_board(&mut fb, &board, &divisions, false).unwrap();
    draw_player(&mut fb, &player).unwrap();
    draw_side_menu(&mut fb, &player, &initial_round()).unwrap();
    draw_hint(&mut fb).unwrap();
    assert_eq!(fb.get_pixel(40, 40), Ok(WALL_COLOR));
    assert!(fb.as_bytes().contains(&PALETTE[GREEN]));
}

#[test]
fn outline_only_board_skips_rings() {
    let mut fb = screen();
    let mut board = build_board(&BoardGeometry::default());
    board.active = 100;
    let divisions = Divisions([Some(PALETTE[BLUE]); DIVISIONS]);
    draw_board(&mut fb, &board, &divisions, true).unwrap();
    assert_eq!(fb.get_pixel(40, 40), Ok(WALL_COLOR));
    assert!(!fb.as_bytes().contains(&PALETTE[BLUE]));
}

#[test]
fn unset_divisions_draw_in_placeholder_colour() {
    let mut fb = screen();
    let mut board = build_board(&BoardGeometry::default());
    board.active = 10;
    draw_board(&mut fb, &board, &Divisions::default(), false).unwrap();
    let ring = board.rings[5];
    assert_eq!(fb.get_pixel(ring.x + 1, ring.y), Ok(UNSET_COLOR));
}

#[test]
fn cursor_in_the_far_corner_still_fits() {
    let mut fb = screen();
    let mut cursor = Cursor::new(H_RES, V_RES);
    cursor.x = 1013;
    cursor.y = 757;
    draw_cursor(&mut fb, &cursor).unwrap();
    assert_eq!(fb.get_pixel(1013, 757), Ok(CHAR_COLOR));
}

#[test]
fn summary_screens_use_menu_background() {
    let mut fb = screen();
    draw_loser_screen(&mut fb, -1200, 95).unwrap();
    assert_eq!(fb.get_pixel(1000, 700), Ok(MENU_BACKGROUND));
    draw_quit_screen(&mut fb, 400, 86_399).unwrap();
    assert_eq!(fb.get_pixel(0, 0), Ok(MENU_BACKGROUND));
}

#[test]
fn error_screen_clears_to_black() {
    let mut fb = screen();
    fb.fill(MENU_BACKGROUND);
    draw_error(&mut fb, "could not draw the frame.").unwrap();
    assert_eq!(fb.get_pixel(0, 0), Ok(GAME_BACKGROUND));
    assert!(fb.as_bytes().contains(&CHAR_COLOR));
}
