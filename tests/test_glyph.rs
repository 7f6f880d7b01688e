use black_division::error::DrawError;
use black_division::glyph::*;
use black_division::raster::FrameBuffer;

fn canvas() -> FrameBuffer {
    FrameBuffer::new(400, 200)
}

fn ink(fb: &FrameBuffer, color: u8) -> usize {
    fb.as_bytes().iter().filter(|p| **p == color).count()
}

// ── Lookup ────────────────────────────────────────────────────────────────────

#[test]
fn every_lowercase_letter_has_strokes() {
    for c in 'a'..='z' {
        let g = glyph_for(c).unwrap_or_else(|| panic!("missing {c}"));
        assert!(!g.strokes.is_empty(), "{c}");
    }
}

#[test]
fn punctuation_and_unknowns() {
    assert!(glyph_for('(').is_some());
    assert!(glyph_for(')').is_some());
    assert!(glyph_for('\'').is_some());
    assert!(glyph_for('A').is_none());
    assert!(glyph_for(' ').is_none());
    assert!(glyph_for('!').is_none());
}

#[test]
fn descender_and_wide_flags() {
    for c in ['g', 'j', 'p', 'q', 'y'] {
        assert!(glyph_for(c).unwrap().lowered, "{c}");
    }
    for c in ['m', 'w'] {
        assert!(glyph_for(c).unwrap().wide, "{c}");
    }
    assert!(glyph_for('i').unwrap().dot);
    assert!(!glyph_for('a').unwrap().lowered);
}

// ── Digits ────────────────────────────────────────────────────────────────────

#[test]
fn digit_returns_its_size() {
    let mut fb = canvas();
    assert_eq!(draw_digit(&mut fb, 10, 10, 8, 10, 5), Ok(10));
}

#[test]
fn one_lights_only_the_right_segments() {
    let mut fb = canvas();
    draw_digit(&mut fb, 0, 0, 1, 10, 5).unwrap();
    assert_eq!(fb.get_pixel(12, 5), Ok(5));
    assert_eq!(fb.get_pixel(12, 18), Ok(5));
    assert_eq!(fb.get_pixel(0, 5), Ok(0));
    assert_eq!(fb.get_pixel(6, 0), Ok(0));
}

#[test]
fn eight_has_more_ink_than_one() {
    let mut one = canvas();
    let mut eight = canvas();
    draw_digit(&mut one, 0, 0, 1, 10, 5).unwrap();
    draw_digit(&mut eight, 0, 0, 8, 10, 5).unwrap();
    assert!(ink(&eight, 5) > 3 * ink(&one, 5));
}

// ── Characters ────────────────────────────────────────────────────────────────

#[test]
fn char_advance_values() {
    let mut fb = canvas();
    assert_eq!(draw_char(&mut fb, 10, 10, 'a', 8, 5), Ok(4));
    assert_eq!(draw_char(&mut fb, 40, 10, 'm', 8, 5), Ok(20));
    assert_eq!(draw_char(&mut fb, 100, 10, '7', 8, 5), Ok(16));
    assert_eq!(draw_char(&mut fb, 140, 10, '(', 8, 5), Ok(0));
    assert_eq!(draw_char(&mut fb, 180, 10, ' ', 8, 5), Ok(0));
}

#[test]
fn letter_l_is_a_centre_stem() {
    let mut fb = canvas();
    draw_char(&mut fb, 10, 10, 'l', 8, 5).unwrap();
    assert_eq!(fb.get_pixel(18, 20), Ok(5));
    assert_eq!(fb.get_pixel(19, 40), Ok(5));
    assert_eq!(fb.get_pixel(10, 20), Ok(0));
}

#[test]
fn unknown_char_draws_nothing() {
    let mut fb = canvas();
    draw_char(&mut fb, 10, 10, '#', 8, 5).unwrap();
    assert_eq!(ink(&fb, 5), 0);
}

// ── Strings ───────────────────────────────────────────────────────────────────

#[test]
fn string_width_accumulates_advances() {
    let mut fb = canvas();
    assert_eq!(draw_string(&mut fb, 10, 10, "ab", 8, 5), Ok(40));
    assert_eq!(draw_string(&mut fb, 10, 60, "a b", 8, 5), Ok(56));
}

#[test]
fn period_terminates_the_string() {
    let mut full = canvas();
    let mut cut = canvas();
    assert_eq!(draw_string(&mut full, 10, 10, "ab", 8, 5), Ok(40));
    assert_eq!(draw_string(&mut cut, 10, 10, "ab.cd", 8, 5), Ok(40));
    assert_eq!(full.as_bytes(), cut.as_bytes());
}

#[test]
fn colon_starts_a_new_line() {
    let mut fb = canvas();
    assert_eq!(draw_string(&mut fb, 10, 10, "ab:l", 8, 5), Ok(20));
    // The 'l' stem starts one line (6 units) below the first.
    assert_eq!(fb.get_pixel(18, 60), Ok(5));
}

#[test]
fn string_running_off_the_buffer_fails() {
    let mut fb = canvas();
    let result = draw_string(&mut fb, 380, 10, "abc", 8, 5);
    assert!(matches!(result, Err(DrawError::OutOfBounds { .. })));
}

// ── Numbers ───────────────────────────────────────────────────────────────────

#[test]
fn number_width_includes_sign_slot() {
    let mut fb = canvas();
    assert_eq!(draw_number(&mut fb, 10, 10, 0, 10, 5), Ok(30));
    assert_eq!(draw_number(&mut fb, 10, 60, 1234, 10, 5), Ok(90));
}

#[test]
fn negative_number_draws_a_marker() {
    let mut pos = canvas();
    let mut neg = canvas();
    assert_eq!(draw_number(&mut pos, 10, 10, 5, 10, 5), Ok(30));
    assert_eq!(draw_number(&mut neg, 10, 10, -5, 10, 5), Ok(30));
    // Sign slot is blank for positives.
    assert!((10..20).all(|x| (10..=20).all(|y| pos.get_pixel(x, y) == Ok(0))));
    assert_eq!(neg.get_pixel(10, 17), Ok(5));
    assert!(ink(&neg, 5) > ink(&pos, 5));
}

#[test]
fn padded_number_keeps_leading_zeros() {
    let mut fb = canvas();
    assert_eq!(draw_number_padded(&mut fb, 10, 10, 7, 3, 6, 5), Ok(42));
    assert_eq!(draw_number_padded(&mut fb, 10, 60, 12345, 2, 6, 5), Ok(66));
}

#[test]
fn extreme_number_does_not_overflow() {
    let mut fb = FrameBuffer::new(900, 40);
    let width = draw_number(&mut fb, 0, 0, i64::MIN, 10, 5).unwrap();
    assert_eq!(width, 10 + 20 * 19);
}
