use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

use black_division::devices::*;
use black_division::display::{palette_rgb, sample_block, TerminalDisplay};
use black_division::input::{Buttons, Cursor, MouseAssembler, MousePacket};
use black_division::raster::FrameBuffer;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn release(code: KeyCode) -> KeyEvent {
    KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

// ── Keyboard ──────────────────────────────────────────────────────────────────

#[test]
fn letters_become_make_and_break_codes() {
    let mut keys = KeyTranslator::new();
    let now = Instant::now();
    assert_eq!(keys.translate(press(KeyCode::Char('w')), now), vec![0x11]);
    assert_eq!(keys.translate(press(KeyCode::Char('D')), now), vec![0x20]);
    assert_eq!(keys.translate(release(KeyCode::Char('w')), now), vec![0x91]);
    assert_eq!(keys.translate(press(KeyCode::Char('x')), now), Vec::<u8>::new());
}

#[test]
fn arrows_are_two_byte_codes() {
    let mut keys = KeyTranslator::new();
    let now = Instant::now();
    assert_eq!(keys.translate(press(KeyCode::Up), now), vec![0xE0, 0x48]);
    assert_eq!(keys.translate(release(KeyCode::Up), now), vec![0xE0, 0xC8]);
    assert_eq!(keys.translate(press(KeyCode::Right), now), vec![0xE0, 0x4D]);
}

#[test]
fn esc_and_ctrl_c_cancel() {
    let mut keys = KeyTranslator::new();
    let now = Instant::now();
    assert_eq!(keys.translate(press(KeyCode::Esc), now), vec![0x01, 0x81]);
    assert_eq!(keys.translate(release(KeyCode::Esc), now), Vec::<u8>::new());
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(keys.translate(ctrl_c, now), vec![0x01, 0x81]);
}

#[test]
fn silent_keys_expire_after_hold_window() {
    let mut keys = KeyTranslator::new();
    let t0 = Instant::now();
    keys.translate(press(KeyCode::Char('a')), t0);
    assert!(keys.expire(t0 + HOLD_WINDOW / 2).is_empty());
    assert_eq!(keys.expire(t0 + HOLD_WINDOW + Duration::from_millis(1)), vec![0x9E]);
    assert!(keys.expire(t0 + 2 * HOLD_WINDOW).is_empty());
}

#[test]
fn repeats_keep_a_key_held() {
    let mut keys = KeyTranslator::new();
    let t0 = Instant::now();
    keys.translate(press(KeyCode::Char('s')), t0);
    let repeat = KeyEvent::new_with_kind(
        KeyCode::Char('s'),
        KeyModifiers::NONE,
        KeyEventKind::Repeat,
    );
    let t1 = t0 + HOLD_WINDOW - Duration::from_millis(10);
    assert_eq!(keys.translate(repeat, t1), vec![0x1F]);
    assert!(keys.expire(t0 + HOLD_WINDOW + Duration::from_millis(10)).is_empty());
}

#[test]
fn released_keys_do_not_expire_again() {
    let mut keys = KeyTranslator::new();
    let t0 = Instant::now();
    keys.translate(press(KeyCode::Char('d')), t0);
    keys.translate(release(KeyCode::Char('d')), t0);
    assert!(keys.expire(t0 + 2 * HOLD_WINDOW).is_empty());
}

// ── Mouse ─────────────────────────────────────────────────────────────────────

#[test]
fn encoded_packet_decodes_to_same_motion() {
    let bytes = encode_packet(Buttons::LEFT, 10, -20);
    assert_eq!(bytes, [0x08 | 0x01 | 0x20, 10, 236]);
    let packet = MousePacket::decode(bytes);
    assert_eq!((packet.dx, packet.dy), (10, -20));
    assert_eq!(packet.buttons(), Buttons::LEFT);
}

#[test]
fn long_moves_split_into_packets() {
    let mut translator = MouseTranslator::new(1024, 768);
    let bytes = translator.translate(mouse(MouseEventKind::Moved, 1, 0), 2, 1);
    assert_eq!(bytes.len() % 3, 0);
    assert_eq!(bytes.len(), 12);

    // Feeding them through the decoder lands the cursor on the cell centre.
    let mut assembler = MouseAssembler::new();
    let mut cursor = Cursor::new(1024, 768);
    for byte in bytes {
        if let Some(packet) = assembler.feed(byte) {
            cursor.apply(&packet);
        }
    }
    assert_eq!((cursor.x, cursor.y), (768, 384));
}

#[test]
fn button_state_rides_on_packets() {
    let mut translator = MouseTranslator::new(1024, 768);
    let down = translator.translate(mouse(MouseEventKind::Down(MouseButton::Left), 0, 0), 1024, 768);
    assert_eq!(down.len(), 3);
    assert!(MousePacket::decode([down[0], down[1], down[2]])
        .buttons()
        .contains(Buttons::LEFT));

    let up = translator.translate(mouse(MouseEventKind::Up(MouseButton::Left), 0, 0), 1024, 768);
    assert_eq!(up.len(), 3);
    assert!(MousePacket::decode([up[0], up[1], up[2]]).buttons().is_empty());
}

#[test]
fn scrolling_sends_nothing() {
    let mut translator = MouseTranslator::new(1024, 768);
    let bytes = translator.translate(mouse(MouseEventKind::ScrollDown, 5, 5), 80, 24);
    assert!(bytes.is_empty());
}

// ── Display ───────────────────────────────────────────────────────────────────

#[test]
fn palette_follows_rgb_bit_layout() {
    assert_eq!(palette_rgb(0), (0, 0, 0));
    assert_eq!(palette_rgb(63), (255, 255, 255));
    assert_eq!(palette_rgb(36), (255, 0, 0));
    assert_eq!(palette_rgb(18), (0, 255, 0));
    assert_eq!(palette_rgb(4), (170, 0, 0));
    assert_eq!(palette_rgb(32), (85, 0, 0));
    assert_eq!(palette_rgb(64 + 63), palette_rgb(63));
}

#[test]
fn block_sampling_keeps_thin_ink() {
    let mut fb = FrameBuffer::new(4, 4);
    fb.set_pixel(2, 1, 5).unwrap();
    assert_eq!(sample_block(&fb, (0, 4), (0, 4), 0), 5);
    assert_eq!(sample_block(&fb, (0, 2), (0, 2), 0), 0);
    assert_eq!(sample_block(&fb, (2, 3), (1, 2), 0), 5);
}

#[derive(Clone, Default)]
struct Sink(Rc<RefCell<Vec<u8>>>);

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn unchanged_frame_is_not_redrawn() {
    let sink = Sink::default();
    let mut display = TerminalDisplay::new(sink.clone());
    let mut fb = FrameBuffer::new(8, 8);
    fb.fill_region(0, 0, 4, 4, 36).unwrap();

    display.blit_sized(&fb, 4, 2).unwrap();
    let first = sink.0.borrow().len();
    assert!(String::from_utf8_lossy(&sink.0.borrow()).contains('▀'));

    sink.0.borrow_mut().clear();
    display.blit_sized(&fb, 4, 2).unwrap();
    let second = sink.0.borrow().len();
    assert!(second < first);
    assert!(!String::from_utf8_lossy(&sink.0.borrow()).contains('▀'));
}
