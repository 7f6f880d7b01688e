/// Host side of the engine: a timer thread and a terminal input thread that
/// turn crossterm events into the raw bytes real hardware would deliver, and
/// the `Devices` implementation the dispatcher talks back to.

use std::collections::HashMap;
use std::io::{self, BufWriter, Stdout};
use std::sync::mpsc::SyncSender;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::{execute, terminal};
use tracing::{debug, info, warn};

use crate::clock::RtcSnapshot;
use crate::config::GameConfig;
use crate::dispatch::{DeviceCommand, Devices, Notification};
use crate::display::TerminalDisplay;
use crate::error::DeviceFailure;
use crate::input::{
    Buttons, PacketFlags, BREAK_BIT, CANCEL, MAKE_A, MAKE_D, MAKE_ESC, MAKE_S, MAKE_W,
    TWO_BYTE_PREFIX,
};
use crate::raster::FrameBuffer;

/// A key counts as held while press or repeat events keep arriving within
/// this window. Terminals that never report releases rely on it.
pub const HOLD_WINDOW: Duration = Duration::from_millis(250);

/// How long the input thread waits for an event before checking held keys.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Largest delta one mouse packet can carry.
const MAX_PACKET_DELTA: i32 = 255;

// ── Keyboard ──────────────────────────────────────────────────────────────────

/// Make-code sequence for a key, or `None` for keys the keyboard does not
/// report. Arrow keys are two-byte codes.
fn make_codes(code: KeyCode) -> Option<&'static [u8]> {
    match code {
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => Some(&[MAKE_W]),
            'a' => Some(&[MAKE_A]),
            's' => Some(&[MAKE_S]),
            'd' => Some(&[MAKE_D]),
            _ => None,
        },
        KeyCode::Up => Some(&[TWO_BYTE_PREFIX, 0x48]),
        KeyCode::Down => Some(&[TWO_BYTE_PREFIX, 0x50]),
        KeyCode::Left => Some(&[TWO_BYTE_PREFIX, 0x4B]),
        KeyCode::Right => Some(&[TWO_BYTE_PREFIX, 0x4D]),
        _ => None,
    }
}

fn break_codes(make: &[u8]) -> Vec<u8> {
    let mut codes = make.to_vec();
    if let Some(last) = codes.last_mut() {
        *last |= BREAK_BIT;
    }
    codes
}

fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Turns key events into scancodes, synthesizing break codes for keys that
/// stop repeating without a release event.
#[derive(Debug, Default)]
pub struct KeyTranslator {
    held: HashMap<KeyCode, Instant>,
}

impl KeyTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, key: KeyEvent, now: Instant) -> Vec<u8> {
        let ctrl_c =
            key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
        if key.code == KeyCode::Esc || ctrl_c {
            // Esc is reported as a complete tap; its break code is the cancel key.
            return match key.kind {
                KeyEventKind::Release => Vec::new(),
                _ => vec![MAKE_ESC, CANCEL],
            };
        }

        let code = normalize(key.code);
        let Some(make) = make_codes(code) else {
            return Vec::new();
        };
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.held.insert(code, now);
                make.to_vec()
            }
            KeyEventKind::Release => {
                self.held.remove(&code);
                break_codes(make)
            }
        }
    }

    /// Break codes for every key silent for longer than `HOLD_WINDOW`.
    pub fn expire(&mut self, now: Instant) -> Vec<u8> {
        let mut codes = Vec::new();
        self.held.retain(|code, last| {
            if now.duration_since(*last) <= HOLD_WINDOW {
                return true;
            }
            if let Some(make) = make_codes(*code) {
                codes.extend(break_codes(make));
            }
            false
        });
        codes
    }
}

// ── Mouse ─────────────────────────────────────────────────────────────────────

/// Encode one three-byte packet. Deltas must fit in -255..=255; `dy` is
/// positive upwards.
pub fn encode_packet(buttons: Buttons, dx: i32, dy: i32) -> [u8; 3] {
    let mut flags = PacketFlags::SYNC | PacketFlags::from_bits_truncate(buttons.bits());
    if dx < 0 {
        flags |= PacketFlags::X_SIGN;
    }
    if dy < 0 {
        flags |= PacketFlags::Y_SIGN;
    }
    [flags.bits(), dx as u8, dy as u8]
}

/// Turns absolute terminal mouse positions into relative packets.
#[derive(Debug)]
pub struct MouseTranslator {
    x: i32,
    y: i32,
    buttons: Buttons,
    h_res: i32,
    v_res: i32,
}

impl MouseTranslator {
    /// Starts where the on-screen cursor starts.
    pub fn new(h_res: usize, v_res: usize) -> Self {
        MouseTranslator {
            x: 1,
            y: 1,
            buttons: Buttons::empty(),
            h_res: h_res as i32,
            v_res: v_res as i32,
        }
    }

    /// Packet bytes moving the pointer to the centre of the event's cell on
    /// a `cols` x `rows` terminal. Long moves are split over several packets.
    pub fn translate(&mut self, event: MouseEvent, cols: u16, rows: u16) -> Vec<u8> {
        let button = |b: MouseButton| match b {
            MouseButton::Left => Buttons::LEFT,
            MouseButton::Right => Buttons::RIGHT,
            MouseButton::Middle => Buttons::MIDDLE,
        };
        match event.kind {
            MouseEventKind::Down(b) => self.buttons.insert(button(b)),
            MouseEventKind::Up(b) => self.buttons.remove(button(b)),
            MouseEventKind::Drag(_) | MouseEventKind::Moved => {}
            _ => return Vec::new(),
        }

        let (cols, rows) = (i32::from(cols.max(1)), i32::from(rows.max(1)));
        let tx = (2 * i32::from(event.column) + 1) * self.h_res / (2 * cols);
        let ty = (2 * i32::from(event.row) + 1) * self.v_res / (2 * rows);
        let (mut dx, mut dy) = (tx - self.x, ty - self.y);
        self.x = tx;
        self.y = ty;

        let mut bytes = Vec::with_capacity(3);
        loop {
            let sx = dx.clamp(-MAX_PACKET_DELTA, MAX_PACKET_DELTA);
            let sy = dy.clamp(-MAX_PACKET_DELTA, MAX_PACKET_DELTA);
            // Screen y grows downwards, mouse y upwards.
            bytes.extend(encode_packet(self.buttons, sx, -sy));
            dx -= sx;
            dy -= sy;
            if dx == 0 && dy == 0 {
                break;
            }
        }
        bytes
    }
}

// ── Threads ───────────────────────────────────────────────────────────────────

fn spawn_timer(tx: SyncSender<Notification>, interval: Duration) -> io::Result<()> {
    thread::Builder::new()
        .name("timer".into())
        .spawn(move || {
            let mut next = Instant::now() + interval;
            loop {
                let now = Instant::now();
                if next > now {
                    thread::sleep(next - now);
                }
                next += interval;
                if tx.send(Notification::tick()).is_err() {
                    break; // dispatcher gone
                }
            }
        })
        .map(|_| ())
}

fn spawn_input(tx: SyncSender<Notification>, h_res: usize, v_res: usize) -> io::Result<()> {
    thread::Builder::new()
        .name("input".into())
        .spawn(move || {
            let mut keys = KeyTranslator::new();
            let mut mouse = MouseTranslator::new(h_res, v_res);
            loop {
                let mut scancodes = Vec::new();
                let mut mouse_bytes = Vec::new();
                match event::poll(POLL_INTERVAL) {
                    Ok(true) => match event::read() {
                        Ok(Event::Key(key)) => scancodes = keys.translate(key, Instant::now()),
                        Ok(Event::Mouse(m)) => {
                            let (cols, rows) = terminal::size().unwrap_or((80, 24));
                            mouse_bytes = mouse.translate(m, cols, rows);
                        }
                        Ok(_) => {}
                        Err(e) => {
                            warn!(error = %e, "terminal input closed");
                            break;
                        }
                    },
                    Ok(false) => {}
                    Err(e) => {
                        warn!(error = %e, "terminal input closed");
                        break;
                    }
                }
                scancodes.extend(keys.expire(Instant::now()));

                let notes = scancodes
                    .into_iter()
                    .map(Notification::scancode)
                    .chain(mouse_bytes.into_iter().map(Notification::mouse_byte));
                for note in notes {
                    if tx.send(note).is_err() {
                        return;
                    }
                }
            }
        })
        .map(|_| ())
}

/// Start the timer and input sources. Every source that could not be
/// started sets its own bit in the returned failure.
pub fn subscribe(tx: &SyncSender<Notification>, config: &GameConfig) -> Result<(), DeviceFailure> {
    let mut failed = DeviceFailure::empty();
    if let Err(e) = spawn_timer(tx.clone(), config.tick_interval()) {
        warn!(error = %e, "timer thread");
        failed |= DeviceFailure::TIMER;
    }
    // Keyboard and mouse share the terminal's event stream.
    if let Err(e) = spawn_input(tx.clone(), config.h_res, config.v_res) {
        warn!(error = %e, "input thread");
        failed |= DeviceFailure::KEYBOARD | DeviceFailure::MOUSE;
    }
    if failed.is_empty() {
        Ok(())
    } else {
        Err(failed)
    }
}

// ── Devices ───────────────────────────────────────────────────────────────────

/// Current UTC time as clock registers.
pub fn system_rtc() -> RtcSnapshot {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    RtcSnapshot::from_unix(secs)
}

pub struct TerminalDevices {
    /// `None` runs headless: frames are discarded.
    display: Option<TerminalDisplay<BufWriter<Stdout>>>,
}

impl TerminalDevices {
    pub fn new(video: bool) -> Self {
        TerminalDevices {
            display: video.then(|| TerminalDisplay::new(BufWriter::new(io::stdout()))),
        }
    }
}

impl Devices for TerminalDevices {
    fn blit(&mut self, frame: &FrameBuffer) -> io::Result<()> {
        match &mut self.display {
            Some(display) => display.blit(frame),
            None => Ok(()),
        }
    }

    fn command(&mut self, command: DeviceCommand) -> io::Result<()> {
        match command {
            // A terminal has no LEDs to drive.
            DeviceCommand::SetLeds(leds) => {
                info!(?leds, "keyboard leds");
                Ok(())
            }
            DeviceCommand::EnableMouseStream => {
                debug!("mouse stream on");
                execute!(io::stdout(), EnableMouseCapture)
            }
            DeviceCommand::DisableMouseStream => {
                debug!("mouse stream off");
                execute!(io::stdout(), DisableMouseCapture)
            }
        }
    }

    fn clock(&mut self) -> RtcSnapshot {
        system_rtc()
    }

    fn hold(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}
