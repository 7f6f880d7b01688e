/// Decoders for the raw bytes the keyboard and mouse deliver.

use bitflags::bitflags;

use crate::config::CURSOR_PIX_SIZE;
use crate::entities::Direction;

// ── Keyboard ──────────────────────────────────────────────────────────────────

/// Prefix announcing a two-byte scancode.
pub const TWO_BYTE_PREFIX: u8 = 0xE0;
/// Set on break (release) codes.
pub const BREAK_BIT: u8 = 0x80;

pub const MAKE_W: u8 = 0x11;
pub const MAKE_A: u8 = 0x1E;
pub const MAKE_S: u8 = 0x1F;
pub const MAKE_D: u8 = 0x20;
pub const MAKE_ESC: u8 = 0x01;
/// Esc break code, the universal cancel key.
pub const CANCEL: u8 = MAKE_ESC | BREAK_BIT;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Cancel,
    Press(Direction),
    Release(Direction),
    Ignored,
}

#[derive(Clone, Debug, Default)]
pub struct KeyboardDecoder {
    /// Last raw byte received, prefix bytes included.
    pub last_code: Option<u8>,
    extended: bool,
}

impl KeyboardDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, code: u8) -> KeyAction {
        self.last_code = Some(code);
        if code == TWO_BYTE_PREFIX {
            self.extended = true;
            return KeyAction::Ignored;
        }
        // The byte after a prefix belongs to keys the game has no use for.
        if std::mem::take(&mut self.extended) {
            return KeyAction::Ignored;
        }
        if code == CANCEL {
            return KeyAction::Cancel;
        }
        let direction = match code & !BREAK_BIT {
            MAKE_W => Direction::Up,
            MAKE_S => Direction::Down,
            MAKE_D => Direction::Right,
            MAKE_A => Direction::Left,
            _ => return KeyAction::Ignored,
        };
        if code & BREAK_BIT != 0 {
            KeyAction::Release(direction)
        } else {
            KeyAction::Press(direction)
        }
    }
}

// ── Mouse ─────────────────────────────────────────────────────────────────────

bitflags! {
    /// First byte of a mouse packet.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PacketFlags: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const MIDDLE = 1 << 2;
        /// Always set on a packet's first byte.
        const SYNC = 1 << 3;
        const X_SIGN = 1 << 4;
        const Y_SIGN = 1 << 5;
        const X_OVERFLOW = 1 << 6;
        const Y_OVERFLOW = 1 << 7;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Buttons: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const MIDDLE = 1 << 2;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MousePacket {
    pub flags: PacketFlags,
    pub dx: i16,
    pub dy: i16,
}

impl MousePacket {
    pub fn decode(bytes: [u8; 3]) -> Self {
        let flags = PacketFlags::from_bits_retain(bytes[0]);
        let extend = |raw: u8, negative: bool| {
            if negative {
                i16::from(raw) - 256
            } else {
                i16::from(raw)
            }
        };
        MousePacket {
            flags,
            dx: extend(bytes[1], flags.contains(PacketFlags::X_SIGN)),
            dy: extend(bytes[2], flags.contains(PacketFlags::Y_SIGN)),
        }
    }

    pub fn overflowed(&self) -> bool {
        self.flags
            .intersects(PacketFlags::X_OVERFLOW | PacketFlags::Y_OVERFLOW)
    }

    pub fn buttons(&self) -> Buttons {
        Buttons::from_bits_truncate(self.flags.bits())
    }
}

/// Collects raw mouse bytes into three-byte packets.
#[derive(Clone, Debug, Default)]
pub struct MouseAssembler {
    bytes: [u8; 3],
    count: usize,
}

impl MouseAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.count
    }

    /// Returns a packet once three bytes are in. A first byte without the
    /// sync bit is dropped and assembly starts over.
    pub fn feed(&mut self, byte: u8) -> Option<MousePacket> {
        if self.count == 0 && byte & PacketFlags::SYNC.bits() == 0 {
            return None;
        }
        self.bytes[self.count] = byte;
        self.count += 1;
        if self.count < 3 {
            return None;
        }
        self.count = 0;
        Some(MousePacket::decode(self.bytes))
    }
}

/// On-screen pointer driven by mouse packets.
#[derive(Clone, Debug, PartialEq)]
pub struct Cursor {
    pub x: i32,
    pub y: i32,
    /// Edge length of the sprite in pixels.
    pub size: i32,
    pub buttons: Buttons,
    limit_x: i32,
    limit_y: i32,
}

pub const CURSOR_SPRITE: [&str; 5] = ["7777 ", "77   ", "7 7  ", "7  7 ", "    7"];

impl Cursor {
    pub fn new(h_res: usize, v_res: usize) -> Self {
        let size = CURSOR_SPRITE.len() as i32 * CURSOR_PIX_SIZE;
        Cursor {
            x: 1,
            y: 1,
            size,
            buttons: Buttons::empty(),
            limit_x: h_res as i32 - size,
            limit_y: v_res as i32 - size,
        }
    }

    /// Move by the packet's deltas (skipped on overflow) and take its
    /// button state. The position stays inside `[0, screen - size)`.
    pub fn apply(&mut self, packet: &MousePacket) {
        if !packet.overflowed() {
            self.x += i32::from(packet.dx);
            // Mouse y grows upwards, the screen's grows downwards.
            self.y -= i32::from(packet.dy);
        }
        self.x = self.x.clamp(0, self.limit_x - 1);
        self.y = self.y.clamp(0, self.limit_y - 1);
        self.buttons = packet.buttons();
    }

    pub fn left_pressed(&self) -> bool {
        self.buttons.contains(Buttons::LEFT)
    }
}
