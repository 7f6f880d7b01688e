use core::fmt;

use bitflags::bitflags;

/// A drawing request that could not be honoured. Nothing is clipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawError {
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
    /// A square or rectangle with no extent.
    EmptyShape,
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(f, "pixel ({x}, {y}) outside {width}x{height} buffer"),
            Self::EmptyShape => write!(f, "shape has zero size"),
        }
    }
}

impl std::error::Error for DrawError {}

bitflags! {
    /// Devices that failed to start. Each bit is reported on its own.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct DeviceFailure: u8 {
        const TIMER = 1 << 0;
        const KEYBOARD = 1 << 1;
        const MOUSE = 1 << 2;
        const MOUSE_STREAM = 1 << 3;
    }
}

impl DeviceFailure {
    pub fn describe(self) -> Vec<&'static str> {
        let mut causes = Vec::new();
        if self.contains(Self::TIMER) {
            causes.push("could not subscribe the timer");
        }
        if self.contains(Self::KEYBOARD) {
            causes.push("could not subscribe the keyboard");
        }
        if self.contains(Self::MOUSE) {
            causes.push("could not subscribe the mouse");
        }
        if self.contains(Self::MOUSE_STREAM) {
            causes.push("could not enable the mouse stream");
        }
        causes
    }
}

#[derive(Debug)]
pub enum GameError {
    Draw(DrawError),
    Io(std::io::Error),
    Devices(DeviceFailure),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draw(e) => write!(f, "draw failed: {e}"),
            Self::Io(e) => write!(f, "i/o failed: {e}"),
            Self::Devices(failed) => {
                write!(f, "device startup failed: {}", failed.describe().join(", "))
            }
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Draw(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Devices(_) => None,
        }
    }
}

impl From<DrawError> for GameError {
    fn from(e: DrawError) -> Self {
        GameError::Draw(e)
    }
}

impl From<std::io::Error> for GameError {
    fn from(e: std::io::Error) -> Self {
        GameError::Io(e)
    }
}
