pub mod clock;
pub mod compute;
pub mod config;
pub mod devices;
pub mod dispatch;
pub mod display;
pub mod entities;
pub mod error;
pub mod glyph;
pub mod hud;
pub mod input;
pub mod raster;
pub mod scenario;
