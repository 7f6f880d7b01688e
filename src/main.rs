use std::io::stdout;
use std::sync::mpsc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use black_division::config::GameConfig;
use black_division::devices::{subscribe, TerminalDevices};
use black_division::dispatch::{run, DeviceCommand, Devices, GameContext};
use black_division::error::{DeviceFailure, GameError};

/// Notifications buffered between the device threads and the dispatcher.
const QUEUE_DEPTH: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum RunMode {
    /// Play in the terminal.
    Game,
    /// Headless run that logs every event.
    Debug,
}

#[derive(Parser, Debug)]
#[command(name = "black_division")]
#[command(about = "Stay on the safe colour while the wall closes in")]
struct Cli {
    #[arg(value_enum)]
    mode: RunMode,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // A bad invocation shows usage but is not a failure.
            let _ = e.print();
            return Ok(());
        }
    };
    let debug = cli.mode == RunMode::Debug;

    let default_filter = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = GameConfig {
        debug,
        ..GameConfig::default()
    };

    let mut out = stdout();
    terminal::enable_raw_mode().context("could not enable raw mode")?;
    if !debug {
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;
    }
    // Ask for key-release events; terminals without them fall back to the
    // hold window in the input thread.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    let result = play(config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    if !debug {
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
    }
    let _ = terminal::disable_raw_mode();

    result
}

fn play(config: GameConfig) -> Result<()> {
    let (tx, rx) = mpsc::sync_channel(QUEUE_DEPTH);
    let mut devices = TerminalDevices::new(!config.debug);

    let mut failed = subscribe(&tx, &config).err().unwrap_or(DeviceFailure::empty());
    if let Err(e) = devices.command(DeviceCommand::EnableMouseStream) {
        error!(error = %e, "mouse capture");
        failed |= DeviceFailure::MOUSE_STREAM;
    }
    if !failed.is_empty() {
        for cause in failed.describe() {
            error!("{cause}");
        }
        return Err(GameError::Devices(failed).into());
    }
    // Only the device threads keep the channel open from here on.
    drop(tx);

    info!(debug = config.debug, "starting");
    let mut ctx = GameContext::new(config, StdRng::from_entropy());
    let outcome = run(&mut ctx, &rx, &mut devices);
    let _ = devices.command(DeviceCommand::DisableMouseStream);
    outcome.context("game loop failed")
}
