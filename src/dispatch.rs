/// The mode state machine and the blocking event loop that drives it.
///
/// One notification is handled per pass: timer work first, then the
/// keyboard, then the mouse. Every pass runs to completion before the next
/// notification is received, so the context needs no locking.

use std::io;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use bitflags::bitflags;
use rand::rngs::StdRng;
use tracing::{debug, error, info, warn};

use crate::clock::{play_time, RtcSnapshot, TimeSnapshot};
use crate::compute::{
    evaluate_lives, evaluate_round_end, evaluate_score_progress, init_player,
    resolve_bounds_collision, steer, update_position,
};
use crate::config::{GameConfig, GAME_BACKGROUND, MENU_BACKGROUND};
use crate::entities::{Board, Divisions, Mode, Player, Round, TitleId};
use crate::error::{DrawError, GameError};
use crate::hud;
use crate::input::{Cursor, KeyAction, KeyboardDecoder, MouseAssembler};
use crate::raster::FrameBuffer;
use crate::scenario::{advance_round, advance_wall, build_board, initial_round};

// ── Host interface ───────────────────────────────────────────────────────────

bitflags! {
    /// Sources with a pending event in one notification.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct EventFlags: u8 {
        const TIMER = 1 << 0;
        const KEYBOARD = 1 << 1;
        const MOUSE = 1 << 2;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct LedState: u8 {
        const SCROLL_LOCK = 1 << 0;
        const NUM_LOCK = 1 << 1;
        const CAPS_LOCK = 1 << 2;
    }
}

impl LedState {
    /// One more LED lit per remaining life.
    pub fn for_lives(lives: u8) -> Self {
        match lives {
            0 => LedState::empty(),
            1 => LedState::SCROLL_LOCK,
            2 => LedState::SCROLL_LOCK | LedState::NUM_LOCK,
            _ => LedState::all(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceCommand {
    SetLeds(LedState),
    EnableMouseStream,
    DisableMouseStream,
}

/// What the host delivered. Several sources may arrive together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Notification {
    pub tick: bool,
    pub scancode: Option<u8>,
    pub mouse_byte: Option<u8>,
}

impl Notification {
    pub fn tick() -> Self {
        Notification {
            tick: true,
            ..Default::default()
        }
    }

    pub fn scancode(code: u8) -> Self {
        Notification {
            scancode: Some(code),
            ..Default::default()
        }
    }

    pub fn mouse_byte(byte: u8) -> Self {
        Notification {
            mouse_byte: Some(byte),
            ..Default::default()
        }
    }

    pub fn events(&self) -> EventFlags {
        let mut events = EventFlags::empty();
        events.set(EventFlags::TIMER, self.tick);
        events.set(EventFlags::KEYBOARD, self.scancode.is_some());
        events.set(EventFlags::MOUSE, self.mouse_byte.is_some());
        events
    }
}

/// Everything the engine needs from the outside world.
pub trait Devices {
    /// Copy the finished frame to the screen.
    fn blit(&mut self, frame: &FrameBuffer) -> io::Result<()>;
    fn command(&mut self, command: DeviceCommand) -> io::Result<()>;
    fn clock(&mut self) -> RtcSnapshot;
    /// Block for a fixed pause. Only used for end-of-game and error screens.
    fn hold(&mut self, duration: Duration);
}

// ── Context ──────────────────────────────────────────────────────────────────

/// All engine state, owned by the dispatcher.
pub struct GameContext {
    pub config: GameConfig,
    pub mode: Mode,
    pub frame: FrameBuffer,
    pub player: Player,
    pub board: Board,
    pub divisions: Divisions,
    pub round: Round,
    pub keyboard: KeyboardDecoder,
    pub mouse: MouseAssembler,
    pub cursor: Cursor,
    /// Last wall-clock sample.
    pub rtc: RtcSnapshot,
    pub start: Option<TimeSnapshot>,
    pub end: Option<TimeSnapshot>,
    /// The first wall cycle of a game is not scored.
    pub first_round: bool,
    pub ticks: u64,
    /// LEDs last sent to the keyboard.
    pub leds: Option<LedState>,
    pub rng: StdRng,
}

impl GameContext {
    pub fn new(config: GameConfig, rng: StdRng) -> Self {
        GameContext {
            mode: Mode::MainMenu,
            frame: FrameBuffer::new(config.h_res, config.v_res),
            player: init_player(&config.board),
            board: build_board(&config.board),
            divisions: Divisions::default(),
            round: initial_round(),
            keyboard: KeyboardDecoder::new(),
            mouse: MouseAssembler::new(),
            cursor: Cursor::new(config.h_res, config.v_res),
            rtc: RtcSnapshot::default(),
            start: None,
            end: None,
            first_round: true,
            ticks: 0,
            leds: None,
            rng,
            config,
        }
    }

    /// Put the player, board and round back to their start-of-game state.
    pub fn reset_game(&mut self) {
        self.player = init_player(&self.config.board);
        self.board = build_board(&self.config.board);
        self.divisions.clear();
        self.round = initial_round();
        self.first_round = true;
        self.start = None;
        self.end = None;
    }

    fn sync_leds(&mut self, dev: &mut impl Devices) -> io::Result<()> {
        let wanted = LedState::for_lives(self.player.lives);
        if self.leds != Some(wanted) {
            dev.command(DeviceCommand::SetLeds(wanted))?;
            self.leds = Some(wanted);
        }
        Ok(())
    }
}

// ── Mode table ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Stay,
    Enter(Mode),
    Start,
    Lost,
    Quit,
    Terminate,
}

/// A frame that could not be drawn, with the message shown in its place.
#[derive(Clone, Copy, Debug)]
struct Failure {
    message: &'static str,
    error: DrawError,
}

trait OrFail<T> {
    fn or_fail(self, message: &'static str) -> Result<T, Failure>;
}

impl<T> OrFail<T> for Result<T, DrawError> {
    fn or_fail(self, message: &'static str) -> Result<T, Failure> {
        self.map_err(|error| Failure { message, error })
    }
}

struct ModeHandlers {
    /// Per-tick update and draw.
    tick: fn(&mut GameContext) -> Result<Step, Failure>,
    /// Effect of the cancel key.
    cancel: Step,
}

static MAIN_MENU: ModeHandlers = ModeHandlers {
    tick: tick_main_menu,
    cancel: Step::Terminate,
};
static HELP: ModeHandlers = ModeHandlers {
    tick: tick_help,
    cancel: Step::Enter(Mode::MainMenu),
};
static OPTIONS: ModeHandlers = ModeHandlers {
    tick: tick_options,
    cancel: Step::Enter(Mode::MainMenu),
};
static CREDITS: ModeHandlers = ModeHandlers {
    tick: tick_credits,
    cancel: Step::Enter(Mode::MainMenu),
};
static GAMEPLAY: ModeHandlers = ModeHandlers {
    tick: tick_gameplay,
    cancel: Step::Quit,
};

fn handlers(mode: Mode) -> &'static ModeHandlers {
    match mode {
        Mode::MainMenu => &MAIN_MENU,
        Mode::Help => &HELP,
        Mode::Options => &OPTIONS,
        Mode::Credits => &CREDITS,
        Mode::Gameplay => &GAMEPLAY,
    }
}

// ── Per-mode passes ──────────────────────────────────────────────────────────

fn menu_backdrop(ctx: &mut GameContext) -> Result<(), Failure> {
    ctx.frame.fill(MENU_BACKGROUND);
    hud::draw_frame(&mut ctx.frame).or_fail("error in drawframe.")
}

fn tick_main_menu(ctx: &mut GameContext) -> Result<Step, Failure> {
    menu_backdrop(ctx)?;
    hud::draw_menu(&mut ctx.frame, &ctx.rtc).or_fail("error in drawmenu.")?;
    hud::draw_cursor(&mut ctx.frame, &ctx.cursor).or_fail("error in drawcursor.")?;
    Ok(Step::Stay)
}

fn tick_help(ctx: &mut GameContext) -> Result<Step, Failure> {
    menu_backdrop(ctx)?;
    hud::draw_help(&mut ctx.frame).or_fail("error in drawhelp.")?;
    hud::draw_cursor(&mut ctx.frame, &ctx.cursor).or_fail("error in drawcursor.")?;
    Ok(Step::Stay)
}

fn tick_options(ctx: &mut GameContext) -> Result<Step, Failure> {
    menu_backdrop(ctx)?;
    hud::draw_options(&mut ctx.frame).or_fail("error in drawoptions.")?;
    hud::draw_cursor(&mut ctx.frame, &ctx.cursor).or_fail("error in drawcursor.")?;
    Ok(Step::Stay)
}

fn tick_credits(ctx: &mut GameContext) -> Result<Step, Failure> {
    menu_backdrop(ctx)?;
    hud::draw_credits(&mut ctx.frame).or_fail("error in drawcredits.")?;
    hud::draw_cursor(&mut ctx.frame, &ctx.cursor).or_fail("error in drawcursor.")?;
    Ok(Step::Stay)
}

fn tick_gameplay(ctx: &mut GameContext) -> Result<Step, Failure> {
    ctx.frame.fill(GAME_BACKGROUND);
    hud::draw_frame(&mut ctx.frame).or_fail("error in drawframe.")?;
    let wrapped = advance_wall(&mut ctx.board);
    hud::draw_hint(&mut ctx.frame).or_fail("error in drawstring.")?;

    if wrapped {
        if ctx.first_round {
            ctx.first_round = false;
        } else {
            let geometry = &ctx.config.board;
            evaluate_round_end(&mut ctx.player, &ctx.divisions, &ctx.round, geometry);
            if evaluate_lives(&mut ctx.player) {
                return Ok(Step::Lost);
            }
        }
        evaluate_score_progress(&mut ctx.player, &mut ctx.round, &mut ctx.board);
        advance_round(
            &mut ctx.divisions,
            &mut ctx.round,
            ctx.config.distribution,
            &mut ctx.rng,
        );
        info!(
            score = ctx.player.score,
            power = ctx.player.power,
            lives = ctx.player.lives,
            safe_color = ctx.round.safe_color,
            "new round"
        );
    }

    update_position(&mut ctx.player);
    resolve_bounds_collision(&mut ctx.player, &ctx.config.board);

    let debug = ctx.config.debug;
    if !debug {
        hud::draw_side_menu(&mut ctx.frame, &ctx.player, &ctx.round)
            .or_fail("error in drawsidemenu.")?;
    }
    hud::draw_board(&mut ctx.frame, &ctx.board, &ctx.divisions, debug)
        .or_fail("error in drawscenario.")?;
    hud::draw_player(&mut ctx.frame, &ctx.player).or_fail("error in drawplayer.")?;
    Ok(Step::Stay)
}

// ── Event handlers ───────────────────────────────────────────────────────────

fn on_tick(ctx: &mut GameContext, dev: &mut impl Devices) -> Result<Step, Failure> {
    if ctx.ticks % ctx.config.clock_resample.max(1) == 0 {
        ctx.rtc = dev.clock();
    }
    ctx.ticks += 1;
    (handlers(ctx.mode).tick)(ctx)
}

fn on_key(ctx: &mut GameContext, code: u8) -> Step {
    let action = ctx.keyboard.feed(code);
    debug!(?action, "keyboard code {code:#04x}");
    match action {
        KeyAction::Cancel => handlers(ctx.mode).cancel,
        _ if ctx.mode == Mode::Gameplay => {
            steer(&mut ctx.player, action);
            Step::Stay
        }
        _ => Step::Stay,
    }
}

fn on_mouse(ctx: &mut GameContext, byte: u8) -> Step {
    let Some(packet) = ctx.mouse.feed(byte) else {
        return Step::Stay;
    };
    ctx.cursor.apply(&packet);
    debug!(
        x = ctx.cursor.x,
        y = ctx.cursor.y,
        buttons = ?ctx.cursor.buttons,
        "mouse"
    );
    if ctx.mode != Mode::MainMenu || !ctx.cursor.left_pressed() {
        return Step::Stay;
    }
    match hud::hit_title(ctx.cursor.x, ctx.cursor.y) {
        Some(TitleId::Play) => Step::Start,
        Some(TitleId::Help) => Step::Enter(Mode::Help),
        Some(TitleId::Options) => Step::Enter(Mode::Options),
        Some(TitleId::Credits) => Step::Enter(Mode::Credits),
        Some(TitleId::Quit) => Step::Terminate,
        Some(TitleId::Banner) | None => Step::Stay,
    }
}

// ── Dispatch ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Terminate,
}

/// Run one pass for `note`. Only host I/O failures are returned as errors;
/// drawing failures are shown on screen and recovered from here.
pub fn dispatch(
    ctx: &mut GameContext,
    note: Notification,
    dev: &mut impl Devices,
) -> Result<Flow, GameError> {
    let events = note.events();
    let mut step = Step::Stay;

    if events.contains(EventFlags::TIMER) {
        step = match on_tick(ctx, dev) {
            Ok(step) => step,
            Err(failure) => return recover(ctx, failure, dev),
        };
        if step == Step::Stay {
            if ctx.mode == Mode::Gameplay {
                ctx.sync_leds(dev)?;
            }
            dev.blit(&ctx.frame)?;
        }
    }
    if step == Step::Stay && events.contains(EventFlags::KEYBOARD) {
        if let Some(code) = note.scancode {
            step = on_key(ctx, code);
        }
    }
    if step == Step::Stay && events.contains(EventFlags::MOUSE) {
        if let Some(byte) = note.mouse_byte {
            step = on_mouse(ctx, byte);
        }
    }
    apply(ctx, step, dev)
}

fn apply(ctx: &mut GameContext, step: Step, dev: &mut impl Devices) -> Result<Flow, GameError> {
    match step {
        Step::Stay => {}
        Step::Enter(mode) => {
            info!(from = ?ctx.mode, to = ?mode, "mode change");
            ctx.mode = mode;
        }
        Step::Start => {
            ctx.start = Some(TimeSnapshot::from(&dev.clock()));
            info!(start = ?ctx.start, "game started");
            ctx.mode = Mode::Gameplay;
        }
        Step::Lost | Step::Quit => {
            ctx.sync_leds(dev)?;
            let end = TimeSnapshot::from(&dev.clock());
            let seconds = play_time(&ctx.start.unwrap_or(end), &end);
            ctx.end = Some(end);
            let score = ctx.player.score;
            info!(outcome = ?step, score, seconds, "game over");

            let drawn = if step == Step::Lost {
                hud::draw_loser_screen(&mut ctx.frame, score, seconds)
            } else {
                hud::draw_quit_screen(&mut ctx.frame, score, seconds)
            };
            match drawn {
                Ok(()) => dev.blit(&ctx.frame)?,
                Err(e) => warn!(error = %e, "could not draw the summary screen"),
            }
            dev.hold(ctx.config.hold);
            ctx.reset_game();
            ctx.mode = Mode::MainMenu;
        }
        Step::Terminate => {
            info!(from = ?ctx.mode, "terminating");
            return Ok(Flow::Terminate);
        }
    }
    Ok(Flow::Continue)
}

/// Show the failure, hold, then fall back to the menu from gameplay or stop
/// from any menu screen.
fn recover(
    ctx: &mut GameContext,
    failure: Failure,
    dev: &mut impl Devices,
) -> Result<Flow, GameError> {
    error!(mode = ?ctx.mode, error = %failure.error, "{}", failure.message);
    match hud::draw_error(&mut ctx.frame, failure.message) {
        Ok(()) => dev.blit(&ctx.frame)?,
        Err(e) => warn!(error = %e, "could not draw the error screen"),
    }
    dev.hold(ctx.config.hold);

    if ctx.mode == Mode::Gameplay {
        ctx.reset_game();
        ctx.mode = Mode::MainMenu;
        return Ok(Flow::Continue);
    }
    Ok(Flow::Terminate)
}

/// Block on `rx`, one dispatch pass per notification, until the game asks to
/// stop or every sender is gone. LEDs are cleared on the way out.
pub fn run(
    ctx: &mut GameContext,
    rx: &Receiver<Notification>,
    dev: &mut impl Devices,
) -> Result<(), GameError> {
    ctx.rtc = dev.clock();
    ctx.sync_leds(dev)?;
    while let Ok(note) = rx.recv() {
        if dispatch(ctx, note, dev)? == Flow::Terminate {
            break;
        }
    }
    dev.command(DeviceCommand::SetLeds(LedState::empty()))?;
    ctx.leds = Some(LedState::empty());
    Ok(())
}
