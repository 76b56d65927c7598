/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod logging;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use tracing::{info, warn};

use config::GameConfig;
use domain::actor::Direction;
use error::GameResult;
use sim::session::Session;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let (config, config_err) = match GameConfig::load() {
        Ok(cfg) => (cfg, None),
        Err(e) => (GameConfig::default(), Some(e)),
    };

    if let Err(e) = logging::init(&config.log) {
        eprintln!("{e}; continuing without a log");
    }
    if let Some(e) = config_err {
        warn!("{e}; using defaults");
    }
    info!(tick_rate_ms = config.speed.tick_rate_ms, seed = ?config.seed, "starting");

    let mut session = Session::new(config.seed);
    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    session.start_new_game();
    let result = game_loop(&mut session, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        warn!("{e}");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Maze Chase!");
    println!("Final Score: {}", session.score());
}

fn game_loop(
    session: &mut Session,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> GameResult<()> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) || gp.cancel_pressed() {
            session.quit();
            break;
        }

        if kb.any_pressed(KEYS_NEW_GAME) || gp.confirm_pressed() {
            session.start_new_game();
            last_tick = Instant::now();
        }

        if let Some(dir) = detect_direction(&kb, &gp) {
            session.set_player_direction(dir);
        }

        if session.is_running() && last_tick.elapsed() >= tick_rate {
            session.tick();
            last_tick = Instant::now();
        }

        renderer.render(session)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_NEW_GAME: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char('n'), KeyCode::Char('N')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

/// Latest direction pressed this frame; the keyboard wins over the pad.
fn detect_direction(kb: &InputState, gp: &GamepadState) -> Option<Direction> {
    let all: Vec<KeyCode> = [KEYS_UP, KEYS_DOWN, KEYS_LEFT, KEYS_RIGHT].concat();
    kb.last_pressed_of(&all)
        .map(|key| {
            if KEYS_UP.contains(&key) {
                Direction::Up
            } else if KEYS_DOWN.contains(&key) {
                Direction::Down
            } else if KEYS_LEFT.contains(&key) {
                Direction::Left
            } else {
                Direction::Right
            }
        })
        .or_else(|| gp.direction_pressed())
}
