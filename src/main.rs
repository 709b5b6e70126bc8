/// Entry point and game loop.
///
/// One input event is fully processed before the next is read: drain
/// keys, translate to a Command, apply it to the session, render. The
/// quit/restart confirmation prompts live here, not in the session —
/// the session only ever sees confirmed commands.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::Duration;

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::board::Direction;
use sim::session::{Command, GameSession, Phase};
use ui::input::InputState;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(10);

fn main() {
    let cli_scheme = std::env::args().nth(1);
    let config = GameConfig::load(cli_scheme.as_deref());

    let mut session = GameSession::new();
    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut session, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Final score: {}", session.score);
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];
const KEYS_YES: &[KeyCode] = &[KeyCode::Char('y'), KeyCode::Char('Y')];
const KEYS_NO: &[KeyCode] = &[KeyCode::Char('n'), KeyCode::Char('N'), KeyCode::Esc];

/// Pending shell-level confirmation, if any. While a prompt is up,
/// direction keys are ignored; only y / n / Esc answer it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Prompt {
    None,
    Quit,
    Restart,
}

impl Prompt {
    fn status_line(self) -> &'static str {
        match self {
            Prompt::None => "",
            Prompt::Quit => "QUIT? (y/n)",
            Prompt::Restart => "RESTART? (y/n)",
        }
    }
}

fn game_loop(
    session: &mut GameSession,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut prompt = Prompt::None;

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() {
            break;
        }

        match prompt {
            Prompt::Quit => {
                if kb.any_pressed(KEYS_YES) {
                    if !session.apply(Command::Quit) {
                        break;
                    }
                } else if kb.any_pressed(KEYS_NO) {
                    // Declined: redraw the unchanged state
                    prompt = Prompt::None;
                }
            }
            Prompt::Restart => {
                if kb.any_pressed(KEYS_YES) {
                    session.apply(Command::Restart);
                    prompt = Prompt::None;
                } else if kb.any_pressed(KEYS_NO) {
                    prompt = Prompt::None;
                }
            }
            Prompt::None => {
                if kb.any_pressed(KEYS_QUIT) {
                    // A finished game quits without asking
                    if session.phase == Phase::GameOver {
                        break;
                    }
                    prompt = Prompt::Quit;
                } else if kb.any_pressed(KEYS_RESTART) {
                    prompt = Prompt::Restart;
                } else if session.phase == Phase::GameOver
                    && kb.any_pressed(&[KeyCode::Enter, KeyCode::Esc])
                {
                    break;
                } else if let Some(direction) = detect_direction(&kb) {
                    session.apply(Command::Move(direction));
                }
                // Anything else: no-op
            }
        }

        renderer.render(session, prompt.status_line(), config.scheme)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn detect_direction(kb: &InputState) -> Option<Direction> {
    if kb.any_pressed(KEYS_UP) {
        Some(Direction::Up)
    } else if kb.any_pressed(KEYS_DOWN) {
        Some(Direction::Down)
    } else if kb.any_pressed(KEYS_LEFT) {
        Some(Direction::Left)
    } else if kb.any_pressed(KEYS_RIGHT) {
        Some(Direction::Right)
    } else {
        None
    }
}
