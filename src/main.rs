//! Letter Dash entry point
//!
//! On the web this only installs logging; the page drives a `WebGame`.
//! Natively it autoplays one level so the state machine can be watched in
//! the log (`RUST_LOG=debug`).

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Letter Dash (web) ready");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Letter Dash (native) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match letter_dash::Settings::load_file(std::path::Path::new(&path)) {
            Ok(settings) => settings,
            Err(err) => {
                eprintln!("Failed to load settings from {}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => letter_dash::Settings::default(),
    };

    let seed = letter_dash::platform::time_seed();
    if let Err(err) = autoplay(seed, settings) {
        eprintln!("Could not start a level: {}", err);
        std::process::exit(1);
    }
}

/// Play one catalog level to the win screen, one wrong click first
#[cfg(not(target_arch = "wasm32"))]
fn autoplay(seed: u64, settings: letter_dash::Settings) -> Result<(), letter_dash::LayoutError> {
    use letter_dash::consts::FRAME_DT;
    use letter_dash::sim::{GameEvent, GamePhase, GameState, Surface, TickInput, tick};

    // Phone-sized play area
    let mut state = GameState::from_catalog(seed, Surface::new(360.0, 520.0), settings)?;
    println!("Spell: {} (seed {})", state.word(), seed);

    let mut tried_wrong = false;
    // Ten minutes of frames is far beyond any level
    for _ in 0..(600.0 / FRAME_DT) as usize {
        let mut input = TickInput::default();
        if state.phase == GamePhase::Ready {
            let required = state.required_char();
            let mut scattered = state.layout.tokens.iter().filter(|t| !t.is_collected());
            let pick = if tried_wrong {
                scattered.find(|t| Some(t.ch) == required)
            } else {
                scattered.find(|t| Some(t.ch) != required)
            };
            input.select = pick.map(|t| t.id);
            tried_wrong = true;
        }

        tick(&mut state, &input, FRAME_DT);

        for event in state.drain_events() {
            match event {
                GameEvent::TokenCollected { ch, progress, .. } => {
                    println!("  + {}  [{}]", ch, render_slots(&state.answer_slots()));
                    log::debug!("progress {}", progress);
                }
                GameEvent::SelectionRejected { token_id, reason } => {
                    println!("  x token {} ignored ({:?})", token_id, reason);
                }
                GameEvent::LevelWon { word } => println!("Spelled {}!", word),
                _ => {}
            }
        }

        if state.is_won() {
            return Ok(());
        }
    }

    log::warn!("Autoplay gave up on '{}'", state.word());
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn render_slots(slots: &[Option<char>]) -> String {
    slots.iter().map(|s| s.unwrap_or('_')).collect()
}
