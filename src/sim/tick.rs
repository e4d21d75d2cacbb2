//! Collection state machine
//!
//! Selections move the avatar right away; the pickup itself is a scheduled
//! continuation that fires from `tick` once its delay has elapsed. Every
//! continuation is keyed to the layout generation it was scheduled on.

use super::layout::{Surface, TokenId, TokenStatus};
use super::state::{GameEvent, GamePhase, GameState, Pending, PendingStep, RejectReason};
use crate::catalog;
use crate::error::LayoutError;

/// Host input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Token the player clicked
    pub select: Option<TokenId>,
    /// Regenerate the current level
    pub reset: bool,
    /// Move on to a different catalog level
    pub next_level: bool,
}

/// Advance the session by `dt` seconds
///
/// Order matters: level changes first, then timers, then the click. A click
/// never shares a frame's elapsed time with the continuation it schedules.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.next_level {
        if let Err(err) = next_level(state) {
            log::warn!("Could not start next level: {}", err);
        }
    } else if input.reset {
        if let Err(err) = restart(state) {
            log::warn!("Could not reset level: {}", err);
        }
    }

    advance_pending(state, dt);

    if let Some(token_id) = input.select {
        select_token(state, token_id);
    }
}

/// Try to pick up a token; returns true if the selection was accepted
///
/// Rejections (busy, unknown id, already collected, wrong letter) change
/// nothing apart from queueing a `SelectionRejected` event.
pub fn select_token(state: &mut GameState, token_id: TokenId) -> bool {
    if state.phase != GamePhase::Ready {
        return reject(state, token_id, RejectReason::NotReady);
    }

    let Some(token) = state.layout.token(token_id) else {
        return reject(state, token_id, RejectReason::UnknownToken);
    };
    if token.is_collected() {
        return reject(state, token_id, RejectReason::AlreadyCollected);
    }
    let Some(expected) = state.required_char() else {
        return reject(state, token_id, RejectReason::NotReady);
    };
    if token.ch != expected {
        let got = token.ch;
        return reject(state, token_id, RejectReason::WrongLetter { expected, got });
    }

    // A duplicate letter further along the word was clicked: it trades places
    // with the token at `progress` so collection stays a strict id prefix.
    let target = state.progress;
    if token_id != target {
        state.layout.swap_positions(token_id, target);
    }

    let pos = state.layout.tokens[target].pos;
    state.avatar.walk_to(pos);
    state.phase = GamePhase::Animating;
    state.pending = Some(Pending {
        generation: state.layout.generation,
        remaining: state.settings.collect_delay,
        step: PendingStep::Collect { token_id: target },
    });

    log::debug!(
        "Selected '{}' (token {}), progress {}/{}",
        expected,
        target,
        state.progress,
        state.layout.len()
    );
    state.push_event(GameEvent::AvatarMoved {
        token_id: target,
        pos: state.avatar.pos,
    });
    true
}

fn reject(state: &mut GameState, token_id: TokenId, reason: RejectReason) -> bool {
    log::debug!("Ignored selection of token {}: {:?}", token_id, reason);
    state.push_event(GameEvent::SelectionRejected { token_id, reason });
    false
}

/// Run down the scheduled continuation and fire it when due
fn advance_pending(state: &mut GameState, dt: f32) {
    let Some(pending) = state.pending.as_mut() else {
        return;
    };
    pending.remaining -= dt;
    if pending.remaining > 0.0 {
        return;
    }
    let Some(pending) = state.pending.take() else {
        return;
    };

    if pending.generation != state.layout.generation {
        log::warn!(
            "Dropping {:?} from stale layout {} (current {})",
            pending.step,
            pending.generation,
            state.layout.generation
        );
        state.push_event(GameEvent::ContinuationDropped {
            generation: pending.generation,
        });
        if state.phase == GamePhase::Animating {
            state.avatar.moving = false;
            state.phase = GamePhase::Ready;
        }
        return;
    }

    match pending.step {
        PendingStep::Collect { token_id } => collect(state, token_id),
        PendingStep::Settle => {
            state.phase = GamePhase::Won;
            log::info!("Level '{}' complete", state.layout.word);
            state.push_event(GameEvent::LevelWon {
                word: state.layout.word.clone(),
            });
        }
    }
}

fn collect(state: &mut GameState, token_id: TokenId) {
    state.avatar.moving = false;

    let Some(token) = state.layout.token_mut(token_id) else {
        state.phase = GamePhase::Ready;
        return;
    };
    token.status = TokenStatus::Collected;
    let ch = token.ch;
    state.progress += 1;

    state.push_event(GameEvent::TokenCollected {
        token_id,
        ch,
        progress: state.progress,
    });

    if state.progress == state.layout.len() {
        // Stay in Animating while the last pickup settles
        state.pending = Some(Pending {
            generation: state.layout.generation,
            remaining: state.settings.win_delay,
            step: PendingStep::Settle,
        });
    } else {
        state.phase = GamePhase::Ready;
    }
}

/// Start over on `word` with a fresh layout
///
/// Valid in any phase. A pending pickup from the old layout is cancelled. On
/// error the current level is left untouched.
pub fn reset(state: &mut GameState, word: &str) -> Result<(), LayoutError> {
    let layout = state.generate(word)?;
    if word != state.layout.word {
        state.level_index = catalog::index_of(word);
    }
    state.install_layout(layout);
    Ok(())
}

/// Regenerate the current word
pub fn restart(state: &mut GameState) -> Result<(), LayoutError> {
    let word = state.layout.word.clone();
    reset(state, &word)
}

/// Jump to a random catalog level other than the current one
pub fn next_level(state: &mut GameState) -> Result<(), LayoutError> {
    let current = state.level_index;
    let index = catalog::pick_next_level(state.rng_mut(), current);
    let level = &catalog::LEVELS[index];
    reset(state, level.group)?;
    state.level_index = Some(index);
    Ok(())
}

/// Record a new surface size; it applies from the next generated layout
pub fn resize(state: &mut GameState, surface: Surface) {
    state.surface = surface;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    const STEP: f32 = 0.25;

    fn new_game(word: &str) -> GameState {
        let mut state =
            GameState::new(12345, word, Surface::new(360.0, 520.0), Settings::default()).unwrap();
        state.drain_events();
        state
    }

    fn wait(state: &mut GameState, seconds: f32) {
        let mut elapsed = 0.0;
        while elapsed < seconds {
            tick(state, &TickInput::default(), STEP);
            elapsed += STEP;
        }
    }

    fn click(state: &mut GameState, token_id: TokenId) {
        let input = TickInput {
            select: Some(token_id),
            ..Default::default()
        };
        tick(state, &input, STEP);
    }

    fn statuses(state: &GameState) -> Vec<TokenStatus> {
        state.layout.tokens.iter().map(|t| t.status).collect()
    }

    #[test]
    fn test_spell_cat_wins() {
        let mut state = new_game("CAT");

        for id in 0..3 {
            assert!(select_token(&mut state, id));
            assert_eq!(state.phase, GamePhase::Animating);
            wait(&mut state, 0.5);
        }

        // Last pickup settles before the win
        assert_eq!(state.progress, 3);
        assert_eq!(state.phase, GamePhase::Animating);
        wait(&mut state, 0.5);

        assert_eq!(state.phase, GamePhase::Won);
        assert!(state.layout.tokens.iter().all(|t| t.is_collected()));
        assert_eq!(state.collected_prefix(), "CAT");
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::LevelWon { word: "CAT".into() })
        );
    }

    #[test]
    fn test_out_of_order_is_ignored() {
        let mut state = new_game("CAT");

        assert!(!select_token(&mut state, 1));
        assert_eq!(state.progress, 0);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.layout.tokens[1].status, TokenStatus::Scattered);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::SelectionRejected {
                token_id: 1,
                reason: RejectReason::WrongLetter {
                    expected: 'C',
                    got: 'A'
                }
            }]
        );
    }

    #[test]
    fn test_collected_and_unknown_tokens_are_ignored() {
        let mut state = new_game("CAT");
        select_token(&mut state, 0);
        wait(&mut state, 0.5);
        let before = statuses(&state);

        assert!(!select_token(&mut state, 0));
        assert!(!select_token(&mut state, 7));
        assert_eq!(state.progress, 1);
        assert_eq!(statuses(&state), before);
        assert_eq!(state.phase, GamePhase::Ready);
    }

    #[test]
    fn test_double_click_counts_once() {
        let mut state = new_game("CAT");
        click(&mut state, 0);
        click(&mut state, 0);
        assert_eq!(state.progress, 0);

        wait(&mut state, 0.5);
        assert_eq!(state.progress, 1);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.layout.collected_count(), 1);
    }

    #[test]
    fn test_avatar_moves_before_pickup() {
        let mut state = new_game("TWS");
        let token_pos = state.layout.tokens[0].pos;

        select_token(&mut state, 0);
        assert_eq!(state.avatar.pos, token_pos + Vec2::new(-10.0, -40.0));
        assert!(state.avatar.moving);
        assert_eq!(state.layout.tokens[0].status, TokenStatus::Scattered);

        wait(&mut state, 0.5);
        assert!(!state.avatar.moving);
        assert!(state.layout.tokens[0].is_collected());
    }

    #[test]
    fn test_reset_mid_animation_cancels_pickup() {
        let mut state = new_game("CAT");
        select_token(&mut state, 0);
        wait(&mut state, 0.25);
        let old_generation = state.layout.generation;

        let input = TickInput {
            reset: true,
            ..Default::default()
        };
        tick(&mut state, &input, STEP);
        assert!(state.pending.is_none());
        assert_ne!(state.layout.generation, old_generation);

        wait(&mut state, 2.0);
        assert_eq!(state.progress, 0);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.word(), "CAT");
        assert!(state.layout.tokens.iter().all(|t| !t.is_collected()));
        assert!(
            !state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::TokenCollected { .. }))
        );
    }

    #[test]
    fn test_stale_continuation_is_dropped() {
        let mut state = new_game("CAT");
        select_token(&mut state, 0);
        let scheduled_on = state.layout.generation;
        // Simulate a layout swap that bypassed cancellation
        state.layout.generation += 100;

        wait(&mut state, 0.5);
        assert_eq!(state.progress, 0);
        assert_eq!(state.phase, GamePhase::Ready);
        assert!(!state.layout.tokens[0].is_collected());
        assert!(state.drain_events().contains(&GameEvent::ContinuationDropped {
            generation: scheduled_on
        }));
    }

    #[test]
    fn test_undrained_rejections_stay_bounded() {
        let mut state = new_game("CAT");
        for _ in 0..500 {
            click(&mut state, 2);
        }
        assert_eq!(state.events.len(), crate::sim::state::MAX_EVENTS);
        assert_eq!(state.progress, 0);
    }

    #[test]
    fn test_won_ignores_input() {
        let mut state = new_game("V");
        select_token(&mut state, 0);
        wait(&mut state, 1.0);
        assert!(state.is_won());

        assert!(!select_token(&mut state, 0));
        assert_eq!(state.progress, 1);
    }

    #[test]
    fn test_duplicate_letter_keeps_prefix_order() {
        let mut state = new_game("NMIXX");
        for id in 0..3 {
            select_token(&mut state, id);
            wait(&mut state, 0.5);
        }
        let (p3, p4) = (state.layout.tokens[3].pos, state.layout.tokens[4].pos);

        // Second X clicked while the first X is still required
        assert!(select_token(&mut state, 4));
        wait(&mut state, 0.5);

        assert_eq!(state.progress, 4);
        assert!(state.layout.tokens[3].is_collected());
        assert!(!state.layout.tokens[4].is_collected());
        assert_eq!(state.layout.tokens[3].pos, p4);
        assert_eq!(state.layout.tokens[4].pos, p3);
    }

    #[test]
    fn test_random_clicks_keep_invariants() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let mut state = new_game("SEVENTEEN");
        let mut last_progress = 0;

        for _ in 0..2000 {
            let input = TickInput {
                select: rng.random_bool(0.5).then(|| rng.random_range(0..12)),
                ..Default::default()
            };
            tick(&mut state, &input, 0.1);

            assert!(state.progress >= last_progress);
            assert!(state.progress - last_progress <= 1);
            last_progress = state.progress;
            for token in &state.layout.tokens {
                assert_eq!(token.is_collected(), token.id < state.progress);
            }
            if state.is_won() {
                break;
            }
        }
    }

    #[test]
    fn test_next_level_changes_word() {
        let mut state =
            GameState::from_catalog(77, Surface::new(360.0, 520.0), Settings::default()).unwrap();
        for _ in 0..20 {
            let before = state.level_index;
            let input = TickInput {
                next_level: true,
                ..Default::default()
            };
            tick(&mut state, &input, STEP);
            assert_ne!(state.level_index, before);
            assert_eq!(state.word(), state.level().unwrap().group);
            assert_eq!(state.progress, 0);
        }
    }

    #[test]
    fn test_reset_with_bad_word_keeps_level() {
        let mut state = new_game("IVE");
        let generation = state.layout.generation;
        assert_eq!(reset(&mut state, ""), Err(LayoutError::EmptyWord));
        assert_eq!(state.layout.generation, generation);
        assert_eq!(state.word(), "IVE");
    }

    #[test]
    fn test_resize_applies_on_reset() {
        let mut state = new_game("RIIZE");
        resize(&mut state, Surface::new(800.0, 600.0));
        assert_eq!(state.layout.surface, Surface::new(360.0, 520.0));

        restart(&mut state).unwrap();
        assert_eq!(state.layout.surface, Surface::new(800.0, 600.0));
        assert_eq!(state.avatar.pos, Vec2::new(376.0, 276.0));
    }

    #[test]
    fn test_reset_sets_catalog_level() {
        let mut state = new_game("CAT");
        assert_eq!(state.level_index, None);
        reset(&mut state, "TWICE").unwrap();
        assert_eq!(state.level().map(|l| l.group), Some("TWICE"));
    }
}
