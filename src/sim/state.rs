//! Game state and core session types
//!
//! Everything a host needs to render a level lives here: the current layout,
//! collection progress, phase, avatar and queued events.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::layout::{Layout, Surface, Token, TokenId, generate_layout};
use crate::catalog::{self, Level};
use crate::consts::*;
use crate::error::LayoutError;
use crate::settings::Settings;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Accepting token selections
    Ready,
    /// Avatar walking or a pickup settling; selections are ignored
    Animating,
    /// Whole word collected
    Won,
}

/// The little walker that fetches letters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Avatar {
    pub pos: Vec2,
    pub moving: bool,
}

impl Avatar {
    /// Avatar standing in the middle of the surface
    pub fn centered(surface: Surface, size: f32) -> Self {
        Self {
            pos: Vec2::new(surface.width / 2.0, surface.height / 2.0) - Vec2::splat(size / 2.0),
            moving: false,
        }
    }

    /// Start walking to stand above a token
    pub fn walk_to(&mut self, token_pos: Vec2) {
        self.pos = token_pos + AVATAR_STAND_OFFSET;
        self.moving = true;
    }
}

/// What a scheduled continuation does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingStep {
    /// Mark the token collected and advance progress
    Collect { token_id: TokenId },
    /// Declare the level won
    Settle,
}

/// A delayed state change tied to the layout it was scheduled on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pending {
    pub generation: u64,
    /// Seconds until it fires
    pub remaining: f32,
    pub step: PendingStep,
}

/// Why a selection had no effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    /// Animating or already won
    NotReady,
    UnknownToken,
    AlreadyCollected,
    WrongLetter { expected: char, got: char },
}

/// Notifications for the host, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    LayoutGenerated { generation: u64, word: String },
    AvatarMoved { token_id: TokenId, pos: Vec2 },
    TokenCollected { token_id: TokenId, ch: char, progress: usize },
    /// Telemetry only; rejected selections carry no penalty
    SelectionRejected { token_id: TokenId, reason: RejectReason },
    LevelWon { word: String },
    /// A continuation outlived its layout and was discarded
    ContinuationDropped { generation: u64 },
}

/// Maximum queued events for hosts that never drain
pub const MAX_EVENTS: usize = 64;

/// Complete session state
///
/// The host owns the only mutable reference and feeds it through
/// [`super::tick`] and the other transition functions.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub settings: Settings,
    /// Surface used for the next generated layout
    pub surface: Surface,
    /// Catalog entry the current word came from, if any
    pub level_index: Option<usize>,
    pub layout: Layout,
    /// Length of the collected prefix
    pub progress: usize,
    pub phase: GamePhase,
    pub avatar: Avatar,
    pub pending: Option<Pending>,
    pub events: Vec<GameEvent>,
    next_generation: u64,
}

impl GameState {
    /// Start a session on an explicit word
    pub fn new(
        seed: u64,
        word: &str,
        surface: Surface,
        settings: Settings,
    ) -> Result<Self, LayoutError> {
        Self::start(seed, Pcg32::seed_from_u64(seed), word, None, surface, settings)
    }

    /// Start a session on a random catalog level
    pub fn from_catalog(
        seed: u64,
        surface: Surface,
        settings: Settings,
    ) -> Result<Self, LayoutError> {
        // One stream for the level pick and the layout that follows it
        let mut rng = Pcg32::seed_from_u64(seed);
        let index = catalog::pick_next_level(&mut rng, None);
        let word = catalog::LEVELS[index].group;
        Self::start(seed, rng, word, Some(index), surface, settings)
    }

    fn start(
        seed: u64,
        rng: Pcg32,
        word: &str,
        level_index: Option<usize>,
        surface: Surface,
        settings: Settings,
    ) -> Result<Self, LayoutError> {
        let avatar = Avatar::centered(surface, settings.avatar_size);
        let mut state = Self {
            seed,
            rng,
            settings,
            surface,
            level_index,
            layout: Layout {
                generation: 0,
                word: String::new(),
                surface,
                tokens: Vec::new(),
                degraded: 0,
            },
            progress: 0,
            phase: GamePhase::Ready,
            avatar,
            pending: None,
            events: Vec::new(),
            next_generation: 1,
        };
        let layout = state.generate(word)?;
        state.install_layout(layout);
        Ok(state)
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn word(&self) -> &str {
        &self.layout.word
    }

    pub fn level(&self) -> Option<&'static Level> {
        self.level_index.and_then(catalog::level)
    }

    /// Next character to collect, None once the word is complete
    pub fn required_char(&self) -> Option<char> {
        self.layout.required_char(self.progress)
    }

    /// Letters collected so far, in spelling order
    pub fn collected_prefix(&self) -> String {
        self.layout.tokens[..self.progress].iter().map(|t| t.ch).collect()
    }

    /// Answer row: one slot per letter, filled once collected
    pub fn answer_slots(&self) -> Vec<Option<char>> {
        self.layout
            .tokens
            .iter()
            .map(|t| (t.id < self.progress).then_some(t.ch))
            .collect()
    }

    pub fn is_won(&self) -> bool {
        self.phase == GamePhase::Won
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Queue an event, dropping the oldest once the host falls behind
    pub(crate) fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    /// Generate a layout for `word` on the current surface without installing it
    pub(crate) fn generate(&mut self, word: &str) -> Result<Layout, LayoutError> {
        generate_layout(word, self.surface, &self.settings.layout, &mut self.rng)
    }

    /// Replace the level with a freshly generated layout
    ///
    /// Cancels any scheduled continuation and resets progress and avatar.
    pub(crate) fn install_layout(&mut self, mut layout: Layout) {
        layout.generation = self.next_generation;
        self.next_generation += 1;

        if let Some(pending) = self.pending.take() {
            log::debug!(
                "Cancelled {:?} scheduled on layout {}",
                pending.step,
                pending.generation
            );
        }

        log::info!(
            "Level '{}' (layout {}): {} tokens, {} crowded",
            layout.word,
            layout.generation,
            layout.len(),
            layout.degraded
        );

        self.push_event(GameEvent::LayoutGenerated {
            generation: layout.generation,
            word: layout.word.clone(),
        });
        self.avatar = Avatar::centered(layout.surface, self.settings.avatar_size);
        self.layout = layout;
        self.progress = 0;
        self.phase = GamePhase::Ready;
    }

    /// Serializable view for hosts that render from JSON
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            word: self.layout.word.clone(),
            color: self.level().map(|l| l.color),
            phase: self.phase,
            progress: self.progress,
            slots: self.answer_slots(),
            token_size: self.settings.layout.token_size,
            tokens: self.layout.tokens.clone(),
            avatar: self.avatar,
        }
    }
}

/// Render-ready copy of the session
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub word: String,
    pub color: Option<&'static str>,
    pub phase: GamePhase,
    pub progress: usize,
    pub slots: Vec<Option<char>>,
    pub token_size: f32,
    pub tokens: Vec<Token>,
    pub avatar: Avatar,
}
