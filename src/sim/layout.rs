//! Token layout generation
//!
//! Scatters one token per character of the target word over the play surface.
//! Placement is rejection sampling with a bounded retry budget: when a token
//! cannot find a clear spot it is placed anyway, overlapping its neighbours,
//! so a crowded surface never loses a letter.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::LayoutError;

/// Index of a token within its word (also its collection step)
pub type TokenId = usize;

/// Token lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
    /// On the surface, clickable
    Scattered,
    /// Picked up by the avatar
    Collected,
}

/// A single placed letter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub ch: char,
    /// Top-left corner in surface-local pixels
    pub pos: Vec2,
    pub status: TokenStatus,
}

impl Token {
    #[inline]
    pub fn is_collected(&self) -> bool {
        self.status == TokenStatus::Collected
    }

    /// Center of the token square
    #[inline]
    pub fn center(&self, token_size: f32) -> Vec2 {
        self.pos + Vec2::splat(token_size / 2.0)
    }
}

/// Pixel size of the play surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

impl Surface {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    fn validate(&self) -> Result<(), LayoutError> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(LayoutError::InvalidSurface {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Space kept clear along each surface edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: MARGIN_X,
            right: MARGIN_X,
            top: MARGIN_TOP,
            bottom: MARGIN_BOTTOM,
        }
    }
}

/// Placement parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub token_size: f32,
    /// Minimum distance between any two token positions
    pub min_separation: f32,
    pub margins: Margins,
    /// Attempts per token; 0 behaves like 1
    pub retry_budget: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            token_size: TOKEN_SIZE,
            min_separation: MIN_SEPARATION,
            margins: Margins::default(),
            retry_budget: RETRY_BUDGET,
        }
    }
}

impl LayoutConfig {
    /// Check the surface-independent parameters
    pub fn validate(&self) -> Result<(), LayoutError> {
        let m = &self.margins;
        if [m.left, m.right, m.top, m.bottom]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(LayoutError::InvalidMargins);
        }
        if !self.token_size.is_finite() || self.token_size < 0.0 {
            return Err(LayoutError::InvalidTokenSize(self.token_size));
        }
        if !self.min_separation.is_finite() || self.min_separation < 0.0 {
            return Err(LayoutError::InvalidSeparation(self.min_separation));
        }
        Ok(())
    }

    /// Region token origins may be sampled from on `surface`
    pub fn placement_area(&self, surface: Surface) -> Result<PlacementArea, LayoutError> {
        surface.validate()?;
        self.validate()?;

        let m = &self.margins;
        let width = surface.width - m.left - m.right - self.token_size;
        let height = surface.height - m.top - m.bottom - self.token_size;
        if width <= 0.0 || height <= 0.0 {
            return Err(LayoutError::NoUsableArea { width, height });
        }

        Ok(PlacementArea {
            origin: Vec2::new(m.left, m.top),
            size: Vec2::new(width, height),
        })
    }
}

/// Axis-aligned rectangle of valid token origins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementArea {
    pub origin: Vec2,
    pub size: Vec2,
}

impl PlacementArea {
    /// Uniform random point inside the area
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        self.origin + Vec2::new(rng.random::<f32>(), rng.random::<f32>()) * self.size
    }

    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.origin + self.size;
        p.x >= self.origin.x && p.y >= self.origin.y && p.x <= max.x && p.y <= max.y
    }
}

/// One level's worth of tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    /// Identity of this layout; bumped by the owning game state on every new level
    pub generation: u64,
    pub word: String,
    pub surface: Surface,
    /// In word order: `tokens[i].id == i`
    pub tokens: Vec<Token>,
    /// Tokens placed after exhausting the retry budget
    pub degraded: usize,
}

impl Layout {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(id)
    }

    pub fn token_mut(&mut self, id: TokenId) -> Option<&mut Token> {
        self.tokens.get_mut(id)
    }

    /// Character that must be collected after `progress` pickups
    pub fn required_char(&self, progress: usize) -> Option<char> {
        self.tokens.get(progress).map(|t| t.ch)
    }

    pub fn collected_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_collected()).count()
    }

    /// Exchange the positions of two tokens, keeping ids and characters
    pub fn swap_positions(&mut self, a: TokenId, b: TokenId) {
        if a == b || a >= self.tokens.len() || b >= self.tokens.len() {
            return;
        }
        let pos_a = self.tokens[a].pos;
        self.tokens[a].pos = self.tokens[b].pos;
        self.tokens[b].pos = pos_a;
    }

    /// Smallest distance between any two tokens (None for single-token layouts)
    pub fn min_pairwise_distance(&self) -> Option<f32> {
        let mut best: Option<f32> = None;
        for (i, a) in self.tokens.iter().enumerate() {
            for b in &self.tokens[i + 1..] {
                let d = a.pos.distance(b.pos);
                best = Some(best.map_or(d, |m| m.min(d)));
            }
        }
        best
    }
}

fn is_crowded(pos: Vec2, placed: &[Token], min_separation: f32) -> bool {
    placed
        .iter()
        .any(|token| token.pos.distance(pos) < min_separation)
}

/// Scatter the characters of `word` across `surface`
///
/// Each token gets up to `retry_budget` samples to find a spot at least
/// `min_separation` away from every token already placed. If none is found the
/// last sample is kept and the layout's `degraded` count goes up.
///
/// The returned layout has generation 0; the game state stamps its own.
pub fn generate_layout<R: Rng + ?Sized>(
    word: &str,
    surface: Surface,
    config: &LayoutConfig,
    rng: &mut R,
) -> Result<Layout, LayoutError> {
    if word.is_empty() {
        return Err(LayoutError::EmptyWord);
    }
    let area = config.placement_area(surface)?;
    let attempts = config.retry_budget.max(1);

    let mut tokens: Vec<Token> = Vec::with_capacity(word.chars().count());
    let mut degraded = 0;

    for (id, ch) in word.chars().enumerate() {
        let mut pos = area.sample(rng);
        let mut crowded = is_crowded(pos, &tokens, config.min_separation);
        let mut tries = 1;
        while crowded && tries < attempts {
            pos = area.sample(rng);
            crowded = is_crowded(pos, &tokens, config.min_separation);
            tries += 1;
        }

        if crowded {
            log::debug!(
                "Token {} '{}' found no clear spot after {} attempts, overlapping",
                id,
                ch,
                attempts
            );
            degraded += 1;
        }

        tokens.push(Token {
            id,
            ch,
            pos,
            status: TokenStatus::Scattered,
        });
    }

    Ok(Layout {
        generation: 0,
        word: word.to_string(),
        surface,
        tokens,
        degraded,
    })
}
