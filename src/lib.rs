//! Letter Dash - scatter the letters, spell the name
//!
//! Core modules:
//! - `sim`: Layout generation and the collection state machine
//! - `catalog`: Level list (target words and their accent colors)
//! - `settings`: Tunable placement and timing parameters
//! - `platform`: Browser/native platform abstraction
//! - `error`: Boundary errors for hosts that feed bad input

pub mod catalog;
pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;

pub use catalog::{LEVELS, Level};
pub use error::{LayoutError, SettingsError};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Token square edge length (pixels)
    pub const TOKEN_SIZE: f32 = 48.0;
    /// Minimum distance between token origins (48px token + gap)
    pub const MIN_SEPARATION: f32 = 60.0;
    /// Placement attempts per token before accepting an overlap
    pub const RETRY_BUDGET: u32 = 50;

    /// Play surface margins
    pub const MARGIN_X: f32 = 20.0;
    pub const MARGIN_TOP: f32 = 60.0; // More room at the top for visibility
    pub const MARGIN_BOTTOM: f32 = 20.0;

    /// Avatar walk time before a token is picked up (seconds)
    pub const COLLECT_DELAY: f32 = 0.5;
    /// Settle time between the last pickup and the win screen (seconds)
    pub const WIN_DELAY: f32 = 0.5;

    /// Avatar sprite edge length
    pub const AVATAR_SIZE: f32 = 48.0;
    /// Where the avatar stands relative to a token's origin
    pub const AVATAR_STAND_OFFSET: Vec2 = Vec2::new(-10.0, -40.0);

    /// Host frame step used by the native demo
    pub const FRAME_DT: f32 = 1.0 / 60.0;
}
