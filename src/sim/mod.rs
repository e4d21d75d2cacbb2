//! Game simulation module
//!
//! All gameplay logic lives here and stays free of rendering and platform
//! dependencies:
//! - Randomness comes from the session's seeded RNG
//! - Time only advances through `tick`
//! - Token ids follow word order, never spatial order

pub mod layout;
pub mod state;
pub mod tick;

pub use layout::{
    Layout, LayoutConfig, Margins, PlacementArea, Surface, Token, TokenId, TokenStatus,
    generate_layout,
};
pub use state::{
    Avatar, GameEvent, GamePhase, GameState, MAX_EVENTS, Pending, PendingStep, RejectReason,
    Snapshot,
};
pub use tick::{TickInput, next_level, reset, resize, restart, select_token, tick};
