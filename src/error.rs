use thiserror::Error;

/// Host input that cannot produce a layout.
///
/// The collection state machine never fails; these only surface when a level
/// is (re)generated with a bad word, surface, or placement config.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("target word is empty")]
    EmptyWord,
    #[error("surface {width}x{height} is not a positive finite size")]
    InvalidSurface { width: f32, height: f32 },
    #[error("margins must be finite and non-negative")]
    InvalidMargins,
    #[error("token size {0} must be finite and non-negative")]
    InvalidTokenSize(f32),
    #[error("minimum separation {0} must be finite and non-negative")]
    InvalidSeparation(f32),
    #[error("margins and token size leave no usable area ({width}x{height})")]
    NoUsableArea { width: f32, height: f32 },
}

/// Errors loading or validating [`crate::Settings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid {name} delay: {value}")]
    InvalidDelay { name: &'static str, value: f32 },
    #[error("invalid avatar size: {0}")]
    InvalidAvatarSize(f32),
    #[error("invalid layout settings: {0}")]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
