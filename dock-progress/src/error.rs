//! Errors raised while setting up drawing resources.
//!
//! The animation engine itself never fails; these only come out of
//! constructors that allocate canvases, load fonts or parse configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("cannot allocate a {width}x{height} canvas")]
    CanvasSize { width: u32, height: u32 },

    #[error("font rejected: {0}")]
    Font(String),

    #[error("invalid engine config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OverlayError>;
