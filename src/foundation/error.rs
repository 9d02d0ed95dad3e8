/// Convenience result alias used throughout the crate.
pub type CocoonResult<T> = Result<T, CocoonError>;

/// Error type for configuration, validation and rendering failures.
///
/// Per-vertex evaluation never produces an error; degenerate inputs are sanitized instead.
#[derive(thiserror::Error, Debug)]
pub enum CocoonError {
    /// Input failed a structural or range check.
    #[error("validation error: {0}")]
    Validation(String),

    /// Scene configuration could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// Rasterization or post-processing failed.
    #[error("render error: {0}")]
    Render(String),

    /// Filesystem or stream failure while writing output.
    #[error("io error: {0}")]
    Io(String),

    /// Failure reported by a third-party encoder, with its source chain kept.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CocoonError {
    /// Build a [`CocoonError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CocoonError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`CocoonError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CocoonError::Io`].
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
