use std::path::PathBuf;

/// Convenience result type used across the crate.
pub type PlysResult<T> = Result<T, PlysError>;

/// Top-level error taxonomy for building and publishing sequence artifacts.
#[derive(thiserror::Error, Debug)]
pub enum PlysError {
    /// Invalid caller-provided configuration, detected before any IO begins.
    #[error("validation error: {0}")]
    Validation(String),

    /// The temporary artifact could not be created, written or finalized.
    #[error("artifact error: {0}")]
    Artifact(String),

    /// A frame file could not be opened or read.
    ///
    /// `processed` is the number of frames copied before the failure.
    #[error("failed to read frame '{}': {source}", path.display())]
    Input {
        path: PathBuf,
        processed: usize,
        #[source]
        source: std::io::Error,
    },

    /// Moving the finished artifact to its destination failed. The artifact is kept.
    #[error("failed to publish to '{}': {source}", dest.display())]
    Publish {
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An operation was invoked in a state that does not allow it.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The build was cancelled between two frames.
    #[error("build cancelled after {processed} frame(s)")]
    Cancelled { processed: usize },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlysError {
    /// Build a [`PlysError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PlysError::Artifact`] value.
    pub fn artifact(msg: impl Into<String>) -> Self {
        Self::Artifact(msg.into())
    }

    /// Build a [`PlysError::InvalidState`] value.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// True when retrying the same operation with different arguments may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Publish { .. })
    }

    /// Frames copied before the build stopped, for errors raised mid-build.
    pub fn processed(&self) -> Option<usize> {
        match self {
            Self::Input { processed, .. } | Self::Cancelled { processed } => Some(*processed),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
