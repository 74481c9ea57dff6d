use std::fmt;

use crate::foundation::error::{PlysError, PlysResult};

/// File suffix of an uncompressed sequence artifact.
pub const PLYS_SUFFIX: &str = ".plys";

/// Extra suffix appended for gzip-compressed artifacts.
pub const GZIP_SUFFIX: &str = ".gz";

/// Playback rate recorded in the sequence header.
///
/// Any finite value is accepted; it is written verbatim and not checked against playback limits.
/// Very large or small values are written in exponent form (`1e-7`), which the header reader
/// accepts.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Framerate(f32);

impl Framerate {
    pub fn new(fps: f32) -> PlysResult<Self> {
        if !fps.is_finite() {
            return Err(PlysError::validation(format!(
                "framerate must be a finite number, got {fps}"
            )));
        }
        Ok(Self(fps))
    }

    /// Parse user-entered text such as `"24"` or `" 29.97 "`.
    pub fn parse(text: &str) -> PlysResult<Self> {
        let trimmed = text.trim();
        let fps: f32 = trimmed.parse().map_err(|_| {
            PlysError::validation(format!("framerate '{trimmed}' is not a number"))
        })?;
        Self::new(fps)
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl TryFrom<f32> for Framerate {
    type Error = PlysError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Framerate> for f32 {
    fn from(value: Framerate) -> Self {
        value.0
    }
}

impl std::str::FromStr for Framerate {
    type Err = PlysError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Always carries a decimal point: 24 -> "24.0".
impl fmt::Display for Framerate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Compression layered over the artifact file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
    #[default]
    None,
    /// A single-member gzip stream wrapping the whole artifact.
    Gzip,
}

impl Compression {
    pub fn from_flag(gzip: bool) -> Self {
        if gzip { Self::Gzip } else { Self::None }
    }

    /// Full file suffix for artifacts written with this mode (`.plys` or `.plys.gz`).
    pub fn suffix(self) -> String {
        match self {
            Self::None => PLYS_SUFFIX.to_string(),
            Self::Gzip => format!("{PLYS_SUFFIX}{GZIP_SUFFIX}"),
        }
    }
}

/// What the build does when one frame file cannot be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadFailurePolicy {
    /// Abort the whole build on the first unreadable frame; no artifact is produced.
    FailFast,
    /// Record the failure, skip the frame and continue with the next one.
    #[default]
    BestEffort,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
