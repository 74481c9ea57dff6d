use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::foundation::core::{Compression, Framerate, ReadFailurePolicy};
use crate::foundation::error::{PlysError, PlysResult};
use crate::sequence::header::SequenceHeader;

/// Whether the artifact starts with a sequence header.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMode {
    /// Plain concatenation of frames, no header.
    Raw,
    /// `plys` header with an optional framerate line.
    Sequence {
        #[serde(default)]
        framerate: Option<Framerate>,
    },
}

impl Default for HeaderMode {
    fn default() -> Self {
        Self::Sequence { framerate: None }
    }
}

impl HeaderMode {
    pub fn header(self) -> Option<SequenceHeader> {
        match self {
            Self::Raw => None,
            Self::Sequence { framerate } => Some(SequenceHeader::new(framerate)),
        }
    }
}

/// Everything a single build needs, fixed before the build starts.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BuildConfig {
    /// Frame files; sorted by path name before processing.
    pub inputs: Vec<PathBuf>,
    #[serde(default)]
    pub compression: Compression,
    #[serde(default)]
    pub header: HeaderMode,
    #[serde(default)]
    pub on_read_failure: ReadFailurePolicy,
    /// Directory for the temporary artifact; the system temp dir when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,
}

impl BuildConfig {
    pub fn new(inputs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            compression: Compression::default(),
            header: HeaderMode::default(),
            on_read_failure: ReadFailurePolicy::default(),
            temp_dir: None,
        }
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Use the header-bearing layout with the given framerate.
    pub fn with_framerate(mut self, framerate: Framerate) -> Self {
        self.header = HeaderMode::Sequence {
            framerate: Some(framerate),
        };
        self
    }

    /// Drop the header and write frames back to back.
    pub fn raw(mut self) -> Self {
        self.header = HeaderMode::Raw;
        self
    }

    pub fn with_policy(mut self, policy: ReadFailurePolicy) -> Self {
        self.on_read_failure = policy;
        self
    }

    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Parse a build job from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> PlysResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| PlysError::validation(format!("parse build config JSON: {e}")))
    }

    /// Parse a build job from a JSON file on disk.
    ///
    /// Relative input paths and `temp_dir` are resolved against the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> PlysResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PlysError::validation(format!("open build config '{}': {e}", path.display()))
        })?;
        let mut cfg = Self::from_reader(BufReader::new(f))?;
        if let Some(base) = path.parent() {
            cfg.resolve_relative_to(base);
        }
        Ok(cfg)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for p in &mut self.inputs {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
        if let Some(dir) = self.temp_dir.as_mut().filter(|d| d.is_relative()) {
            *dir = base.join(&*dir);
        }
    }

    /// Checks that need no IO. Called by the generator before anything touches the disk.
    pub fn validate(&self) -> PlysResult<()> {
        if self.inputs.is_empty() {
            return Err(PlysError::validation(
                "at least one input frame file is required",
            ));
        }
        if let HeaderMode::Sequence {
            framerate: Some(fps),
        } = self.header
        {
            Framerate::new(fps.get())?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/config.rs"]
mod tests;
