use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::{NamedTempFile, TempPath};

use crate::encode::sink::StreamWriter;
use crate::foundation::core::{Compression, ReadFailurePolicy};
use crate::foundation::error::{PlysError, PlysResult};
use crate::sequence::config::BuildConfig;
use crate::sequence::progress::BuildControl;

/// Name prefix of temporary artifacts.
pub const TEMP_PREFIX: &str = "PLY_Gen";

/// Written after every frame payload.
pub const RECORD_SEPARATOR: [u8; 2] = [0x0D, 0x0A];

/// A frame that was skipped under [`ReadFailurePolicy::BestEffort`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameFailure {
    pub path: PathBuf,
    pub message: String,
}

/// A finished sequence artifact waiting to be published.
///
/// The whole build happens in [`Generator::build`]; afterwards the artifact sits under a private
/// temporary name until [`Generator::publish`] moves it into place. A generator publishes at most
/// once. Dropping an unpublished generator deletes its artifact.
#[derive(Debug)]
pub struct Generator {
    artifact: Option<TempPath>,
    compression: Compression,
    file_count: usize,
    num_processed: usize,
    failures: Vec<FrameFailure>,
    bytes_written: u64,
    published_to: Option<PathBuf>,
}

impl Generator {
    /// Build the artifact for `config` on the calling thread.
    pub fn build(config: &BuildConfig) -> PlysResult<Self> {
        Self::build_with(config, BuildControl::new())
    }

    /// Like [`Generator::build`], reporting progress through (and honoring cancellation from) a
    /// caller-owned [`BuildControl`].
    ///
    /// Inputs are processed in ascending path-name order. Cancellation is only observed between
    /// frames.
    pub fn build_with(config: &BuildConfig, control: BuildControl) -> PlysResult<Self> {
        Self::build_observed(config, control, |_, _| {})
    }

    /// Like [`Generator::build_with`], also calling `on_frame(processed, total)` on the build
    /// thread after each frame is copied.
    #[tracing::instrument(
        skip_all,
        fields(inputs = config.inputs.len(), compression = ?config.compression)
    )]
    pub fn build_observed(
        config: &BuildConfig,
        control: BuildControl,
        mut on_frame: impl FnMut(usize, usize),
    ) -> PlysResult<Self> {
        config.validate()?;

        let mut inputs = config.inputs.clone();
        inputs.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        let file_count = inputs.len();
        control.begin(file_count)?;

        let (file, artifact) = create_temp_artifact(config)?.into_parts();
        tracing::info!(
            artifact = %artifact.display(),
            frames = file_count,
            "building sequence artifact"
        );

        // Declared after `artifact` so that on early return the writer (and its gzip layer) is
        // closed before the temporary file is removed.
        let mut writer = StreamWriter::new(file, config.compression);

        if let Some(header) = config.header.header() {
            header
                .write_to(&mut writer)
                .map_err(|e| PlysError::artifact(format!("write sequence header: {e}")))?;
        }

        let mut failures = Vec::new();
        let mut frame = Vec::new();
        for path in &inputs {
            if control.is_cancelled() {
                let processed = control.progress().0;
                tracing::info!(processed, "build cancelled");
                return Err(PlysError::Cancelled { processed });
            }

            if let Err(e) = read_frame(path, &mut frame) {
                match config.on_read_failure {
                    ReadFailurePolicy::FailFast => {
                        return Err(PlysError::Input {
                            path: path.clone(),
                            processed: control.progress().0,
                            source: e,
                        });
                    }
                    ReadFailurePolicy::BestEffort => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping unreadable frame");
                        failures.push(FrameFailure {
                            path: path.clone(),
                            message: e.to_string(),
                        });
                        continue;
                    }
                }
            }

            writer
                .write_all(&frame)
                .and_then(|()| writer.write_all(&RECORD_SEPARATOR))
                .map_err(|e| {
                    PlysError::artifact(format!(
                        "write frame '{}' to artifact: {e}",
                        path.display()
                    ))
                })?;

            let processed = control.frame_done();
            tracing::debug!(
                path = %path.display(),
                bytes = frame.len(),
                processed,
                total = file_count,
                "frame copied"
            );
            on_frame(processed, file_count);
        }

        let bytes_written = writer.bytes_written();
        writer
            .finish()
            .map_err(|e| PlysError::artifact(format!("finalize artifact: {e}")))?;

        let num_processed = control.progress().0;
        tracing::info!(
            processed = num_processed,
            failed = failures.len(),
            bytes = bytes_written,
            "sequence artifact complete"
        );

        Ok(Self {
            artifact: Some(artifact),
            compression: config.compression,
            file_count,
            num_processed,
            failures,
            bytes_written,
            published_to: None,
        })
    }

    /// Move the artifact to `dest`, replacing any existing file there.
    ///
    /// This is a rename, so `dest` must be on the same filesystem as the temporary artifact (see
    /// [`BuildConfig::temp_dir`]). On failure the artifact is kept and publishing may be retried.
    /// Once a publish has succeeded every further call fails with [`PlysError::InvalidState`] and
    /// touches nothing on disk.
    #[doc(alias = "save")]
    pub fn publish(&mut self, dest: impl AsRef<Path>) -> PlysResult<()> {
        let dest = dest.as_ref();
        if self.published_to.is_some() {
            return Err(PlysError::invalid_state("artifact was already saved"));
        }
        let Some(artifact) = self.artifact.take() else {
            return Err(PlysError::invalid_state("no artifact to publish"));
        };

        match artifact.persist(dest) {
            Ok(()) => {
                tracing::info!(dest = %dest.display(), "published sequence artifact");
                self.published_to = Some(dest.to_path_buf());
                Ok(())
            }
            Err(e) => {
                tracing::warn!(dest = %dest.display(), error = %e.error, "publish failed");
                self.artifact = Some(e.path);
                Err(PlysError::Publish {
                    dest: dest.to_path_buf(),
                    source: e.error,
                })
            }
        }
    }

    /// Number of input files, fixed at construction.
    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// Number of frames copied into the artifact.
    pub fn num_processed(&self) -> usize {
        self.num_processed
    }

    /// `(processed, total)`.
    pub fn progress(&self) -> (usize, usize) {
        (self.num_processed(), self.file_count)
    }

    /// Frames skipped because they could not be read.
    pub fn failures(&self) -> &[FrameFailure] {
        &self.failures
    }

    /// True when every input made it into the artifact.
    pub fn is_complete(&self) -> bool {
        self.num_processed() == self.file_count
    }

    pub fn is_saved(&self) -> bool {
        self.published_to.is_some()
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Uncompressed size of the artifact (header, payloads and separators).
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Location of the unpublished temporary artifact.
    pub fn artifact_path(&self) -> Option<&Path> {
        self.artifact.as_deref()
    }

    pub fn published_path(&self) -> Option<&Path> {
        self.published_to.as_deref()
    }
}

fn create_temp_artifact(config: &BuildConfig) -> PlysResult<NamedTempFile> {
    let suffix = config.compression.suffix();
    let mut builder = tempfile::Builder::new();
    builder.prefix(TEMP_PREFIX).suffix(&suffix);

    let created = match &config.temp_dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    };
    created.map_err(|e| PlysError::artifact(format!("create temporary artifact: {e}")))
}

// The handle is closed before returning; nothing reaches the writer unless the whole frame read.
fn read_frame(path: &Path, buf: &mut Vec<u8>) -> io::Result<()> {
    buf.clear();
    File::open(path)?.read_to_end(buf)?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/generator.rs"]
mod tests;
