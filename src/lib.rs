//! Build PLYS point-cloud sequence files.
//!
//! A PLYS artifact is a directory of PLY frames concatenated into one file: an optional
//! three-line ASCII header (`plys`, `framerate <f>`, `end_sequence_header`), then every frame's
//! raw bytes in path-name order, each followed by `\r\n`. The whole artifact may be wrapped in a
//! single gzip stream.
//!
//! # Flow
//!
//! 1. Describe the job with a [`BuildConfig`] (inputs, [`Compression`], [`HeaderMode`],
//!    [`ReadFailurePolicy`]).
//! 2. [`Generator::build`] writes the artifact to a private temporary file on the calling thread.
//!    Use [`Generator::build_with`] and a [`BuildControl`] to watch progress or cancel from another
//!    thread.
//! 3. [`Generator::publish`] renames the artifact to its destination, exactly once.
//!
//! Frame contents are treated as opaque bytes; PLY files are never parsed.
#![forbid(unsafe_code)]

mod encode;
mod foundation;
mod sequence;

pub use encode::sink::StreamWriter;
pub use foundation::core::{Compression, Framerate, GZIP_SUFFIX, PLYS_SUFFIX, ReadFailurePolicy};
pub use foundation::error::{PlysError, PlysResult};
pub use sequence::config::{BuildConfig, HeaderMode};
pub use sequence::generator::{FrameFailure, Generator, RECORD_SEPARATOR, TEMP_PREFIX};
pub use sequence::header::{
    END_TAG, FORMAT_TAG, FRAMERATE_KEY, SequenceHeader, open_artifact, read_artifact_header,
};
pub use sequence::inputs::list_frame_files;
pub use sequence::progress::BuildControl;
