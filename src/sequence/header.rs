use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::foundation::core::Framerate;
use crate::foundation::error::{PlysError, PlysResult};

/// Literal tag on the first header line.
pub const FORMAT_TAG: &str = "plys";
/// Key of the optional framerate metadata line.
pub const FRAMERATE_KEY: &str = "framerate";
/// Last header line; frame payloads start right after it.
pub const END_TAG: &str = "end_sequence_header";

const MAX_HEADER_BYTES: u64 = 4096;
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// The ASCII block that precedes frame payloads in header-bearing artifacts.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SequenceHeader {
    pub framerate: Option<Framerate>,
}

impl SequenceHeader {
    pub fn new(framerate: Option<Framerate>) -> Self {
        Self { framerate }
    }

    /// Render the header exactly as it is written to the artifact.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(48);
        out.push_str(FORMAT_TAG);
        out.push('\n');
        if let Some(fps) = self.framerate {
            out.push_str(&format!("{FRAMERATE_KEY} {fps}\n"));
        }
        out.push_str(END_TAG);
        out.push('\n');
        out
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_all(self.to_text().as_bytes())
    }

    /// Parse a header from the start of an (already decompressed) artifact stream.
    ///
    /// On success the reader is positioned at the first payload byte.
    pub fn read_from<R: BufRead>(r: &mut R) -> PlysResult<Self> {
        let mut limited = r.take(MAX_HEADER_BYTES);
        let mut line = String::new();

        let first = read_header_line(&mut limited, &mut line)?;
        if first != Some(FORMAT_TAG) {
            return Err(PlysError::validation(format!(
                "not a plys artifact: expected '{FORMAT_TAG}' on the first line"
            )));
        }

        let mut header = Self::default();
        loop {
            let Some(l) = read_header_line(&mut limited, &mut line)? else {
                return Err(PlysError::validation(format!(
                    "sequence header is missing '{END_TAG}'"
                )));
            };
            if l == END_TAG {
                return Ok(header);
            }
            match l.split_once(' ') {
                Some((FRAMERATE_KEY, value)) => header.framerate = Some(Framerate::parse(value)?),
                _ => tracing::debug!(line = l, "ignoring unknown sequence header line"),
            }
        }
    }
}

fn read_header_line<'a, R: BufRead>(
    r: &mut R,
    buf: &'a mut String,
) -> PlysResult<Option<&'a str>> {
    buf.clear();
    let n = r
        .read_line(buf)
        .map_err(|e| PlysError::validation(format!("read sequence header: {e}")))?;
    if n == 0 || !buf.ends_with('\n') {
        return Ok(None);
    }
    Ok(Some(buf.trim_end_matches(['\n', '\r'])))
}

/// Open an artifact for reading, transparently decompressing gzip-wrapped files.
pub fn open_artifact(path: impl AsRef<Path>) -> PlysResult<Box<dyn BufRead>> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| {
        PlysError::validation(format!("open artifact '{}': {e}", path.display()))
    })?;
    let mut r = BufReader::new(f);
    let is_gzip = r
        .fill_buf()
        .map_err(|e| PlysError::validation(format!("read artifact '{}': {e}", path.display())))?
        .starts_with(&GZIP_MAGIC);

    if is_gzip {
        Ok(Box::new(BufReader::new(GzDecoder::new(r))))
    } else {
        Ok(Box::new(r))
    }
}

/// Read just the header of an artifact on disk.
pub fn read_artifact_header(path: impl AsRef<Path>) -> PlysResult<SequenceHeader> {
    let mut r = open_artifact(path)?;
    SequenceHeader::read_from(&mut r)
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/header.rs"]
mod tests;
