use std::fs::File;
use std::io::{self, Write};

use flate2::write::GzEncoder;

use crate::foundation::core::Compression;

enum Inner {
    Plain(File),
    Gzip(GzEncoder<File>),
}

/// Byte sink over the artifact file, optionally wrapped in a gzip layer.
///
/// The layer is chosen once at construction. Bytes are appended in submission order and are not
/// buffered beyond what the compressor holds internally. The underlying file is owned by the
/// writer and is only reachable again through [`StreamWriter::finish`], after the compression
/// trailer has been written.
pub struct StreamWriter {
    inner: Inner,
    compression: Compression,
    bytes_in: u64,
}

impl StreamWriter {
    pub fn new(file: File, compression: Compression) -> Self {
        let inner = match compression {
            Compression::None => Inner::Plain(file),
            Compression::Gzip => {
                Inner::Gzip(GzEncoder::new(file, flate2::Compression::default()))
            }
        };
        Self {
            inner,
            compression,
            bytes_in: 0,
        }
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Uncompressed bytes accepted so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_in
    }

    /// Close the compression layer (writing its trailer), then flush and sync the file.
    ///
    /// Dropping the writer without calling this still closes the gzip layer on a best-effort
    /// basis, but any error is lost.
    pub fn finish(self) -> io::Result<File> {
        let file = match self.inner {
            Inner::Plain(mut f) => {
                f.flush()?;
                f
            }
            Inner::Gzip(enc) => enc.finish()?,
        };
        file.sync_all()?;
        Ok(file)
    }
}

impl Write for StreamWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = match &mut self.inner {
            Inner::Plain(f) => f.write(buf)?,
            Inner::Gzip(enc) => enc.write(buf)?,
        };
        self.bytes_in += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            Inner::Plain(f) => f.flush(),
            Inner::Gzip(enc) => enc.flush(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
