use std::io::{Read, Seek, SeekFrom, Write};

use super::*;

fn scratch_file() -> File {
    tempfile::tempfile().unwrap()
}

fn read_back(mut f: File) -> Vec<u8> {
    f.seek(SeekFrom::Start(0)).unwrap();
    let mut out = Vec::new();
    f.read_to_end(&mut out).unwrap();
    out
}

#[test]
fn plain_writer_appends_in_order() {
    let mut w = StreamWriter::new(scratch_file(), Compression::None);
    w.write_all(b"abc").unwrap();
    w.write_all(b"\r\n").unwrap();
    w.write_all(b"de").unwrap();
    assert_eq!(w.bytes_written(), 7);

    let f = w.finish().unwrap();
    assert_eq!(read_back(f), b"abc\r\nde");
}

#[test]
fn gzip_writer_emits_complete_stream_on_finish() {
    let mut w = StreamWriter::new(scratch_file(), Compression::Gzip);
    assert_eq!(w.compression(), Compression::Gzip);
    w.write_all(b"hello ").unwrap();
    w.write_all(b"frames").unwrap();
    assert_eq!(w.bytes_written(), 12);

    let raw = read_back(w.finish().unwrap());
    assert_eq!(&raw[..2], &[0x1f, 0x8b]);

    let mut decoded = Vec::new();
    flate2::read::GzDecoder::new(&raw[..])
        .read_to_end(&mut decoded)
        .unwrap();
    assert_eq!(decoded, b"hello frames");
}

#[test]
fn empty_gzip_stream_still_has_trailer() {
    let w = StreamWriter::new(scratch_file(), Compression::Gzip);
    let raw = read_back(w.finish().unwrap());
    // 10-byte header, empty deflate block, 8-byte crc/size trailer.
    assert!(raw.len() >= 18);

    let mut decoded = Vec::new();
    flate2::read::GzDecoder::new(&raw[..])
        .read_to_end(&mut decoded)
        .unwrap();
    assert!(decoded.is_empty());
}
