use std::io::Cursor;

use super::*;

#[test]
fn header_text_with_framerate() {
    let h = SequenceHeader::new(Some(Framerate::new(24.0).unwrap()));
    assert_eq!(h.to_text(), "plys\nframerate 24.0\nend_sequence_header\n");
}

#[test]
fn header_text_without_framerate() {
    assert_eq!(
        SequenceHeader::default().to_text(),
        "plys\nend_sequence_header\n"
    );
}

#[test]
fn read_from_stops_at_first_payload_byte() {
    let bytes = b"plys\nframerate 29.97\nend_sequence_header\nply\r\nformat ascii 1.0\r\n";
    let mut r = Cursor::new(&bytes[..]);
    let h = SequenceHeader::read_from(&mut r).unwrap();
    assert_eq!(h.framerate.map(Framerate::get), Some(29.97));

    let mut rest = Vec::new();
    r.read_to_end(&mut rest).unwrap();
    assert_eq!(rest, b"ply\r\nformat ascii 1.0\r\n");
}

#[test]
fn read_from_accepts_crlf_and_unknown_keys() {
    let bytes = b"plys\r\nauthor someone\r\nend_sequence_header\r\n";
    let h = SequenceHeader::read_from(&mut Cursor::new(&bytes[..])).unwrap();
    assert_eq!(h.framerate, None);
}

#[test]
fn read_from_rejects_foreign_or_truncated_input() {
    let not_plys = b"ply\nformat ascii 1.0\n";
    assert!(SequenceHeader::read_from(&mut Cursor::new(&not_plys[..])).is_err());

    let truncated = b"plys\nframerate 24.0\n";
    assert!(SequenceHeader::read_from(&mut Cursor::new(&truncated[..])).is_err());

    let bad_rate = b"plys\nframerate fast\nend_sequence_header\n";
    assert!(SequenceHeader::read_from(&mut Cursor::new(&bad_rate[..])).is_err());
}

#[test]
fn open_artifact_detects_gzip() {
    let dir = tempfile::tempdir().unwrap();
    let text = SequenceHeader::new(Some(Framerate::new(12.5).unwrap())).to_text();

    let plain = dir.path().join("a.plys");
    std::fs::write(&plain, &text).unwrap();

    let gz = dir.path().join("a.plys.gz");
    let mut enc = flate2::write::GzEncoder::new(
        std::fs::File::create(&gz).unwrap(),
        flate2::Compression::default(),
    );
    enc.write_all(text.as_bytes()).unwrap();
    enc.finish().unwrap();

    for path in [&plain, &gz] {
        let h = read_artifact_header(path).unwrap();
        assert_eq!(h.framerate.map(Framerate::get), Some(12.5));
    }
}

#[test]
fn open_artifact_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = match open_artifact(dir.path().join("missing.plys")) {
        Ok(_) => panic!("expected an error"),
        Err(e) => e,
    };
    assert!(err.to_string().contains("missing.plys"));
}
