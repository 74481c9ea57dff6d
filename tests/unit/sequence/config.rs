use super::*;

#[test]
fn builder_defaults() {
    let cfg = BuildConfig::new(["b.ply", "a.ply"]);
    assert_eq!(cfg.inputs, vec![PathBuf::from("b.ply"), PathBuf::from("a.ply")]);
    assert_eq!(cfg.compression, Compression::None);
    assert_eq!(cfg.header, HeaderMode::Sequence { framerate: None });
    assert_eq!(cfg.on_read_failure, ReadFailurePolicy::BestEffort);
    assert!(cfg.temp_dir.is_none());
    cfg.validate().unwrap();
}

#[test]
fn empty_inputs_fail_validation() {
    let err = BuildConfig::new(Vec::<PathBuf>::new()).validate().unwrap_err();
    assert!(matches!(err, PlysError::Validation(_)));
}

#[test]
fn raw_mode_has_no_header() {
    let cfg = BuildConfig::new(["a.ply"])
        .with_framerate(Framerate::new(24.0).unwrap())
        .raw();
    assert!(cfg.header.header().is_none());
}

#[test]
fn parses_json_job() {
    let json = r#"
{
  "inputs": ["frames/f1.ply", "frames/f0.ply"],
  "compression": "gzip",
  "header": { "sequence": { "framerate": 30.0 } },
  "on_read_failure": "fail_fast"
}
"#;
    let cfg = BuildConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.inputs.len(), 2);
    assert_eq!(cfg.compression, Compression::Gzip);
    assert_eq!(cfg.on_read_failure, ReadFailurePolicy::FailFast);
    let header = cfg.header.header().unwrap();
    assert_eq!(header.framerate.map(Framerate::get), Some(30.0));
}

#[test]
fn json_defaults_and_raw_header() {
    let cfg = BuildConfig::from_reader(r#"{ "inputs": ["x.ply"], "header": "raw" }"#.as_bytes())
        .unwrap();
    assert_eq!(cfg.header, HeaderMode::Raw);
    assert_eq!(cfg.compression, Compression::None);
}

#[test]
fn json_rejects_bad_framerate_before_any_io() {
    let json = r#"{ "inputs": ["x.ply"], "header": { "sequence": { "framerate": "fast" } } }"#;
    let err = BuildConfig::from_reader(json.as_bytes()).unwrap_err();
    assert!(matches!(err, PlysError::Validation(_)));
}

#[test]
fn from_path_resolves_relative_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let job = dir.path().join("job.json");
    std::fs::write(
        &job,
        r#"{ "inputs": ["f0.ply", "/abs/f1.ply"], "temp_dir": "tmp" }"#,
    )
    .unwrap();

    let cfg = BuildConfig::from_path(&job).unwrap();
    assert_eq!(cfg.inputs[0], dir.path().join("f0.ply"));
    assert_eq!(cfg.inputs[1], PathBuf::from("/abs/f1.ply"));
    assert_eq!(cfg.temp_dir, Some(dir.path().join("tmp")));
}
