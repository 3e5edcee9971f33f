// tests/config_loading.rs

use std::fs;
use std::path::{Path, PathBuf};

use filemirror::config::{load_and_validate, load_from_path, parse_str, ConfigFile, RawConfigFile};
use filemirror::errors::MirrorError;
use filemirror::types::ConfigFormat;

fn write_config(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn json_config_resolves_relative_roots() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "mirror.json",
        r#"{
            "mappings": [
                {
                    "srcRoot": "src/main/resources",
                    "dstRoot": "build/classes",
                    "files": "**/*.xml",
                    "ignored": "*.bak",
                    "cleanupPatterns": ["**/test"]
                }
            ]
        }"#,
    );

    let cfg = load_and_validate(&path, dir.path()).unwrap();
    let mapping = &cfg.mappings()[0];
    assert_eq!(mapping.src_root, dir.path().join("src/main/resources"));
    assert_eq!(mapping.dst_root, dir.path().join("build/classes"));
    assert_eq!(mapping.include, "**/*.xml");
    assert_eq!(mapping.exclude, "*.bak");
    assert_eq!(mapping.cleanup_patterns, vec!["**/test".to_string()]);
}

#[test]
fn toml_config_accepts_snake_case_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "mirror.toml",
        r#"
[[mappings]]
srcRoot = "/abs/src"
dstRoot = "/abs/dst"

[[mappings]]
src_root = "web"
dst_root = "public"
include = "**/*.css"
cleanup_patterns = ["**/tmp"]
"#,
    );

    let cfg = load_and_validate(&path, Path::new("/base")).unwrap();
    let mappings = cfg.mappings();
    assert_eq!(mappings.len(), 2);
    assert_eq!(mappings[0].src_root, PathBuf::from("/abs/src"));
    assert_eq!(mappings[0].include, "");
    assert_eq!(mappings[1].src_root, PathBuf::from("/base/web"));
    assert_eq!(mappings[1].dst_root, PathBuf::from("/base/public"));
    assert_eq!(mappings[1].include, "**/*.css");
    assert_eq!(mappings[1].cleanup_patterns, vec!["**/tmp".to_string()]);
}

#[test]
fn capitalised_mappings_key_is_accepted() {
    let raw = parse_str(
        r#"{"Mappings": [{"srcRoot": "a", "dstRoot": "b"}]}"#,
        ConfigFormat::Json,
    )
    .unwrap();
    assert_eq!(raw.mappings.len(), 1);
    assert!(ConfigFile::try_from(raw).is_ok());
}

#[test]
fn format_is_chosen_by_extension() {
    assert_eq!(ConfigFormat::from_path(Path::new("a.toml")), ConfigFormat::Toml);
    assert_eq!(ConfigFormat::from_path(Path::new("a.TOML")), ConfigFormat::Toml);
    assert_eq!(ConfigFormat::from_path(Path::new("a.json")), ConfigFormat::Json);
    assert_eq!(ConfigFormat::from_path(Path::new("mirror.conf")), ConfigFormat::Json);
    assert_eq!(ConfigFormat::from_path(Path::new("mirror")), ConfigFormat::Json);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_from_path("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, MirrorError::IoError(_)), "got {err:?}");
}

#[test]
fn malformed_files_report_their_format() {
    let err = parse_str("{ not json", ConfigFormat::Json).unwrap_err();
    assert!(matches!(err, MirrorError::JsonError(_)), "got {err:?}");

    let err = parse_str("[[mappings]\nsrcRoot =", ConfigFormat::Toml).unwrap_err();
    assert!(matches!(err, MirrorError::TomlError(_)), "got {err:?}");

    // srcRoot is required.
    let err = parse_str(r#"{"mappings": [{"dstRoot": "b"}]}"#, ConfigFormat::Json).unwrap_err();
    assert!(matches!(err, MirrorError::JsonError(_)), "got {err:?}");
}

fn validation_error(json: &str) -> String {
    let raw: RawConfigFile = parse_str(json, ConfigFormat::Json).unwrap();
    match ConfigFile::try_from(raw) {
        Err(MirrorError::ConfigError(msg)) => msg,
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn validation_rejects_bad_mappings() {
    assert!(validation_error("{}").contains("at least one mapping"));
    assert!(validation_error(r#"{"mappings": []}"#).contains("at least one mapping"));
    assert!(
        validation_error(r#"{"mappings": [{"srcRoot": "", "dstRoot": "b"}]}"#)
            .contains("`srcRoot` must not be empty")
    );
    assert!(
        validation_error(r#"{"mappings": [{"srcRoot": "a", "dstRoot": ""}]}"#)
            .contains("`dstRoot` must not be empty")
    );
    assert!(
        validation_error(r#"{"mappings": [{"srcRoot": "a", "dstRoot": "a/out"}]}"#)
            .contains("must not be inside")
    );
}

#[test]
fn validation_rejects_invalid_patterns_with_mapping_index() {
    let msg = validation_error(
        r#"{"mappings": [
            {"srcRoot": "a", "dstRoot": "b"},
            {"srcRoot": "c", "dstRoot": "d", "cleanupPatterns": ["[broken"]}
        ]}"#,
    );
    assert!(msg.starts_with("mapping 1:"), "got {msg}");
    assert!(msg.contains("[broken"), "got {msg}");
}

#[test]
fn destination_inside_source_is_caught_after_resolving_roots() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("A/out");
    let contents = format!(
        r#"{{"mappings": [{{"srcRoot": "A", "dstRoot": {}}}]}}"#,
        serde_json::to_string(&nested.to_string_lossy()).unwrap()
    );
    let path = write_config(dir.path(), "mirror.json", &contents);

    match load_and_validate(&path, dir.path()) {
        Err(MirrorError::ConfigError(msg)) => assert!(msg.contains("must not be inside"), "got {msg}"),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn empty_roots_are_still_rejected_after_resolving() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "mirror.json",
        r#"{"mappings": [{"srcRoot": "", "dstRoot": "out"}]}"#,
    );
    assert!(matches!(
        load_and_validate(&path, dir.path()),
        Err(MirrorError::ConfigError(_))
    ));
}
