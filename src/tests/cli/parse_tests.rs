//! Tests for output token handling and config loading.

use crate::cli::{OutputArgs, TeeArgs, load_config_file, normalize_output, output_target};
use crate::config::FileExistsPolicy;
use crate::error::ConfigError;

#[test]
fn normalize_output_maps_stream_aliases() {
    assert_eq!(normalize_output("-"), "-");
    assert_eq!(normalize_output("STDOUT"), "-");
    assert_eq!(normalize_output("stderr"), "stderr");
    assert_eq!(normalize_output("@stdout"), "@stdout");
    assert_eq!(normalize_output("logs/out.txt"), "logs/out.txt");
}

#[test]
fn output_args_track_stdout() {
    let args = OutputArgs::new().with_output("a.txt");
    assert!(!args.is_stdout());
    let args = args.with_output("stdout");
    assert!(args.is_stdout());
    assert_eq!(args.as_slice(), &["a.txt".to_string(), "-".to_string()]);
}

#[test]
fn output_targets_resolve_tokens() {
    assert_eq!(output_target("-").id(), "-");
    assert_eq!(output_target("stderr").id(), "stderr");
    assert_eq!(output_target("@stderr").id(), "stderr");
    assert_eq!(output_target("out.txt").id(), "out.txt");
}

#[test]
fn tee_args_build_specs_with_policy() {
    let mut args = TeeArgs {
        outputs: OutputArgs::new().with_output("a.txt").with_output("-"),
        ..TeeArgs::default()
    };
    let specs = args.output_specs();
    assert_eq!(specs.len(), 2);
    assert!(specs.iter().all(|s| s.file_exists_policy == FileExistsPolicy::Overwrite));
    assert_eq!(specs[0].raw, "a.txt");

    args.append = true;
    assert!(
        args.output_specs()
            .iter()
            .all(|s| s.file_exists_policy == FileExistsPolicy::Append)
    );
}

#[test]
fn tee_args_builder_carries_mode_flags() {
    let args = TeeArgs {
        parallel: true,
        adaptive: true,
        ..TeeArgs::default()
    };
    let multi = args.builder().unwrap().build();
    assert!(multi.is_parallel());
    assert!(multi.is_adaptive());
}

#[test]
fn load_config_file_rejects_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tuning.ini");
    std::fs::write(&path, "minimal_writer = 2").unwrap();

    let err = load_config_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Unsupported(_)));

    let missing = dir.path().join("absent.json");
    assert!(matches!(load_config_file(&missing), Err(ConfigError::Io(_))));
}

#[cfg(feature = "json")]
#[test]
fn load_config_file_reads_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tuning.json");
    std::fs::write(&path, r#"{"minimal_writer": 2, "threshold_latency": "10ms"}"#).unwrap();

    let args = TeeArgs {
        config: Some(path.to_string_lossy().into_owned()),
        ..TeeArgs::default()
    };
    let cfg = args.load_config().unwrap();
    assert_eq!(cfg.minimal_writer, 2);
    assert_eq!(cfg.threshold_latency, std::time::Duration::from_millis(10));
}
