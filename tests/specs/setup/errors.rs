//! Setup error specs
//!
//! Verify setup failures are reported to the caller.

use crate::prelude::*;

#[test]
fn rotation_outside_runtime_is_rejected() {
    let temp = LogDir::new();

    let err = Logger::builder()
        .config(temp.config("app", 3))
        .build()
        .unwrap_err();

    assert!(matches!(err, SetupError::NoRuntime), "got {err:?}");
    assert!(temp.entries().is_empty());
}

#[test]
fn unwritable_directory_is_rejected() {
    let temp = LogDir::new();
    temp.write("log", "a file where the directory should be");

    let err = Logger::builder()
        .config(temp.config("app", 0))
        .build()
        .unwrap_err();

    assert!(matches!(err, SetupError::CreateDir { .. }), "got {err:?}");
}

#[test]
fn invalid_config_file_is_rejected() {
    let temp = LogDir::new();
    let path = temp.write("tidelog.toml", "rotation_interval_secs = 0\n");

    let err = LoggerConfig::load(&path).unwrap_err();

    assert_eq!(
        err.to_string(),
        "rotation_interval_secs must be greater than zero"
    );
}

#[test]
fn setup_error_messages_name_the_problem() {
    let temp = LogDir::new();
    let config = LoggerConfig {
        level: "app=loud".to_string(),
        ..temp.config("app", 0)
    };

    let err = Logger::builder().config(config).build().unwrap_err();

    assert!(err.to_string().contains("app=loud"), "got {err}");
}
