//! Console output specs
//!
//! Verify loggers that do not write files.

use crate::prelude::*;

#[test]
fn console_logger_writes_hello_and_creates_no_files() {
    let temp = LogDir::new();
    let config = LoggerConfig {
        directory: temp.log_dir(),
        write_to_file: false,
        ..LoggerConfig::default()
    };
    let (logger, buffer) = console_logger(config);

    logger.info("hello");

    let records = parse_records(&buffer.contents());
    assert!(messages(&records).contains(&"hello".to_string()));
    assert!(temp.entries().is_empty());
}

#[test]
fn console_logger_needs_no_runtime() {
    let temp = LogDir::new();
    let config = LoggerConfig {
        directory: temp.log_dir(),
        ..LoggerConfig::stdout()
    };

    let logger = Logger::builder().config(config).build();

    assert!(logger.is_ok());
    assert!(temp.entries().is_empty());
}

#[test]
fn every_line_is_one_json_object() {
    let temp = LogDir::new();
    let (logger, buffer) = console_logger(LoggerConfig {
        directory: temp.log_dir(),
        ..LoggerConfig::stdout()
    });

    logger.info("multi\nline");
    logger.warn(format_args!("quote \" and brace {{"));

    let records = parse_records(&buffer.contents());
    assert_eq!(
        messages(&records)[1..],
        ["multi\nline".to_string(), "quote \" and brace {".to_string()]
    );
}

#[test]
fn console_logger_does_not_rotate() {
    let temp = LogDir::new();
    let (logger, _buffer) = console_logger(LoggerConfig {
        directory: temp.log_dir(),
        ..LoggerConfig::stdout()
    });

    assert!(matches!(logger.rotate_now(), Err(RotationError::Disabled)));
    assert!(logger.rotation_health().is_none());
}
