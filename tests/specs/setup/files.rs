//! File output specs
//!
//! Verify where file loggers write.

use crate::prelude::*;

#[tokio::test]
async fn existing_directory_is_reused() {
    let temp = LogDir::new();
    let keep = temp.write("log/unrelated.txt", "keep me");

    let logger = Logger::builder()
        .config(temp.config("app", 3))
        .build()
        .unwrap();
    logger.info("started");
    logger.shutdown().await.unwrap();

    assert!(keep.exists());
    assert_eq!(temp.files().len(), 2);
}

#[test]
fn config_file_drives_output_location() {
    let temp = LogDir::new();
    let toml = format!(
        "directory = {:?}\nfile_name = \"server\"\nretained_file_count = 0\ntag_host = false\n",
        temp.log_dir().display().to_string()
    );
    let path = temp.write("tidelog.toml", &toml);

    let logger = Logger::builder()
        .config(LoggerConfig::load(&path).unwrap())
        .build()
        .unwrap();
    logger.info("from config");
    logger.flush().unwrap();

    let log = temp.log_dir().join("server.log");
    let records = read_records(&log);
    assert_eq!(messages(&records), vec!["logger configured", "from config"]);
    assert!(records.iter().all(|r| r.get("host").is_none()));
}

#[tokio::test]
async fn rename_mode_keeps_writing_to_base_name() {
    let temp = LogDir::new();
    let config = LoggerConfig {
        rotation_mode: RotationMode::Rename,
        ..temp.config("app", 3)
    };
    let logger = Logger::builder()
        .config(config)
        .clock(FakeClock::new())
        .build()
        .unwrap();

    logger.info("first");
    let rotated = logger.rotate_now().unwrap();
    logger.info("second");
    logger.shutdown().await.unwrap();

    let base = temp.log_dir().join("app.log");
    assert_eq!(rotated.active, base);
    let archived = rotated.archived.unwrap();
    assert!(messages(&read_records(&archived)).contains(&"first".to_string()));
    assert_eq!(
        messages(&read_records(&base)),
        vec!["log file rotated", "second"]
    );
}
