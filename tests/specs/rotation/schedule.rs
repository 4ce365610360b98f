//! Rotation schedule specs
//!
//! Verify the background task rotates on its interval and stops on shutdown.

use crate::prelude::*;

#[tokio::test(start_paused = true)]
async fn interval_rotation_runs_in_background() {
    let temp = LogDir::new();
    let config = LoggerConfig {
        rotation_interval_secs: Some(60),
        ..temp.config("app", 10)
    };
    let logger = Logger::builder()
        .config(config)
        .clock(FakeClock::new())
        .build()
        .unwrap();

    tokio::time::sleep(Duration::from_secs(200)).await;
    let health = logger.rotation_health().unwrap();
    logger.shutdown().await.unwrap();

    assert_eq!(health.rotations, 3);
    assert_eq!(health.failures, 0);
    assert_eq!(temp.files().len(), 4);
}

#[tokio::test]
async fn daily_rotation_stops_promptly_on_shutdown() {
    let temp = LogDir::new();
    let config = LoggerConfig {
        rotation_interval_secs: None,
        ..temp.config("app", 3)
    };
    let logger = Logger::builder().config(config).build().unwrap();

    let done = tokio::time::timeout(Duration::from_secs(2), logger.shutdown()).await;

    assert!(matches!(done, Ok(Ok(()))));
    assert_eq!(temp.files().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_rotation_is_retried_next_tick() {
    let temp = LogDir::new();
    let config = LoggerConfig {
        rotation_interval_secs: Some(60),
        ..temp.config("app", 10)
    };
    let logger = Logger::builder()
        .config(config)
        .clock(FakeClock::new())
        .build()
        .unwrap();
    std::fs::remove_dir_all(temp.log_dir()).unwrap();

    tokio::time::sleep(Duration::from_secs(90)).await;
    let failed = logger.rotation_health().unwrap();
    std::fs::create_dir_all(temp.log_dir()).unwrap();
    tokio::time::sleep(Duration::from_secs(60)).await;
    let recovered = logger.rotation_health().unwrap();
    logger.shutdown().await.unwrap();

    assert_eq!(failed.failures, 1);
    assert!(failed.last_error.is_some());
    assert_eq!(recovered.rotations, 1);
    assert_eq!(recovered.last_error, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn real_time_interval_rotation() {
    let temp = LogDir::new();
    let config = LoggerConfig {
        rotation_interval_secs: Some(1),
        ..temp.config("app", 5)
    };
    let logger = Logger::builder().config(config).build().unwrap();

    let rotated = wait_for(5_000, || {
        logger
            .rotation_health()
            .is_some_and(|health| health.rotations >= 1)
    });
    logger.shutdown().await.unwrap();

    assert!(rotated, "no rotation within 5s");
    assert!(temp.files().len() >= 2);
}
