// tests/runtime_loop.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use filemirror::engine::{Runtime, RuntimeOptions};
use filemirror::fs::mock::MockFileSystem;
use filemirror_test_utils::builders::{ConfigFileBuilder, MappingBuilder};
use filemirror_test_utils::{engine_with_recorder, init_tracing, with_timeout};

fn mock_engine(fs: &MockFileSystem) -> (filemirror::engine::MirrorEngine, filemirror_test_utils::RecordingReporter) {
    let cfg = ConfigFileBuilder::new()
        .with_mapping(MappingBuilder::new("/src", "/dst").build())
        .build();
    engine_with_recorder(&cfg, Arc::new(fs.clone()))
}

#[tokio::test(flavor = "multi_thread")]
async fn once_runs_a_single_cycle() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("/src/a.txt", b"a");
    let (engine, reporter) = mock_engine(&fs);

    let (_shutdown_tx, shutdown_rx) = mpsc::channel(1);
    let options = RuntimeOptions {
        once: true,
        ..RuntimeOptions::default()
    };
    let engine = with_timeout(Runtime::new(engine, options, shutdown_rx).run()).await;

    assert_eq!(engine.cycles(), 1);
    assert_eq!(reporter.copies(), 1);
    assert!(fs.file_contents("/dst/a.txt").is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn shutdown_stops_the_loop_between_cycles() {
    let fs = MockFileSystem::new();
    fs.add_file("/src/a.txt", b"a");
    let (engine, _reporter) = mock_engine(&fs);

    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
    let options = RuntimeOptions {
        once: false,
        interval: Duration::from_millis(5),
    };
    let handle = tokio::spawn(Runtime::new(engine, options, shutdown_rx).run());

    tokio::time::sleep(Duration::from_millis(60)).await;
    shutdown_tx.send(()).await.unwrap();

    let engine = with_timeout(handle).await.unwrap();
    assert!(engine.cycles() >= 2, "only {} cycles ran", engine.cycles());
}

#[tokio::test(flavor = "multi_thread")]
async fn pending_shutdown_stops_after_the_first_cycle() {
    let fs = MockFileSystem::new();
    let (engine, _reporter) = mock_engine(&fs);

    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
    shutdown_tx.send(()).await.unwrap();

    let options = RuntimeOptions {
        once: false,
        interval: Duration::from_secs(60),
    };
    let engine = with_timeout(Runtime::new(engine, options, shutdown_rx).run()).await;
    assert_eq!(engine.cycles(), 1);
}
