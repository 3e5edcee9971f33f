// tests/cleanup_sweep.rs

use std::path::PathBuf;
use std::sync::Arc;

use filemirror::engine::cleanup::collect_cleanup_dirs;
use filemirror::engine::MirrorEvent;
use filemirror::fs::mock::MockFileSystem;
use filemirror::fs::FileSystem;
use filemirror::watch::patterns::PatternList;
use filemirror_test_utils::builders::{ConfigFileBuilder, MappingBuilder};
use filemirror_test_utils::{engine_with_recorder, RecordingReporter};

fn destination_tree() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("/dst/test/a.txt", b"a");
    fs.add_file("/dst/test/inner/test/b.txt", b"b");
    fs.add_file("/dst/keep/c.txt", b"c");
    fs.add_file("/dst/x/test/d.txt", b"d");
    fs.add_file("/dst/latest/e.txt", b"e");
    fs
}

#[test]
fn collect_queues_matching_directories_without_descending() {
    let fs = destination_tree();
    let patterns = PatternList::new(&["**/test"]).unwrap();
    let reporter = RecordingReporter::new();

    let mut queued = collect_cleanup_dirs(&fs, &PathBuf::from("/dst"), &patterns, &reporter);
    queued.sort();

    // Literal segments match as substrings, so `latest` qualifies too.
    assert_eq!(
        queued,
        vec![
            PathBuf::from("/dst/latest"),
            PathBuf::from("/dst/test"),
            PathBuf::from("/dst/x/test"),
        ]
    );
}

#[test]
fn collect_with_no_patterns_or_missing_root_is_empty() {
    let fs = destination_tree();
    let reporter = RecordingReporter::new();

    let none = PatternList::new::<&str>(&[]).unwrap();
    assert!(collect_cleanup_dirs(&fs, &PathBuf::from("/dst"), &none, &reporter).is_empty());

    let patterns = PatternList::new(&["**/test"]).unwrap();
    assert!(collect_cleanup_dirs(&fs, &PathBuf::from("/nowhere"), &patterns, &reporter).is_empty());
}

#[test]
fn engine_cleanup_removes_matching_directories_only() {
    let fs = destination_tree();
    let cfg = ConfigFileBuilder::new()
        .with_mapping(MappingBuilder::new("/src", "/dst").cleanup("**/test").build())
        .build();
    let (engine, reporter) = engine_with_recorder(&cfg, Arc::new(fs.clone()));

    let stats = engine.cleanup();
    assert_eq!(stats.queued, 3);
    assert_eq!(stats.removed, 3);
    assert_eq!(stats.failed, 0);

    assert!(!fs.exists(&PathBuf::from("/dst/test")));
    assert!(!fs.exists(&PathBuf::from("/dst/x/test")));
    assert!(fs.exists(&PathBuf::from("/dst/x")));
    assert!(fs.file_contents("/dst/keep/c.txt").is_some());
    assert_eq!(
        reporter.count(|e| matches!(e, MirrorEvent::CleanupRemoved { .. })),
        3
    );
}

#[test]
fn failed_removal_does_not_stop_cleanup() {
    let fs = destination_tree();
    fs.lock("/dst/test");
    let cfg = ConfigFileBuilder::new()
        .with_mapping(MappingBuilder::new("/src", "/dst").cleanup("**/test").build())
        .build();
    let (engine, reporter) = engine_with_recorder(&cfg, Arc::new(fs.clone()));

    let stats = engine.cleanup();
    assert_eq!(stats.removed, 2);
    assert_eq!(stats.failed, 1);
    assert!(fs.file_contents("/dst/test/a.txt").is_some());
    assert!(!fs.exists(&PathBuf::from("/dst/x/test")));
    assert!(reporter.events().iter().any(|e| matches!(
        e,
        MirrorEvent::CleanupFailed { path, .. } if path == &PathBuf::from("/dst/test")
    )));
}

#[test]
fn overlapping_mappings_remove_each_directory_once() {
    let fs = destination_tree();
    let cfg = ConfigFileBuilder::new()
        .with_mapping(MappingBuilder::new("/srcA", "/dst").cleanup("**/test").build())
        .with_mapping(MappingBuilder::new("/srcB", "/dst/x").cleanup("**/test").build())
        .build();
    let (engine, _reporter) = engine_with_recorder(&cfg, Arc::new(fs.clone()));

    let stats = engine.cleanup();
    assert_eq!(stats.queued, 3);
    assert_eq!(stats.failed, 0);
}

#[test]
fn mappings_without_cleanup_patterns_leave_destinations_alone() {
    let fs = destination_tree();
    let cfg = ConfigFileBuilder::new()
        .with_mapping(MappingBuilder::new("/src", "/dst").build())
        .build();
    let (engine, _reporter) = engine_with_recorder(&cfg, Arc::new(fs.clone()));

    let stats = engine.cleanup();
    assert_eq!(stats.queued, 0);
    assert!(fs.file_contents("/dst/test/a.txt").is_some());
}

#[test]
fn names_above_the_destination_root_do_not_match() {
    let fs = MockFileSystem::new();
    fs.add_file("/test-projects/out/keep/important.txt", b"keep");
    fs.add_file("/test-projects/out/test/old.txt", b"old");
    let patterns = PatternList::new(&["**/test"]).unwrap();
    let reporter = RecordingReporter::new();

    let queued = collect_cleanup_dirs(
        &fs,
        &PathBuf::from("/test-projects/out"),
        &patterns,
        &reporter,
    );
    assert_eq!(queued, vec![PathBuf::from("/test-projects/out/test")]);
}

#[test]
fn destination_root_is_never_queued() {
    let fs = MockFileSystem::new();
    fs.add_file("/out/test/a.txt", b"a");
    let patterns = PatternList::new(&["**/test"]).unwrap();
    let reporter = RecordingReporter::new();

    let queued = collect_cleanup_dirs(&fs, &PathBuf::from("/out/test"), &patterns, &reporter);
    assert!(queued.is_empty());
}

#[test]
fn symlinked_directories_are_neither_queued_nor_walked() {
    let fs = MockFileSystem::new();
    fs.add_file("/elsewhere/test/keep.txt", b"k");
    fs.add_dir("/dst");
    fs.add_symlink_dir("/dst/test", "/elsewhere/test");
    fs.add_symlink_dir("/dst/linked", "/elsewhere");
    let patterns = PatternList::new(&["**/test"]).unwrap();
    let reporter = RecordingReporter::new();

    let queued = collect_cleanup_dirs(&fs, &PathBuf::from("/dst"), &patterns, &reporter);
    assert!(queued.is_empty(), "queued {queued:?}");
}
