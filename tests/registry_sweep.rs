// tests/registry_sweep.rs

use std::path::PathBuf;

use filemirror::watch::registry::{
    EntryState, Observation, ObserveOutcome, WatchKey, WatchRegistry,
};

fn observation(name: &str, hash: &str) -> Observation {
    Observation {
        relative_path: PathBuf::from(name),
        source: PathBuf::from("/src").join(name),
        destination: PathBuf::from("/dst").join(name),
        modified: None,
        hash: hash.to_string(),
    }
}

fn key(name: &str) -> WatchKey {
    WatchKey::new(0, PathBuf::from("/dst").join(name))
}

#[test]
fn new_entries_are_fresh_and_dirty() {
    let mut registry = WatchRegistry::new();
    assert!(registry.is_empty());

    let outcome = registry.observe(key("a.txt"), observation("a.txt", "h1"));
    assert_eq!(outcome, ObserveOutcome::New);

    let entry = registry.get(&key("a.txt")).unwrap();
    assert_eq!(entry.state, EntryState::Fresh);
    assert!(entry.dirty);
    assert_eq!(registry.dirty_keys(), vec![key("a.txt")]);
}

#[test]
fn sweep_keeps_observed_entries_and_rearms_them() {
    let mut registry = WatchRegistry::new();
    registry.observe(key("a.txt"), observation("a.txt", "h1"));

    assert!(registry.sweep().is_empty());
    assert_eq!(registry.get(&key("a.txt")).unwrap().state, EntryState::Stale);

    // Not observed again: the next sweep drops it.
    let removed = registry.sweep();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].0, key("a.txt"));
    assert!(!registry.contains(&key("a.txt")));
}

#[test]
fn reobserving_only_dirties_on_content_change() {
    let mut registry = WatchRegistry::new();
    registry.observe(key("a.txt"), observation("a.txt", "h1"));
    registry.get_mut(&key("a.txt")).unwrap().dirty = false;
    registry.sweep();

    let outcome = registry.observe(key("a.txt"), observation("a.txt", "h1"));
    assert_eq!(outcome, ObserveOutcome::Unchanged);
    let entry = registry.get(&key("a.txt")).unwrap();
    assert_eq!(entry.state, EntryState::Confirmed);
    assert!(!entry.dirty);

    registry.sweep();
    let outcome = registry.observe(key("a.txt"), observation("a.txt", "h2"));
    assert_eq!(outcome, ObserveOutcome::Changed);
    let entry = registry.get(&key("a.txt")).unwrap();
    assert!(entry.dirty);
    assert_eq!(entry.hash, "h2");
}

#[test]
fn confirm_and_confirm_under_keep_entries_alive() {
    let mut registry = WatchRegistry::new();
    registry.observe(key("a.txt"), observation("a.txt", "h1"));
    registry.observe(key("sub/b.txt"), observation("sub/b.txt", "h2"));
    registry.observe(key("sub/c.txt"), observation("sub/c.txt", "h3"));
    registry.sweep();

    assert!(registry.confirm(&key("a.txt")));
    assert!(!registry.confirm(&key("missing.txt")));
    assert_eq!(registry.confirm_under(0, &PathBuf::from("/src/sub")), 2);
    // Other mappings are untouched.
    assert_eq!(registry.confirm_under(1, &PathBuf::from("/src")), 0);

    assert!(registry.sweep().is_empty());
    assert_eq!(registry.len(), 3);
}

#[test]
fn destinations_lists_claimed_paths() {
    let mut registry = WatchRegistry::new();
    registry.observe(key("a.txt"), observation("a.txt", "h1"));
    registry.observe(
        WatchKey::new(1, "/dst/a.txt"),
        observation("a.txt", "h1"),
    );

    let destinations = registry.destinations();
    assert_eq!(destinations.len(), 1);
    assert!(destinations.contains(PathBuf::from("/dst/a.txt").as_path()));
}
