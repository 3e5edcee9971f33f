// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, bail, Result};
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { content: Vec<u8>, modified: SystemTime },
    Dir(Vec<String>), // List of child names
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    /// Paths (and everything below them) that reject every operation.
    locked: HashSet<PathBuf>,
    /// Paths that report themselves as symbolic links.
    symlinks: HashSet<PathBuf>,
    /// Logical clock used for modification times.
    clock: u64,
}

/// In-memory filesystem for deterministic tests.
///
/// Parent directories are created implicitly. Paths are used verbatim (no
/// canonicalization), so tests should stick to one spelling per path.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut state = MockState::default();
        // Ensure root exists
        state
            .entries
            .insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let mut state = self.lock_state();
        insert_file(&mut state, path.as_ref(), content.into());
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.lock_state();
        ensure_dir_entry(&mut state.entries, path.as_ref());
    }

    /// Add a directory at `path` that behaves as a symlink to `target`: it
    /// lists `target`'s children and reports `is_symlink`.
    pub fn add_symlink_dir(&self, path: impl AsRef<Path>, target: impl AsRef<Path>) {
        let (path, target) = (path.as_ref(), target.as_ref());
        let mut state = self.lock_state();
        ensure_dir_entry(&mut state.entries, path);
        let children = match state.entries.get(target) {
            Some(MockEntry::Dir(children)) => children.clone(),
            _ => Vec::new(),
        };
        state
            .entries
            .insert(path.to_path_buf(), MockEntry::Dir(children));
        state.symlinks.insert(path.to_path_buf());
    }

    /// Remove a file or directory tree, bypassing locks.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let mut state = self.lock_state();
        remove_tree(&mut state.entries, path.as_ref());
    }

    /// Make every operation on `path` (or below it) fail.
    pub fn lock(&self, path: impl AsRef<Path>) {
        self.lock_state().locked.insert(path.as_ref().to_path_buf());
    }

    pub fn unlock(&self, path: impl AsRef<Path>) {
        self.lock_state().locked.remove(path.as_ref());
    }

    pub fn file_contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        match self.lock_state().entries.get(path.as_ref()) {
            Some(MockEntry::File { content, .. }) => Some(content.clone()),
            _ => None,
        }
    }
}

fn parent_of(path: &Path) -> Option<&Path> {
    let parent = path.parent()?;
    if parent.as_os_str().is_empty() {
        Some(Path::new("."))
    } else {
        Some(parent)
    }
}

fn link_child(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    let Some(parent) = parent_of(path) else {
        return;
    };
    if parent == path {
        return;
    }
    ensure_dir_entry(entries, parent);
    if let Some(MockEntry::Dir(children)) = entries.get_mut(parent) {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_string());
            }
        }
    }
}

fn ensure_dir_entry(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    if !entries.contains_key(path) {
        entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        link_child(entries, path);
    }
}

fn insert_file(state: &mut MockState, path: &Path, content: Vec<u8>) {
    state.clock += 1;
    let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(state.clock);
    state
        .entries
        .insert(path.to_path_buf(), MockEntry::File { content, modified });
    link_child(&mut state.entries, path);
}

fn remove_tree(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    entries.retain(|p, _| !p.starts_with(path));
    if let Some(parent) = parent_of(path) {
        if let Some(MockEntry::Dir(children)) = entries.get_mut(parent) {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                children.retain(|c| c != name);
            }
        }
    }
}

fn check_unlocked(state: &MockState, path: &Path) -> Result<()> {
    if state.locked.iter().any(|locked| path.starts_with(locked)) {
        bail!("Permission denied: {:?}", path);
    }
    Ok(())
}

impl FileSystem for MockFileSystem {
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let state = self.lock_state();
        check_unlocked(&state, path)?;
        match state.entries.get(path) {
            Some(MockEntry::File { content, .. }) => Ok(Box::new(Cursor::new(content.clone()))),
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock_state().entries.contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lock_state().entries.get(path), Some(MockEntry::File { .. }))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock_state().entries.get(path), Some(MockEntry::Dir(_)))
    }

    fn is_symlink(&self, path: &Path) -> bool {
        self.lock_state().symlinks.contains(path)
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        let state = self.lock_state();
        match state.entries.get(path) {
            Some(MockEntry::File { modified, .. }) => Ok(*modified),
            Some(MockEntry::Dir(_)) => Ok(SystemTime::UNIX_EPOCH),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let state = self.lock_state();
        check_unlocked(&state, path)?;
        match state.entries.get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<u64> {
        let mut state = self.lock_state();
        check_unlocked(&state, from)?;
        check_unlocked(&state, to)?;
        let content = match state.entries.get(from) {
            Some(MockEntry::File { content, .. }) => content.clone(),
            Some(MockEntry::Dir(_)) => bail!("Is a directory: {:?}", from),
            None => bail!("File not found: {:?}", from),
        };
        match parent_of(to) {
            Some(parent) if state.entries.contains_key(parent) => {}
            _ => bail!("Parent directory not found: {:?}", to),
        }
        if matches!(state.entries.get(to), Some(MockEntry::Dir(_))) {
            bail!("Is a directory: {:?}", to);
        }
        let len = content.len() as u64;
        insert_file(&mut state, to, content);
        Ok(len)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut state = self.lock_state();
        check_unlocked(&state, path)?;
        if matches!(state.entries.get(path), Some(MockEntry::File { .. })) {
            bail!("File exists: {:?}", path);
        }
        ensure_dir_entry(&mut state.entries, path);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let mut state = self.lock_state();
        check_unlocked(&state, path)?;
        match state.entries.get(path) {
            Some(MockEntry::File { .. }) => {
                remove_tree(&mut state.entries, path);
                Ok(())
            }
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        let mut state = self.lock_state();
        check_unlocked(&state, path)?;
        match state.entries.get(path) {
            Some(MockEntry::Dir(_)) => {
                remove_tree(&mut state.entries, path);
                Ok(())
            }
            Some(MockEntry::File { .. }) => Err(anyhow!("Not a directory: {:?}", path)),
            None => Err(anyhow!("Directory not found: {:?}", path)),
        }
    }
}
