//! In-memory [`GitBackend`] for tests that do not need a real index.

use std::collections::HashMap;
use std::sync::Mutex;

use casefix_fs::NormalizedPath;
use casefix_git::{Error, GitBackend, Result};

/// One recorded backend invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    List(String),
    Unindex(String, Vec<String>),
    Reindex(String, Vec<String>),
}

/// Index contents keyed by repository root, with a log of every call.
#[derive(Debug, Default)]
pub struct MemoryGit {
    indexes: Mutex<HashMap<String, Vec<String>>>,
    calls: Mutex<Vec<GitCall>>,
    failing: Mutex<bool>,
}

impl MemoryGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the tracked paths of `root`.
    pub fn with_repo(self, root: &NormalizedPath, tracked: &[&str]) -> Self {
        self.indexes.lock().unwrap().insert(
            root.as_str().to_string(),
            tracked.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Make every subsequent call fail.
    pub fn fail_all(&self) {
        *self.failing.lock().unwrap() = true;
    }

    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of `list_tracked_files` calls so far.
    pub fn list_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, GitCall::List(_)))
            .count()
    }

    pub fn tracked(&self, root: &NormalizedPath) -> Vec<String> {
        self.indexes
            .lock()
            .unwrap()
            .get(root.as_str())
            .cloned()
            .unwrap_or_default()
    }

    fn check(&self, root: &NormalizedPath) -> Result<()> {
        if *self.failing.lock().unwrap() {
            return Err(Error::CommandFailed {
                command: "memory".into(),
                root: root.to_native(),
                status: Some(128),
                stderr: "simulated failure".into(),
            });
        }
        Ok(())
    }
}

impl GitBackend for MemoryGit {
    fn list_tracked_files(&self, root: &NormalizedPath) -> Result<Vec<String>> {
        self.calls
            .lock()
            .unwrap()
            .push(GitCall::List(root.as_str().to_string()));
        self.check(root)?;
        Ok(self.tracked(root))
    }

    fn unindex(&self, root: &NormalizedPath, paths: &[String]) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(GitCall::Unindex(root.as_str().to_string(), paths.to_vec()));
        self.check(root)?;
        let mut indexes = self.indexes.lock().unwrap();
        let tracked = indexes.entry(root.as_str().to_string()).or_default();
        tracked.retain(|p| !paths.contains(p));
        Ok(())
    }

    fn reindex(&self, root: &NormalizedPath, paths: &[String]) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(GitCall::Reindex(root.as_str().to_string(), paths.to_vec()));
        self.check(root)?;
        let mut indexes = self.indexes.lock().unwrap();
        let tracked = indexes.entry(root.as_str().to_string()).or_default();
        for path in paths {
            if !tracked.contains(path) {
                tracked.push(path.clone());
            }
        }
        Ok(())
    }
}
