//! Per-project context owning the registry, engine and configuration

use std::path::{Path, PathBuf};
use std::sync::Arc;

use casefix_fs::{FileSystem, LocalFileSystem};
use casefix_git::GitBackend;

use crate::Resolution;
use crate::cancel::CancellationToken;
use crate::check::{CheckOutcome, PreCommitCheck};
use crate::config::FixerConfig;
use crate::entry::{ChangeRecord, TrackedFileEntry};
use crate::reconcile::{FixReport, ReconciliationEngine};
use crate::registry::RepositoryRegistry;
use crate::review::ReviewSession;
use crate::scanner::{MismatchScanner, ScanOutcome};
use crate::Result;

/// Everything one open project needs to scan and fix case mismatches.
///
/// Caches live here rather than in process-wide state; two workspaces never
/// share an index.
#[derive(Debug)]
pub struct Workspace {
    project_root: PathBuf,
    config: FixerConfig,
    registry: RepositoryRegistry,
    engine: ReconciliationEngine,
}

impl Workspace {
    /// Load the project config, build the configured backend and discover
    /// the repositories under `project_root`.
    pub fn open(project_root: &Path) -> Result<Self> {
        let config = FixerConfig::load(project_root)?;
        let backend: Arc<dyn GitBackend> = Arc::from(config.git_backend.create()?);
        let fs: Arc<dyn FileSystem> =
            Arc::new(LocalFileSystem::with_case_sensitivity(config.case_sensitivity));

        let workspace = Self::with_parts(project_root, config, backend, fs);
        let count = workspace.registry.discover(project_root)?;
        tracing::debug!(
            root = %project_root.display(),
            repositories = count,
            "Opened workspace"
        );
        Ok(workspace)
    }

    /// Assemble a workspace from explicit collaborators. No repositories are
    /// registered yet.
    pub fn with_parts(
        project_root: &Path,
        config: FixerConfig,
        backend: Arc<dyn GitBackend>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        let registry = RepositoryRegistry::new(Arc::clone(&backend), Arc::clone(&fs));
        let engine = ReconciliationEngine::new(backend, fs, config.batch);
        Self {
            project_root: project_root.to_path_buf(),
            config,
            registry,
            engine,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn config(&self) -> &FixerConfig {
        &self.config
    }

    pub fn registry(&self) -> &RepositoryRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &ReconciliationEngine {
        &self.engine
    }

    /// Fresh scan of `changes`, plus all tracked files when `include_all`.
    pub fn scan(
        &self,
        changes: &[ChangeRecord],
        include_all: bool,
        cancel: &CancellationToken,
    ) -> Result<ScanOutcome> {
        self.registry.clear_caches();
        MismatchScanner::new(&self.registry).scan(changes, include_all, cancel)
    }

    /// Every mismatch among all tracked files. An empty list is the normal
    /// "nothing to fix" answer.
    pub fn all_mismatches(&self, cancel: &CancellationToken) -> Result<Vec<TrackedFileEntry>> {
        let outcome = self.scan(&[], true, cancel);
        self.registry.clear_caches();
        Ok(outcome?.into_entries())
    }

    /// Apply one resolution to `entries`.
    pub fn fix(&self, entries: &[TrackedFileEntry], resolution: Resolution) -> FixReport {
        let report = self.engine.apply(entries, resolution);
        self.registry.clear_caches();
        report
    }

    /// Apply the choices made in a review.
    pub fn fix_reviewed(&self, review: &ReviewSession) -> FixReport {
        let report = review.apply(&self.engine);
        self.registry.clear_caches();
        report
    }

    /// Drain the paths renamed on disk since the last call, sorted.
    pub fn take_dirty(&self) -> Vec<PathBuf> {
        self.registry
            .fs()
            .take_dirty()
            .iter()
            .map(|path| path.to_native())
            .collect()
    }

    pub fn pre_commit_check(
        &self,
        changes: &[ChangeRecord],
        cancel: &CancellationToken,
    ) -> Result<CheckOutcome> {
        PreCommitCheck::new(&self.registry, &self.engine, &self.config).run(changes, cancel)
    }

    /// Re-discover repositories after they were added, removed or moved.
    pub fn vcs_configuration_changed(&self) -> Result<usize> {
        let roots = casefix_git::discover_roots(&self.project_root)?;
        let count = roots.len();
        self.registry.vcs_configuration_changed(roots);
        Ok(count)
    }
}
