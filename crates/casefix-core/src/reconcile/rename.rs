//! On-disk renames towards the index casing, run by a single writer thread

use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use casefix_fs::{FileSystem, NormalizedPath};

use super::FixReport;
use crate::entry::TrackedFileEntry;

/// Rename every path component of `entry` that differs from the index
/// spelling, starting at the repository root and moving down.
fn rename_chain(
    fs: &dyn FileSystem,
    root: &NormalizedPath,
    index_path: &str,
    renamed: &mut usize,
) -> casefix_fs::Result<NormalizedPath> {
    let mut current = root.clone();
    for component in index_path.split('/').filter(|c| !c.is_empty()) {
        let handle = fs.resolve(&current, component).ok_or_else(|| {
            casefix_fs::Error::io(
                current.join(component).to_native(),
                io::Error::from(io::ErrorKind::NotFound),
            )
        })?;
        current = if handle.name() == component {
            handle.path().clone()
        } else {
            *renamed += 1;
            fs.rename(&handle, component)?.path().clone()
        };
    }
    Ok(current)
}

/// Rename `entries` on disk so they carry the index casing.
///
/// Entries are handled one after another; each entry's chain of renames
/// runs inside one write scope. Failures are logged and recorded in the
/// report, and the remaining entries still run.
pub(crate) fn rename_entries(fs: &dyn FileSystem, entries: &[TrackedFileEntry]) -> FixReport {
    let mut report = FixReport::default();

    for entry in entries {
        let root = entry.repository().path();
        if fs.resolve(root, entry.file_path()).is_none() {
            let message = format!(
                "Mismatched file {} was not found by relative path {} from {}",
                entry.full_path(),
                entry.file_path(),
                root
            );
            tracing::error!("{message}");
            report.errors.push(message);
            continue;
        }

        let mut components = 0;
        let mut mutation = || -> casefix_fs::Result<()> {
            let path = rename_chain(fs, root, entry.index_path(), &mut components)?;
            fs.mark_dirty(&path);
            Ok(())
        };

        match fs.write_scope(&mut mutation) {
            Ok(()) => {
                tracing::debug!(
                    repo = %root,
                    path = %entry.index_path(),
                    components,
                    "Renamed to index casing"
                );
                report.renamed += 1;
            }
            Err(e) => {
                tracing::warn!(
                    repo = %root,
                    path = %entry.file_path(),
                    error = %e,
                    "Failed to rename to index casing"
                );
                report.errors.push(format!("{}: {e}", entry.full_path()));
            }
        }
    }
    report
}

struct Job {
    entries: Vec<TrackedFileEntry>,
    reply: Sender<FixReport>,
}

/// Handle to renames submitted to the writer.
#[derive(Debug)]
pub enum PendingFix {
    Ready(FixReport),
    Waiting(Receiver<FixReport>),
}

impl PendingFix {
    /// Block until the renames finished.
    pub fn wait(self) -> FixReport {
        match self {
            Self::Ready(report) => report,
            Self::Waiting(rx) => rx.recv().unwrap_or_else(|_| FixReport {
                errors: vec!["rename writer stopped before finishing".to_string()],
                ..FixReport::default()
            }),
        }
    }
}

/// Single background thread that applies rename jobs in submission order.
///
/// Queueing every job through one thread keeps renames from two fixes from
/// interleaving, so a child is never renamed before its parent.
pub(crate) struct RenameWriter {
    jobs: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
}

impl RenameWriter {
    pub(crate) fn spawn(fs: Arc<dyn FileSystem>) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel::<Job>();
        let worker = std::thread::Builder::new()
            .name("casefix-writer".into())
            .spawn(move || {
                for job in rx {
                    let report = rename_entries(fs.as_ref(), &job.entries);
                    // The submitter may have stopped waiting
                    let _ = job.reply.send(report);
                }
            })?;
        Ok(Self {
            jobs: Some(tx),
            worker: Some(worker),
        })
    }

    /// Queue `entries`; they are handed back if the writer has stopped.
    pub(crate) fn submit(
        &self,
        entries: Vec<TrackedFileEntry>,
    ) -> Result<PendingFix, Vec<TrackedFileEntry>> {
        let Some(jobs) = self.jobs.as_ref() else {
            return Err(entries);
        };
        let (reply, rx) = mpsc::channel();
        jobs.send(Job { entries, reply })
            .map_err(|mpsc::SendError(job)| job.entries)?;
        Ok(PendingFix::Waiting(rx))
    }
}

impl Drop for RenameWriter {
    fn drop(&mut self) {
        // Closing the queue ends the worker loop once pending jobs are done
        self.jobs.take();
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            tracing::error!("Rename writer thread panicked");
        }
    }
}
