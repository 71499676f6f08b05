//! End-to-end workflows through `Workspace::open`, the way the CLI drives
//! the core.

use std::ops::ControlFlow;
use std::sync::Arc;

use casefix_core::{
    CancellationToken, ChangeRecord, CheckOutcome, FixerConfig, Resolution, ReviewSession, Workspace,
};
use casefix_fs::{CaseSensitivity, FileSystem, LocalFileSystem};
use casefix_git::{Git2Backend, GitBackend};
use casefix_test_utils::repo::TestRepo;
use pretty_assertions::assert_eq;

const INSENSITIVE_CONFIG: &str = "case_sensitivity = \"insensitive\"\ngit_backend = \"libgit2\"\n";

fn opened(repo: &TestRepo) -> Workspace {
    repo.write(".casefix.toml", INSENSITIVE_CONFIG);
    Workspace::open(repo.root()).unwrap()
}

#[test]
fn open_reads_config_and_discovers_repository() {
    let repo = TestRepo::new();
    repo.track(&["docs/readme.md"]);
    repo.respell_on_disk("docs/readme.md", "Docs/readme.md");

    let ws = opened(&repo);

    assert_eq!(ws.config().case_sensitivity, CaseSensitivity::Insensitive);
    assert_eq!(ws.registry().roots().len(), 1);
    let mismatches = ws.all_mismatches(&CancellationToken::new()).unwrap();
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].file_path(), "Docs/readme.md");
}

#[test]
fn review_session_mixes_resolutions() {
    let repo = TestRepo::new();
    repo.track(&["Src/A.java", "Src/B.java", "docs/x.md"]);
    repo.respell_on_disk("Src/A.java", "src/A.java");
    repo.respell_on_disk("docs/x.md", "docs/X.md");
    let ws = opened(&repo);

    let outcome = ws.scan(&[], true, &CancellationToken::new()).unwrap();
    let mut review = ReviewSession::from_outcome(outcome);
    assert_eq!(review.len(), 3);

    let a = review
        .entries()
        .iter()
        .position(|e| e.index_path() == "Src/A.java")
        .unwrap();
    let x = review
        .entries()
        .iter()
        .position(|e| e.index_path() == "docs/x.md")
        .unwrap();
    assert_eq!(review.key(x), None);

    // Both Src/ entries share the directory mismatch
    assert_eq!(review.set_resolution(a, Resolution::MatchIndex), 2);
    assert_eq!(review.set_resolution(x, Resolution::MatchFilesystem), 1);
    let counts = review.counts();
    assert_eq!((counts.ask, counts.match_index, counts.match_filesystem), (0, 2, 1));

    let report = ws.fix_reviewed(&review);

    assert_eq!((report.reindexed, report.renamed), (2, 1), "{:?}", report.errors);
    assert!(ws.all_mismatches(&CancellationToken::new()).unwrap().is_empty());
    repo.assert_spelled_on_disk("src/A.java");
    repo.assert_spelled_on_disk("docs/x.md");
}

#[test]
fn renamed_paths_are_drained_once() {
    let repo = TestRepo::new();
    repo.track(&["lib/Core.rs", "lib/mod.rs"]);
    repo.respell_on_disk("lib/Core.rs", "lib/core.rs");
    let ws = opened(&repo);
    assert!(ws.take_dirty().is_empty());

    let mismatches = ws.all_mismatches(&CancellationToken::new()).unwrap();
    let report = ws.fix(&mismatches, Resolution::MatchFilesystem);

    assert_eq!(report.renamed, 1, "{:?}", report.errors);
    assert_eq!(ws.take_dirty(), vec![repo.path("lib/Core.rs").to_native()]);
    assert!(ws.take_dirty().is_empty());
}

#[test]
fn undecided_entries_are_left_alone() {
    let repo = TestRepo::new();
    repo.track(&["lib/Core.rs"]);
    repo.respell_on_disk("lib/Core.rs", "lib/core.rs");
    let ws = opened(&repo);

    let review = ReviewSession::new(ws.all_mismatches(&CancellationToken::new()).unwrap());
    let report = ws.fix_reviewed(&review);

    assert!(report.is_clean());
    assert_eq!(report.fixed(), 0);
    assert_eq!(ws.all_mismatches(&CancellationToken::new()).unwrap().len(), 1);
}

#[test]
fn pre_commit_check_with_configured_action_fixes_changed_files() {
    let repo = TestRepo::new();
    repo.track(&["app/Main.kt", "app/Util.kt"]);
    repo.respell_on_disk("app/Main.kt", "App/Main.kt");
    repo.write(
        ".casefix.toml",
        "case_sensitivity = \"insensitive\"\ngit_backend = \"libgit2\"\nfixer_action = \"match-filesystem\"\n",
    );
    let ws = Workspace::open(repo.root()).unwrap();

    let changed = ChangeRecord::from(repo.path("App/Main.kt"));
    let outcome = ws
        .pre_commit_check(&[changed], &CancellationToken::new())
        .unwrap();

    let CheckOutcome::Proceed { fixed: Some(report) } = outcome else {
        panic!("expected an automatic fix, got {outcome:?}");
    };
    assert_eq!(report.renamed, 2, "{:?}", report.errors);
    repo.assert_spelled_on_disk("app/Main.kt");
    repo.assert_spelled_on_disk("app/Util.kt");
}

#[test]
fn scans_share_a_workspace_across_threads() {
    let repo = TestRepo::new();
    repo.track(&["one/A.txt", "two/B.txt"]);
    repo.respell_on_disk("one/A.txt", "ONE/A.txt");
    repo.respell_on_disk("two/B.txt", "two/b.txt");

    let config = FixerConfig {
        case_sensitivity: CaseSensitivity::Insensitive,
        ..FixerConfig::default()
    };
    let backend: Arc<dyn GitBackend> = Arc::new(Git2Backend);
    let fs: Arc<dyn FileSystem> =
        Arc::new(LocalFileSystem::with_case_sensitivity(config.case_sensitivity));
    let ws = Workspace::with_parts(repo.root(), config, backend, fs);
    ws.vcs_configuration_changed().unwrap();

    let counts: Vec<usize> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(|| {
                    let mut mismatches = 0;
                    let flow = ws.registry().visit_all_tracked_files(|entry| {
                        if entry.is_mismatch() {
                            mismatches += 1;
                        }
                        ControlFlow::<()>::Continue(())
                    });
                    assert!(flow.is_continue());
                    mismatches
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(counts, vec![2; 4]);
}

#[test]
fn cancelled_scan_reports_cancellation() {
    let repo = TestRepo::new();
    repo.track(&["a/B.txt"]);
    repo.respell_on_disk("a/B.txt", "A/B.txt");
    let ws = opened(&repo);

    let cancel = CancellationToken::new();
    cancel.cancel();

    assert!(matches!(
        ws.scan(&[], true, &cancel),
        Err(casefix_core::Error::Cancelled)
    ));
}
