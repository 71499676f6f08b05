//! Both git backends driven through the whole scan and fix cycle
//!
//! The `git` CLI cases return early when no `git` executable is available.

use std::sync::Arc;

use casefix_core::{CancellationToken, FixerConfig, Resolution, Workspace};
use casefix_fs::{CaseSensitivity, FileSystem, LocalFileSystem};
use casefix_git::{Git2Backend, GitBackend, GitCli};
use casefix_test_utils::git::git_cli_available;
use casefix_test_utils::repo::TestRepo;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[derive(Debug, Clone, Copy)]
enum Backend {
    Cli,
    Libgit2,
}

fn backend(kind: Backend) -> Option<Arc<dyn GitBackend>> {
    match kind {
        Backend::Cli if !git_cli_available() => None,
        Backend::Cli => Some(Arc::new(GitCli::from_env().unwrap())),
        Backend::Libgit2 => Some(Arc::new(Git2Backend)),
    }
}

fn workspace(repo: &TestRepo, backend: Arc<dyn GitBackend>) -> Workspace {
    let config = FixerConfig {
        case_sensitivity: CaseSensitivity::Insensitive,
        ..FixerConfig::default()
    };
    let fs: Arc<dyn FileSystem> =
        Arc::new(LocalFileSystem::with_case_sensitivity(config.case_sensitivity));
    let ws = Workspace::with_parts(repo.root(), config, backend, fs);
    ws.vcs_configuration_changed().unwrap();
    ws
}

fn pairs(ws: &Workspace) -> Vec<(String, String)> {
    ws.all_mismatches(&CancellationToken::new())
        .unwrap()
        .iter()
        .map(|e| (e.index_path().to_string(), e.file_path().to_string()))
        .collect()
}

#[rstest]
#[case(Backend::Cli)]
#[case(Backend::Libgit2)]
fn backends_agree_on_tracked_files(#[case] kind: Backend) {
    let Some(backend) = backend(kind) else { return };
    let repo = TestRepo::new();
    repo.track(&["Src/Main.java", "docs/Guide.md", "Ünïcode Name.txt"]);
    repo.write("untracked.txt", "u");

    let mut tracked = backend.list_tracked_files(&repo.normalized_root()).unwrap();
    tracked.sort();

    assert_eq!(
        tracked,
        vec!["Src/Main.java", "docs/Guide.md", "Ünïcode Name.txt"]
    );
}

#[rstest]
#[case(Backend::Cli)]
#[case(Backend::Libgit2)]
fn reindex_round_trip(#[case] kind: Backend) {
    let Some(backend) = backend(kind) else { return };
    let repo = TestRepo::new();
    repo.track(&["Src/Util/Foo.java", "Src/Bar.java", "top.txt"]);
    repo.respell_on_disk("Src/Util/Foo.java", "src/Util/foo.java");
    let ws = workspace(&repo, backend);

    assert_eq!(
        pairs(&ws),
        vec![
            ("Src/Bar.java".to_string(), "src/Bar.java".to_string()),
            ("Src/Util/Foo.java".to_string(), "src/Util/foo.java".to_string()),
        ]
    );

    let mismatches = ws.all_mismatches(&CancellationToken::new()).unwrap();
    let report = ws.fix(&mismatches, Resolution::MatchIndex);

    assert_eq!(report.reindexed, 2, "{:?}", report.errors);
    assert!(pairs(&ws).is_empty());
    repo.assert_spelled_on_disk("src/Util/foo.java");
}

#[rstest]
#[case(Backend::Cli)]
#[case(Backend::Libgit2)]
fn rename_round_trip(#[case] kind: Backend) {
    let Some(backend) = backend(kind) else { return };
    let repo = TestRepo::new();
    repo.track(&["docs/readme.md", "docs/other.md"]);
    repo.respell_on_disk("docs/readme.md", "DOCS/ReadMe.md");
    let ws = workspace(&repo, backend);

    let mismatches = ws.all_mismatches(&CancellationToken::new()).unwrap();
    assert_eq!(mismatches.len(), 2);

    let report = ws.fix(&mismatches, Resolution::MatchFilesystem);

    assert_eq!(report.renamed, 2, "{:?}", report.errors);
    assert!(pairs(&ws).is_empty());
    repo.assert_spelled_on_disk("docs/readme.md");
    repo.assert_spelled_on_disk("docs/other.md");
}

// Names git C-quotes in line-oriented output; not creatable on Windows
#[cfg(unix)]
#[rstest]
#[case(Backend::Cli)]
#[case(Backend::Libgit2)]
fn names_with_quotes_and_tabs_round_trip(#[case] kind: Backend) {
    let Some(backend) = backend(kind) else { return };
    let repo = TestRepo::new();
    repo.track(&["Notes/My \"Notes\".md", "Notes/tab\there[1].txt"]);
    repo.respell_on_disk("Notes/My \"Notes\".md", "NOTES/My \"Notes\".md");
    let ws = workspace(&repo, backend);

    assert_eq!(
        pairs(&ws),
        vec![
            (
                "Notes/My \"Notes\".md".to_string(),
                "NOTES/My \"Notes\".md".to_string()
            ),
            (
                "Notes/tab\there[1].txt".to_string(),
                "NOTES/tab\there[1].txt".to_string()
            ),
        ]
    );

    let mismatches = ws.all_mismatches(&CancellationToken::new()).unwrap();
    let report = ws.fix(&mismatches, Resolution::MatchIndex);

    assert_eq!(report.reindexed, 2, "{:?}", report.errors);
    assert!(pairs(&ws).is_empty());
}

#[test]
fn cli_failure_outside_repository_degrades_to_empty() {
    if !git_cli_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let backend: Arc<dyn GitBackend> = Arc::new(GitCli::from_env().unwrap());
    let config = FixerConfig {
        case_sensitivity: CaseSensitivity::Insensitive,
        ..FixerConfig::default()
    };
    let fs: Arc<dyn FileSystem> =
        Arc::new(LocalFileSystem::with_case_sensitivity(config.case_sensitivity));
    std::fs::write(dir.path().join("A.txt"), "a").unwrap();
    let root = std::fs::canonicalize(dir.path()).unwrap();
    let ws = Workspace::with_parts(&root, config, backend, fs);
    // Registered as a root although git does not know it
    ws.registry().set_roots([casefix_fs::NormalizedPath::new(&root)]);

    assert!(ws.all_mismatches(&CancellationToken::new()).unwrap().is_empty());
}
