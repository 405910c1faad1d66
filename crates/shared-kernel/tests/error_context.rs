// crates/shared-kernel/tests/error_context.rs
use std::io;

use repo_lines_shared_kernel::{EntityKind, ErrorContext, RepoLinesError};

fn boom() -> std::result::Result<(), io::Error> {
    Err(io::Error::other("root-io"))
}

#[test]
fn context_wraps_and_formats() {
    let err = boom()
        .map_err(RepoLinesError::from)
        .context("reading settings")
        .unwrap_err();

    let display = err.to_string();
    assert!(display.contains("reading settings"));
    assert!(display.contains("I/O error:"));
}

#[test]
fn root_sees_through_nested_context() {
    let err: Result<(), RepoLinesError> =
        Err(RepoLinesError::NotFound { entity: EntityKind::Account, id: "ghost".into() });
    let err = err
        .context("walking account")
        .with_context(|| "serving request".to_string())
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(matches!(err.root(), RepoLinesError::NotFound { .. }));
    assert_eq!(err.retry_after(), None);
}
