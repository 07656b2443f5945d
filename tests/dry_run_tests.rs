mod common;

use common::FakeEngine;
use safesheet::dry_run::{
    DryRunCoordinator, FailureKind, MISSING_RELATION_NOTE, QueryEngine
};

#[test]
fn test_successful_simulation_reports_rows() {
    let dry_run = DryRunCoordinator::with_engine(FakeEngine::succeeding(Some(3)));
    let result = dry_run.simulate("DELETE FROM logs WHERE id < 4");

    assert!(result.simulation_successful);
    assert_eq!(result.estimated_rows_affected, Some(3));
    assert!(result.note.is_none());
    assert!(result.error.is_none());
}

#[test]
fn test_missing_table_sets_note() {
    let dry_run = DryRunCoordinator::with_engine(FakeEngine::missing_table("users"));
    let result = dry_run.simulate("UPDATE users SET status = 'inactive'");

    assert!(!result.simulation_successful);
    assert_eq!(result.note.as_deref(), Some(MISSING_RELATION_NOTE));
    assert!(result.error.unwrap().contains("users"));
}

#[test]
fn test_other_failure_has_error_without_note() {
    let dry_run = DryRunCoordinator::with_engine(FakeEngine::failing(
        "Conversion Error: Could not convert string 'abc' to INT32"
    ));
    let result = dry_run.simulate("SELECT CAST('abc' AS INTEGER)");

    assert!(!result.simulation_successful);
    assert!(result.note.is_none());
    assert!(result.error.unwrap().starts_with("Conversion Error"));
}

#[test]
fn test_validate_missing_table_keeps_syntax_valid() {
    let dry_run = DryRunCoordinator::with_engine(FakeEngine::missing_table("orders"));
    let v = dry_run.validate("DELETE FROM orders");

    assert!(v.syntax_valid);
    assert!(!v.dry_run_successful);
    assert!(v.error.is_some());
}

#[test]
fn test_validate_syntax_error() {
    let dry_run =
        DryRunCoordinator::with_engine(FakeEngine::failing("Parser Error: syntax error at or near \"SELEC\""));
    let v = dry_run.validate("SELEC 1");

    assert!(!v.syntax_valid);
    assert!(!v.dry_run_successful);
}

#[test]
fn test_validate_success() {
    let dry_run = DryRunCoordinator::with_engine(FakeEngine::succeeding(None));
    let v = dry_run.validate("SELECT 1");

    assert!(v.syntax_valid);
    assert!(v.dry_run_successful);
    assert!(v.error.is_none());
}

#[test]
fn test_each_call_reaches_engine() {
    let engine = FakeEngine::succeeding(Some(0));
    let dry_run = DryRunCoordinator::with_engine(engine.clone());
    dry_run.simulate("SELECT 1");
    dry_run.validate("SELECT 1");

    assert_eq!(engine.calls(), 2);
}

#[test]
fn test_failure_kind_prefers_syntax() {
    assert_eq!(
        FailureKind::of("Parser Error: syntax error, table does not exist"),
        FailureKind::Syntax
    );
    assert_eq!(FailureKind::of("something else broke"), FailureKind::Other);
}

#[test]
fn test_duckdb_sandbox_has_no_tables() {
    let dry_run = DryRunCoordinator::new();
    let result = dry_run.simulate("UPDATE users SET status = 'inactive'");

    assert!(!result.simulation_successful);
    assert_eq!(result.note.as_deref(), Some(MISSING_RELATION_NOTE));
}

#[test]
fn test_duckdb_sandbox_reports_syntax_errors() {
    let v = DryRunCoordinator::new().validate("SELEC * FORM users");

    assert!(!v.syntax_valid);
    assert!(v.error.is_some());
}

#[test]
fn test_duckdb_sandbox_isolates_calls() {
    let dry_run = DryRunCoordinator::new();
    let engine = dry_run.engine();

    assert!(engine.execute("CREATE TABLE scratch (id INTEGER)").is_ok());
    let err = engine.execute("INSERT INTO scratch VALUES (1)").unwrap_err();
    assert_eq!(FailureKind::of(&err.message), FailureKind::MissingRelation);
}

#[test]
fn test_unknown_function_is_a_real_failure() {
    let dry_run = DryRunCoordinator::with_engine(FakeEngine::failing(
        "Catalog Error: Scalar Function with name no_such_fn does not exist!"
    ));
    let result = dry_run.simulate("SELECT no_such_fn(1)");

    assert!(!result.simulation_successful);
    assert!(result.note.is_none());
    assert!(result.error.unwrap().contains("no_such_fn"));
}

#[test]
fn test_unknown_column_is_a_real_failure() {
    let dry_run = DryRunCoordinator::with_engine(FakeEngine::failing(
        "Binder Error: Referenced column \"missing_col\" not found in FROM clause!"
    ));
    let result = dry_run.simulate("SELECT missing_col FROM (SELECT 1 AS a)");

    assert!(result.note.is_none());
    assert!(result.error.is_some());
}

#[test]
fn test_duckdb_unknown_function_has_no_note() {
    let result = DryRunCoordinator::new().simulate("SELECT no_such_fn(1)");

    assert!(!result.simulation_successful);
    assert!(result.note.is_none());
    assert!(result.error.is_some());
}

#[tokio::test]
async fn test_spawned_calls_match_direct_calls() {
    let engine = FakeEngine::missing_table("orders");
    let dry_run = DryRunCoordinator::with_engine(engine.clone());

    let simulated = dry_run.spawn_simulate("DELETE FROM orders").await;
    assert_eq!(simulated, dry_run.simulate("DELETE FROM orders"));

    let validated = dry_run.spawn_validate("DELETE FROM orders").await;
    assert_eq!(validated, dry_run.validate("DELETE FROM orders"));
    assert_eq!(engine.calls(), 4);
}
