mod common;

use common::{FakeModel, unconfigured};
use safesheet::{
    error::SafetyError,
    query::{SqlDialect, classify},
    rollback::{NOT_APPLICABLE, RollbackCoordinator, build_rollback_prompt, is_plausible_sql}
};

async fn rollback_with(model: &FakeModel, sql: &str) -> safesheet::rollback::RollbackResult {
    let c = classify(sql, SqlDialect::Generic).unwrap();
    RollbackCoordinator::new(model.selection())
        .generate_rollback(&c.raw_sql, &c)
        .await
}

#[tokio::test]
async fn test_select_does_not_call_model() {
    let model = FakeModel::replying("DELETE FROM users;");
    let result = rollback_with(&model, "SELECT * FROM users").await;

    assert_eq!(result.script, None);
    assert_eq!(result.error.as_deref(), Some(NOT_APPLICABLE));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_unconfigured_model_is_recorded() {
    let c = classify("UPDATE users SET status = 'inactive'", SqlDialect::Generic).unwrap();
    let result = RollbackCoordinator::new(unconfigured())
        .generate_rollback(&c.raw_sql, &c)
        .await;

    assert!(!result.is_success());
    assert!(result.error.unwrap().starts_with("Configuration error"));
}

#[tokio::test]
async fn test_fenced_script_is_accepted() {
    let model = FakeModel::replying(
        "```sql\n-- restore previous status\nUPDATE users SET status = 'active' WHERE status = 'inactive';\n```"
    );
    let result = rollback_with(&model, "UPDATE users SET status = 'inactive'").await;

    let script = result.script.unwrap();
    assert!(script.starts_with("-- restore previous status"));
    assert!(!script.contains("```"));
    assert!(result.error.is_none());
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn test_prose_reply_is_rejected() {
    let model = FakeModel::replying("Sorry, I cannot help with that request.");
    let result = rollback_with(&model, "DELETE FROM logs WHERE id = 1").await;

    assert!(result.script.is_none());
    assert!(result.error.unwrap().starts_with("Malformed model response"));
}

#[tokio::test]
async fn test_prose_starting_with_keyword_is_rejected() {
    let model = FakeModel::replying(
        "Delete operations cannot be reversed without a backup. Please restore the table from your latest snapshot."
    );
    let result = rollback_with(&model, "DELETE FROM logs WHERE id = 1").await;

    assert!(result.script.is_none());
    assert!(result.error.unwrap().starts_with("Malformed model response"));
}

#[tokio::test]
async fn test_transport_error_is_captured() {
    let model = FakeModel::failing(SafetyError::Transport("quota exceeded or rate limit reached".into()));
    let result = rollback_with(&model, "INSERT INTO orders (id) VALUES (1)").await;

    assert!(result.script.is_none());
    assert!(result.error.unwrap().contains("quota exceeded"));
}

#[tokio::test]
async fn test_prompt_carries_statement_context() {
    let model = FakeModel::replying("DELETE FROM orders WHERE id = 1;");
    rollback_with(&model, "INSERT INTO orders (id, total) VALUES (1, 9.99)").await;

    let prompt = model.last_prompt().unwrap();
    assert!(prompt.contains("INSERT INTO orders (id, total) VALUES (1, 9.99)"));
    assert!(prompt.contains("Statement Type: INSERT"));
    assert!(prompt.contains("orders(id, total)"));
    assert!(prompt.contains("IDEMPOTENT"));
}

#[test]
fn test_drop_prompt_states_limitation() {
    let c = classify("DROP TABLE temp_data", SqlDialect::Generic).unwrap();
    let prompt = build_rollback_prompt(&c.raw_sql, &c);
    assert!(prompt.contains("no data-preserving inverse"));

    let c = classify("UPDATE users SET name = 'x' WHERE id = 1", SqlDialect::Generic).unwrap();
    let prompt = build_rollback_prompt(&c.raw_sql, &c);
    assert!(!prompt.contains("no data-preserving inverse"));
}

#[test]
fn test_plausible_sql() {
    assert!(is_plausible_sql("INSERT INTO t VALUES (1);"));
    assert!(is_plausible_sql("/* header */\nBEGIN;\nUPDATE t SET a = 1;\nCOMMIT;"));
    assert!(is_plausible_sql("-- Cannot be undone; restore from backup"));
    assert!(!is_plausible_sql("Here is your rollback script"));
    assert!(!is_plausible_sql("   "));
}
