use safesheet::{
    query::{SqlDialect, StatementClassification, StatementType, classify},
    risk::{RiskAssessor, RiskLevel}
};

fn assess(sql: &str) -> safesheet::risk::RiskAssessment {
    let c = classify(sql, SqlDialect::Generic).unwrap();
    RiskAssessor::new().assess(&c)
}

#[test]
fn test_update_without_where_is_high() {
    let a = assess("UPDATE users SET status = 'inactive'");

    assert_eq!(a.risk_level, RiskLevel::High);
    assert_eq!(a.warnings.len(), 1);
    assert_eq!(a.warnings[0].rule_id, "RISK002");
    assert_eq!(
        a.warnings[0].message,
        "CRITICAL: This UPDATE statement lacks a WHERE clause and will affect ALL rows in users."
    );
    assert!(a.explanation.starts_with("Risk Level: High."));
}

#[test]
fn test_delete_with_where_is_medium() {
    let a = assess("DELETE FROM logs WHERE level = 'debug'");

    assert_eq!(a.risk_level, RiskLevel::Medium);
    assert!(a.warnings.is_empty());
    assert_eq!(
        a.explanation,
        "Risk Level: Medium. This DELETE statement will modify data in logs."
    );
}

#[test]
fn test_drop_is_high_with_warning() {
    let a = assess("DROP TABLE temp_data");

    assert_eq!(a.risk_level, RiskLevel::High);
    assert_eq!(a.warnings[0].rule_id, "RISK001");
    assert!(a.warnings[0].message.starts_with("HIGH RISK:"));
    assert!(a.warnings[0].message.contains("temp_data"));
}

#[test]
fn test_truncate_and_alter_are_high() {
    assert_eq!(assess("TRUNCATE TABLE logs").risk_level, RiskLevel::High);
    assert_eq!(
        assess("ALTER TABLE users ADD COLUMN age INT").risk_level,
        RiskLevel::High
    );
}

#[test]
fn test_select_is_low() {
    let a = assess("SELECT * FROM users WHERE id = 1");

    assert_eq!(a.risk_level, RiskLevel::Low);
    assert!(a.warnings.is_empty());
    assert!(a.explanation.contains("read-only"));
}

#[test]
fn test_insert_is_low() {
    let a = assess("INSERT INTO orders (id, total) VALUES (1, 9.99)");

    assert_eq!(a.risk_level, RiskLevel::Low);
    assert!(a.explanation.contains("add new rows to orders"));
}

#[test]
fn test_other_is_medium_without_warnings() {
    let a = assess("CREATE TABLE t (id INT)");

    assert_eq!(a.risk_level, RiskLevel::Medium);
    assert!(a.warnings.is_empty());
}

#[test]
fn test_where_tautology_is_not_high() {
    let a = assess("DELETE FROM sessions WHERE 1 = 1");
    assert_eq!(a.risk_level, RiskLevel::Medium);
}

#[test]
fn test_wide_blast_radius_adds_warning_only() {
    let a = assess(
        "SELECT * FROM users u JOIN orders o ON u.id = o.user_id \
         JOIN products p ON p.id = o.id JOIN logs l ON l.id = u.id"
    );

    assert_eq!(a.risk_level, RiskLevel::Low);
    assert_eq!(a.warnings.len(), 1);
    assert_eq!(a.warnings[0].rule_id, "RISK006");
    assert!(a.warnings[0].message.contains("affects 4 tables"));
}

#[test]
fn test_three_tables_is_not_wide() {
    let a = assess(
        "SELECT * FROM users u JOIN orders o ON u.id = o.user_id JOIN products p ON p.id = o.id"
    );
    assert!(a.warnings.is_empty());
}

#[test]
fn test_warnings_follow_rule_order() {
    let mut c = StatementClassification::new("DELETE FROM a", StatementType::Delete);
    for t in ["a", "b", "c", "d", "e"] {
        c.add_table(t);
    }
    let a = RiskAssessor::new().assess(&c);

    let ids: Vec<_> = a.warnings.iter().map(|w| w.rule_id).collect();
    assert_eq!(ids, vec!["RISK002", "RISK006"]);
    assert_eq!(a.risk_level, RiskLevel::High);
}

#[test]
fn test_assessment_is_deterministic() {
    let c = classify("UPDATE users SET name = 'x'", SqlDialect::Generic).unwrap();
    let assessor = RiskAssessor::new();
    assert_eq!(assessor.assess(&c), assessor.assess(&c));
}

#[test]
fn test_risk_level_ordering_and_display() {
    assert!(RiskLevel::Low < RiskLevel::Medium);
    assert!(RiskLevel::Medium < RiskLevel::High);
    assert_eq!(RiskLevel::High.to_string(), "High");
}
