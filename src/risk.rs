//! Deterministic risk assessment of classified statements.
//!
//! The [`RiskAssessor`] runs a fixed, ordered list of rules against a
//! [`StatementClassification`]. Each rule implements [`RiskRule`] and may
//! decide the risk level, raise a warning, or both.
//!
//! # Rules
//!
//! | ID | Decides | Condition |
//! |---------|---------|--------------------------------------|
//! | RISK001 | High | ALTER, DROP or TRUNCATE |
//! | RISK002 | High | UPDATE/DELETE without WHERE |
//! | RISK003 | Medium | UPDATE/DELETE with WHERE |
//! | RISK004 | Low | SELECT or INSERT |
//! | RISK005 | Medium | unrecognised statement |
//! | RISK006 | - | more than three tables (warning only) |
//!
//! The first rule that decides a level wins; its reason becomes the
//! explanation. Warnings from every rule are kept in evaluation order.
//!
//! # Example
//!
//! ```
//! use safesheet::{
//!     query::{SqlDialect, classify},
//!     risk::{RiskAssessor, RiskLevel}
//! };
//!
//! let c = classify("DELETE FROM sessions", SqlDialect::Generic).unwrap();
//! let assessment = RiskAssessor::new().assess(&c);
//!
//! assert_eq!(assessment.risk_level, RiskLevel::High);
//! assert!(assessment.warnings[0].message.contains("sessions"));
//! ```

mod rules;
mod types;

pub use rules::WIDE_BLAST_RADIUS_TABLES;
pub use types::{Finding, RiskAssessment, RiskLevel, RuleInfo, Verdict, Warning, Warnings};

use crate::query::StatementClassification;

/// A single risk rule.
///
/// Rules are stateless and must not perform I/O.
pub trait RiskRule: Send + Sync {
    /// Returns metadata about this rule.
    fn info(&self) -> RuleInfo;

    /// Inspects a classification, returning `None` when the rule does not
    /// apply.
    fn evaluate(&self, classification: &StatementClassification) -> Option<Finding>;
}

/// Ordered rule runner.
pub struct RiskAssessor {
    rules: Vec<Box<dyn RiskRule>>
}

impl Default for RiskAssessor {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskAssessor {
    /// Create an assessor with the built-in rules in precedence order
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(rules::DestructiveDdl),
                Box::new(rules::UnboundedWrite),
                Box::new(rules::BoundedWrite),
                Box::new(rules::ReadOrAppend),
                Box::new(rules::UnknownOperation),
                Box::new(rules::WideBlastRadius),
            ]
        }
    }

    /// Identifiers of the active rules, in evaluation order
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.info().id).collect()
    }

    /// Assess a classified statement.
    ///
    /// Pure and deterministic: the same classification always yields the
    /// same assessment.
    pub fn assess(&self, classification: &StatementClassification) -> RiskAssessment {
        let mut decided: Option<Verdict> = None;
        let mut warnings = Warnings::new();

        for rule in &self.rules {
            let Some(finding) = rule.evaluate(classification) else {
                continue;
            };
            let id = rule.info().id;
            if decided.is_none()
                && let Some(verdict) = finding.verdict
            {
                decided = Some(verdict);
            }
            if let Some(message) = finding.warning {
                warnings.push(Warning {
                    rule_id: id,
                    message
                });
            }
        }

        // Every statement type is covered by RISK001-RISK005
        let verdict = decided.unwrap_or_else(|| Verdict {
            level:  RiskLevel::Medium,
            reason: String::from("The statement could not be matched to a known risk rule")
        });

        RiskAssessment {
            risk_level: verdict.level,
            warnings,
            explanation: format!("Risk Level: {}. {}.", verdict.level, verdict.reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::StatementType;

    fn classification(kind: StatementType, tables: &[&str], has_where: bool) -> StatementClassification {
        let mut c = StatementClassification::new("-- test", kind);
        for t in tables {
            c.add_table(*t);
        }
        c.has_where_clause = has_where;
        c
    }

    #[test]
    fn test_first_verdict_wins() {
        let c = classification(StatementType::Drop, &["a", "b", "c", "d"], false);
        let assessment = RiskAssessor::new().assess(&c);
        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert!(assessment.explanation.starts_with("Risk Level: High. This is a DROP"));
        let ids: Vec<_> = assessment.warnings.iter().map(|w| w.rule_id).collect();
        assert_eq!(ids, vec!["RISK001", "RISK006"]);
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(
            RiskAssessor::new().rule_ids(),
            vec!["RISK001", "RISK002", "RISK003", "RISK004", "RISK005", "RISK006"]
        );
    }

    #[test]
    fn test_explanation_ends_with_period() {
        let c = classification(StatementType::Other, &[], false);
        let assessment = RiskAssessor::new().assess(&c);
        assert_eq!(assessment.risk_level, RiskLevel::Medium);
        assert!(assessment.explanation.ends_with('.'));
        assert!(assessment.warnings.is_empty());
    }
}
