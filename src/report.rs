//! Safety report assembly.
//!
//! [`assemble`] is the end of the rule-based pipeline. It only aggregates;
//! sub-results the caller did not request are left out of the serialized
//! report entirely instead of being written as `null`.

use serde::Serialize;

use crate::{
    dry_run::DryRunResult,
    query::StatementClassification,
    risk::{RiskAssessment, RiskLevel, Warnings},
    rollback::RollbackResult
};

/// Blast radius of the statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImpactSummary {
    pub tables_affected:  usize,
    /// Explicitly named columns; zero when the statement touches all columns
    pub columns_affected: usize,
    /// What an ALTER TABLE does to the table structure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure_change: Option<&'static str>
}

impl ImpactSummary {
    pub fn of(classification: &StatementClassification) -> Self {
        Self {
            tables_affected:  classification.tables.len(),
            columns_affected: classification.column_count(),
            structure_change: classification.alter_impact()
        }
    }
}

/// Terminal artifact of the rule-based pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafetyReport {
    pub sql:            String,
    pub classification: StatementClassification,
    pub risk_level:     RiskLevel,
    pub warnings:       Warnings,
    pub explanation:    String,
    pub impact:         ImpactSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run:        Option<DryRunResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollback:       Option<RollbackResult>
}

impl SafetyReport {
    /// True when the statement can be run without review
    pub fn is_safe(&self) -> bool {
        self.risk_level == RiskLevel::Low
    }
}

/// Merge the pipeline outputs into one report
pub fn assemble(
    classification: StatementClassification,
    assessment: RiskAssessment,
    dry_run: Option<DryRunResult>,
    rollback: Option<RollbackResult>
) -> SafetyReport {
    let RiskAssessment {
        risk_level,
        warnings,
        explanation
    } = assessment;
    SafetyReport {
        sql: classification.raw_sql.clone(),
        impact: ImpactSummary::of(&classification),
        classification,
        risk_level,
        warnings,
        explanation,
        dry_run,
        rollback
    }
}
