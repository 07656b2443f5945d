//! Type definitions for the risk rule system.
//!
//! - [`RiskLevel`] - Severity of a statement (Low, Medium, High)
//! - [`Warning`] - Human-readable warning tagged with the rule that raised it
//! - [`Finding`] - What a single rule concluded about a statement
//! - [`RiskAssessment`] - Combined outcome of all rules

use serde::Serialize;
use smallvec::SmallVec;

/// Severity of executing a statement.
///
/// Ordered from lowest to highest so levels can be compared and maximised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskLevel {
    /// Read-only or purely additive
    Low,
    /// Modifies a bounded set of rows, or the operation is not recognised
    Medium,
    /// Changes structure or affects every row
    High
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High")
        }
    }
}

/// A warning produced by one risk rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    /// Identifier of the rule that raised the warning (e.g., "RISK002")
    pub rule_id: &'static str,
    pub message: String
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Warnings in rule-evaluation order
pub type Warnings = SmallVec<[Warning; 4]>;

/// Metadata about a rule for identification.
#[derive(Debug, Clone)]
pub struct RuleInfo {
    /// Unique rule identifier (e.g., "RISK001")
    pub id:   &'static str,
    /// Human-readable rule name
    pub name: &'static str
}

/// Risk level decided by a rule, with the reason surfaced in the explanation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub level:  RiskLevel,
    pub reason: String
}

/// What one rule concluded about a statement.
///
/// A rule may decide the risk level, raise a warning, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Finding {
    pub verdict: Option<Verdict>,
    pub warning: Option<String>
}

impl Finding {
    pub fn verdict(level: RiskLevel, reason: impl Into<String>) -> Self {
        Self {
            verdict: Some(Verdict {
                level,
                reason: reason.into()
            }),
            warning: None
        }
    }

    pub fn warning_only(message: impl Into<String>) -> Self {
        Self {
            verdict: None,
            warning: Some(message.into())
        }
    }

    pub fn with_warning(mut self, message: impl Into<String>) -> Self {
        self.warning = Some(message.into());
        self
    }
}

/// Outcome of running every rule against one statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub risk_level:  RiskLevel,
    pub warnings:    Warnings,
    /// `"Risk Level: {level}. {reason}."`
    pub explanation: String
}
