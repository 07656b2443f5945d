//! # SafeSheet Library
//!
//! Safety analysis for single SQL statements: classification, rule-based
//! risk scoring, dry-run simulation, model-generated rollback scripts and an
//! alternative single-call structured validation.
//!
//! Start at [`analyzer::SafetyAnalyzer`].

pub mod analyzer;
pub mod app;
pub mod cli;
pub mod config;
pub mod dry_run;
pub mod error;
pub mod llm;
pub mod logging;
pub mod output;
pub mod query;
pub mod report;
pub mod risk;
pub mod rollback;
pub mod schema;
pub mod structured;
