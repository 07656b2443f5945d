use colored::Colorize;
use serde::Serialize;

use crate::{
    dry_run::DryRunResult,
    query::{StatementClassification, StatementType},
    report::SafetyReport,
    rollback::RollbackResult,
    structured::StructuredValidationResult
};

/// Output format for results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:  OutputFormat,
    pub colored: bool,
    pub verbose: bool
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:  OutputFormat::Text,
            colored: true,
            verbose: false
        }
    }
}

fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> Option<String> {
    match format {
        OutputFormat::Json => Some(serde_json::to_string_pretty(value).unwrap_or_default()),
        OutputFormat::Yaml => Some(serde_yaml::to_string(value).unwrap_or_default()),
        OutputFormat::Text => None
    }
}

fn heading(text: &str, opts: &OutputOptions) -> String {
    if opts.colored {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

/// Risk level label, colored by severity
pub fn risk_label(level: &str, colored: bool) -> String {
    if !colored {
        return level.to_string();
    }
    match level.to_ascii_lowercase().as_str() {
        "low" => level.green().bold().to_string(),
        "medium" => level.yellow().bold().to_string(),
        "high" => level.red().bold().to_string(),
        _ => level.normal().to_string()
    }
}

/// Format a rule-based safety report
pub fn format_report(report: &SafetyReport, opts: &OutputOptions) -> String {
    if let Some(serialized) = serialize(report, opts.format) {
        return serialized;
    }

    let c = &report.classification;
    let mut out = heading("=== SQL Safety Report ===", opts);
    out.push_str("\n\n");
    out.push_str(&format!("{}\n\n", report.sql));
    out.push_str(&format!(
        "Risk level: {}\n",
        risk_label(&report.risk_level.to_string(), opts.colored)
    ));
    out.push_str(&format!("Statement:  {}\n", c.statement_type));
    out.push_str(&format!("Tables:     {}\n", c.table_list()));
    if opts.verbose {
        for (table, columns) in &c.columns_by_table {
            let cols: Vec<&str> = columns.iter().map(|s| s.as_str()).collect();
            let cols = if cols.is_empty() { String::from("(all)") } else { cols.join(", ") };
            out.push_str(&format!("  {}: {}\n", table, cols));
        }
    }
    out.push_str(&format!(
        "WHERE:      {}\n",
        if c.has_where_clause { "yes" } else { "no" }
    ));
    out.push_str(&format!(
        "Impact:     {} table(s), {} column(s)\n\n",
        report.impact.tables_affected, report.impact.columns_affected
    ));
    out.push_str(&format!("{}\n", report.explanation));

    if !c.alter_operations.is_empty() {
        out.push('\n');
        out.push_str(&heading("ALTER analysis:", opts));
        out.push('\n');
        for operation in &c.alter_operations {
            out.push_str(&format!("  Operation: {}\n", operation.description));
        }
        if let Some(change) = report.impact.structure_change {
            out.push_str(&format!("  Impact:    {}\n", change));
        }
        let columns: Vec<&str> = c
            .alter_operations
            .iter()
            .flat_map(|op| op.columns.iter().map(|col| col.as_str()))
            .collect();
        if !columns.is_empty() {
            out.push_str(&format!("  Columns:   {}\n", columns.join(", ")));
        }
    }

    if !report.warnings.is_empty() {
        out.push('\n');
        out.push_str(&heading("Warnings:", opts));
        out.push('\n');
        for warning in &report.warnings {
            let line = format!("  [{}] {}", warning.rule_id, warning.message);
            if opts.colored {
                out.push_str(&line.yellow().to_string());
            } else {
                out.push_str(&line);
            }
            out.push('\n');
        }
    }

    if let Some(dry_run) = &report.dry_run {
        out.push('\n');
        out.push_str(&heading("Dry run:", opts));
        out.push('\n');
        out.push_str(&dry_run_lines(dry_run, opts));
    }

    if let Some(rollback) = &report.rollback {
        out.push('\n');
        out.push_str(&heading("Rollback:", opts));
        out.push('\n');
        out.push_str(&rollback_lines(rollback, opts));
    }
    out
}

#[derive(Serialize)]
struct DryRunView<'a> {
    statement_type: StatementType,
    tables:         Vec<&'a str>,
    #[serde(flatten)]
    result:         &'a DryRunResult
}

/// Format a standalone dry-run result with the statement it ran
pub fn format_dry_run(
    result: &DryRunResult,
    classification: &StatementClassification,
    opts: &OutputOptions
) -> String {
    let view = DryRunView {
        statement_type: classification.statement_type,
        tables: classification.tables.iter().map(|t| t.as_str()).collect(),
        result
    };
    if let Some(serialized) = serialize(&view, opts.format) {
        return serialized;
    }
    let mut out = heading("=== Dry Run ===", opts);
    out.push('\n');
    out.push_str(&format!("Statement:  {}\n", classification.statement_type));
    out.push_str(&format!("Tables:     {}\n", classification.table_list()));
    out.push_str(&dry_run_lines(result, opts));
    out
}

/// Format a structured validation result
pub fn format_validation(result: &StructuredValidationResult, opts: &OutputOptions) -> String {
    if let Some(serialized) = serialize(result, opts.format) {
        return serialized;
    }
    let mut out = heading("=== Structured Validation ===", opts);
    out.push_str("\n\n");
    out.push_str(&format!(
        "Risk level: {}\n",
        risk_label(&result.risk_level, opts.colored)
    ));
    let engine = &result.duckdb_validation;
    out.push_str(&format!(
        "Syntax valid: {}, dry run successful: {}\n",
        yes_no(engine.syntax_valid),
        yes_no(engine.dry_run_successful)
    ));
    if let Some(error) = &engine.error {
        out.push_str(&format!("Engine error: {}\n", error));
    }
    if !result.warnings.is_empty() {
        out.push('\n');
        out.push_str(&heading("Warnings:", opts));
        out.push('\n');
        for warning in &result.warnings {
            out.push_str(&format!("  - {}\n", warning));
        }
    }
    out.push('\n');
    out.push_str(&heading("Rollback:", opts));
    out.push('\n');
    out.push_str(&indent(&result.rollback_sql));
    out
}

fn dry_run_lines(result: &DryRunResult, opts: &OutputOptions) -> String {
    let mut out = String::new();
    let status = if result.simulation_successful {
        "simulated successfully"
    } else {
        "not simulated"
    };
    if opts.colored && result.simulation_successful {
        out.push_str(&format!("  {}\n", status.green()));
    } else {
        out.push_str(&format!("  {}\n", status));
    }
    if let Some(rows) = result.estimated_rows_affected {
        out.push_str(&format!("  estimated rows affected: {}\n", rows));
    }
    if let Some(note) = &result.note {
        out.push_str(&format!("  note: {}\n", note));
    }
    if let Some(error) = &result.error {
        let line = format!("  error: {}", error);
        if opts.colored && result.note.is_none() {
            out.push_str(&line.red().to_string());
        } else {
            out.push_str(&line);
        }
        out.push('\n');
    }
    out
}

fn rollback_lines(result: &RollbackResult, opts: &OutputOptions) -> String {
    match (&result.script, &result.error) {
        (Some(script), _) => indent(script),
        (None, Some(error)) => {
            let line = format!("  {}", error);
            if opts.colored {
                format!("{}\n", line.dimmed())
            } else {
                format!("{}\n", line)
            }
        }
        (None, None) => String::new()
    }
}

fn indent(text: &str) -> String {
    let mut out = String::new();
    for line in text.lines() {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

