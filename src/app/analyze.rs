//! Command runners.
//!
//! Each runner reads its input, runs one pipeline and renders the result.
//! Printing and exiting are left to `main`.

use std::fs::read_to_string;

use tracing::debug;

use super::{
    convert::convert_dialect,
    helpers::{
        apply_llm_overrides, calculate_exit_code, create_output_options, exit_code_for_label,
        read_sql_input, spinner
    },
    types::{AnalyzeParams, CommandOutput, DryRunParams, ValidateParams}
};
use crate::{
    analyzer::SafetyAnalyzer,
    config::Config,
    dry_run::DryRunCoordinator,
    error::{AppResult, file_read_error},
    output::{format_dry_run, format_report, format_validation},
    query::{SqlDialect, classify},
    schema::Schema
};

/// Runs the rule-based pipeline and renders a safety report.
///
/// Optional steps are enabled by configuration and switched off by
/// `--no-rollback` / `--no-dry-run`. Their failures end up inside the
/// report; only an unreadable input or an unparsable statement is an
/// error.
///
/// # Example
///
/// ```no_run
/// use safesheet::{
///     app::{AnalyzeParams, SqlInput, run_analyze},
///     cli::{Dialect, Format},
///     config::Config
/// };
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let params = AnalyzeParams {
///     input:         SqlInput::Inline("UPDATE users SET status = 'inactive'".into()),
///     no_rollback:   false,
///     no_dry_run:    false,
///     dialect:       Dialect::Generic,
///     provider:      None,
///     model:         None,
///     output_format: Format::Text,
///     no_color:      false,
///     verbose:       false
/// };
///
/// let output = run_analyze(params, Config::default()).await?;
/// println!("{}", output.stdout);
/// # Ok(())
/// # }
/// ```
pub async fn run_analyze(params: AnalyzeParams, mut config: Config) -> AppResult<CommandOutput> {
    let sql = read_sql_input(&params.input)?;
    apply_llm_overrides(&mut config, params.provider, params.model.clone());
    let include_rollback = config.analysis.include_rollback && !params.no_rollback;
    let include_dry_run = config.analysis.include_dry_run && !params.no_dry_run;

    let analyzer = SafetyAnalyzer::new(&config, convert_dialect(params.dialect));
    let pb = include_rollback.then(|| spinner("Generating rollback script..."));
    let report = analyzer
        .analyze_statement(&sql, include_rollback, include_dry_run)
        .await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let report = report?;

    let output_opts = create_output_options(params.output_format, params.no_color, params.verbose);
    Ok(CommandOutput {
        exit_code: calculate_exit_code(report.risk_level),
        stdout:    format_report(&report, &output_opts)
    })
}

/// Runs only the dry-run simulation.
///
/// The statement is classified first so the output names its type and
/// tables; an unparsable statement is an error. Exits 0 when the statement ran, or could not run only because the
/// sandbox has no tables; 1 for any other engine failure.
pub fn run_dry_run(params: DryRunParams) -> AppResult<CommandOutput> {
    let sql = read_sql_input(&params.input)?;
    let classification = classify(sql.trim(), convert_dialect(params.dialect))?;
    let result = DryRunCoordinator::new().simulate(&classification.raw_sql);
    let exit_code = if result.simulation_successful || result.note.is_some() {
        0
    } else {
        1
    };
    let output_opts = create_output_options(params.output_format, params.no_color, params.verbose);
    Ok(CommandOutput {
        exit_code,
        stdout: format_dry_run(&result, &classification, &output_opts)
    })
}

/// Runs the structured pipeline.
///
/// Any stage failing is an error; there is no partial output.
pub async fn run_validate(params: ValidateParams, mut config: Config) -> AppResult<CommandOutput> {
    let sql = read_sql_input(&params.input)?;
    apply_llm_overrides(&mut config, params.provider, params.model.clone());

    let mut analyzer = SafetyAnalyzer::new(&config, SqlDialect::Generic);
    if let Some(path) = &params.schema_path {
        let ddl = read_to_string(path).map_err(|e| file_read_error(&path.display().to_string(), e))?;
        let schema = Schema::parse(&ddl, convert_dialect(params.dialect))?;
        debug!(tables = schema.tables.len(), "using schema file");
        analyzer = analyzer.with_schema(&schema);
    }

    let pb = spinner("Validating with language model...");
    let result = analyzer.validate(sql.trim()).await;
    pb.finish_and_clear();
    let result = result?;

    let output_opts = create_output_options(params.output_format, params.no_color, params.verbose);
    Ok(CommandOutput {
        exit_code: exit_code_for_label(&result.risk_level),
        stdout:    format_validation(&result, &output_opts)
    })
}
