//! # SafeSheet
//!
//! Pre-flight safety checks for SQL statements.
//!
//! `safesheet` classifies a single statement, scores its risk with fixed
//! rules, simulates it against an empty in-memory DuckDB database and asks a
//! language model for a rollback script. An alternative `validate` command
//! gets the whole assessment from one model call constrained to JSON.
//!
//! # Quick Start
//!
//! ```bash
//! # Rule-based report
//! safesheet analyze --sql "UPDATE users SET status = 'inactive'"
//!
//! # Read from a file, JSON output, no model call
//! safesheet analyze migration.sql --no-rollback -f json
//!
//! # Stream from stdin
//! echo "DROP TABLE temp_data" | safesheet report
//!
//! # Dry run only
//! safesheet dry-run --sql "DELETE FROM logs WHERE level = 'debug'"
//!
//! # Structured validation against your own schema
//! export ANTHROPIC_API_KEY="sk-ant-..."
//! safesheet validate --sql "DELETE FROM orders" --schema schema.sql
//! ```
//!
//! # Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Low risk |
//! | 1 | Medium risk, or a fatal error |
//! | 2 | High risk |
//!
//! # Configuration
//!
//! Loaded from `~/.config/safesheet/config.toml`, then `.safesheet.toml`,
//! then environment variables (a `.env` file is read first). Command-line
//! flags win over all of them. See [`safesheet::config`].
//!
//! # Logging
//!
//! Diagnostics go to stderr. `--verbose` enables debug output for this
//! crate; `RUST_LOG` overrides the filter entirely.

use std::process;

use clap::Parser;
use safesheet::{
    app::{
        AnalyzeParams, DryRunParams, ValidateParams, run_analyze, run_dry_run, run_validate,
        write_output
    },
    cli::{Cli, Commands},
    config::Config,
    error::AppResult,
    logging
};
use tokio::main;

#[main]
async fn main() {
    match run().await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

async fn run() -> AppResult<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            no_rollback,
            no_dry_run,
            dialect,
            llm,
            output
        } => {
            logging::init(output.verbose);
            let config = Config::load()?;
            let params = AnalyzeParams {
                input: input.into(),
                no_rollback,
                no_dry_run,
                dialect,
                provider: llm.provider,
                model: llm.model,
                output_format: output.output_format,
                no_color: output.no_color,
                verbose: output.verbose
            };
            let result = run_analyze(params, config).await?;
            write_output(output.output.as_deref(), &result.stdout)?;
            Ok(result.exit_code)
        }
        Commands::DryRun {
            input,
            dialect,
            output
        } => {
            logging::init(output.verbose);
            let params = DryRunParams {
                input:         input.into(),
                dialect,
                output_format: output.output_format,
                no_color:      output.no_color,
                verbose:       output.verbose
            };
            let result = run_dry_run(params)?;
            write_output(output.output.as_deref(), &result.stdout)?;
            Ok(result.exit_code)
        }
        Commands::Validate {
            input,
            schema,
            dialect,
            llm,
            output
        } => {
            logging::init(output.verbose);
            let config = Config::load()?;
            let params = ValidateParams {
                input: input.into(),
                schema_path: schema,
                dialect,
                provider: llm.provider,
                model: llm.model,
                output_format: output.output_format,
                no_color: output.no_color,
                verbose: output.verbose
            };
            let result = run_validate(params, config).await?;
            write_output(output.output.as_deref(), &result.stdout)?;
            Ok(result.exit_code)
        }
    }
}
