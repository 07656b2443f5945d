//! Helper functions shared by the CLI commands.

use std::{
    fs::{read_to_string, write},
    io::{self, Read},
    path::Path,
    time::Duration
};

use indicatif::{ProgressBar, ProgressStyle};

use super::{
    convert::{convert_format, convert_provider},
    types::SqlInput
};
use crate::{
    cli::{Format, Provider},
    config::Config,
    error::{AppResult, file_read_error, file_write_error},
    output::OutputOptions,
    risk::RiskLevel
};

/// Exit code for a risk level.
///
/// # Example
///
/// ```
/// use safesheet::{app::calculate_exit_code, risk::RiskLevel};
///
/// assert_eq!(calculate_exit_code(RiskLevel::Low), 0);
/// assert_eq!(calculate_exit_code(RiskLevel::High), 2);
/// ```
pub fn calculate_exit_code(level: RiskLevel) -> i32 {
    match level {
        RiskLevel::Low => 0,
        RiskLevel::Medium => 1,
        RiskLevel::High => 2
    }
}

/// Exit code for a risk level reported by the model as free text
///
/// Unrecognised levels count as Medium.
pub fn exit_code_for_label(label: &str) -> i32 {
    match label.trim().to_ascii_lowercase().as_str() {
        "low" => 0,
        "high" => 2,
        _ => 1
    }
}

/// Read the statement text from its source
///
/// # Errors
///
/// Returns an error if the file cannot be read or stdin fails.
pub fn read_sql_input(input: &SqlInput) -> AppResult<String> {
    match input {
        SqlInput::Inline(sql) => Ok(sql.clone()),
        SqlInput::File(path) => {
            read_to_string(path).map_err(|e| file_read_error(&path.display().to_string(), e))
        }
        SqlInput::Stdin => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| file_read_error("stdin", e))?;
            Ok(buffer)
        }
    }
}

/// Creates output options from CLI parameters.
pub fn create_output_options(format: Format, no_color: bool, verbose: bool) -> OutputOptions {
    OutputOptions {
        format: convert_format(format),
        colored: !no_color,
        verbose
    }
}

/// Apply `--provider` / `--model` on top of loaded configuration
pub fn apply_llm_overrides(config: &mut Config, provider: Option<Provider>, model: Option<String>) {
    if let Some(provider) = provider {
        config.llm.provider = Some(convert_provider(provider).as_str().to_string());
    }
    if let Some(model) = model {
        config.llm.model = Some(model);
    }
}

/// Write rendered output to `path`, or stdout when `None`
pub fn write_output(path: Option<&Path>, text: &str) -> AppResult<()> {
    match path {
        Some(path) => {
            write(path, text).map_err(|e| file_write_error(&path.display().to_string(), e))
        }
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

/// Spinner shown on stderr while a model call is in flight
pub fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
