//! Application logic for the `safesheet` CLI.
//!
//! Separated from the binary entry point so commands can be tested as
//! ordinary functions.

mod analyze;
mod convert;
mod helpers;
mod types;

pub use analyze::{run_analyze, run_dry_run, run_validate};
pub use convert::{convert_dialect, convert_format, convert_provider};
pub use helpers::{
    apply_llm_overrides, calculate_exit_code, create_output_options, exit_code_for_label,
    read_sql_input, spinner, write_output
};
pub use types::{AnalyzeParams, CommandOutput, DryRunParams, SqlInput, ValidateParams};
