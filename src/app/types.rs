//! Parameter and result types for CLI commands.
//!
//! Commands are plain functions over these types so they can be exercised
//! in tests without spawning the binary.

use std::path::PathBuf;

use crate::cli::{Dialect, Format, InputArgs, Provider};

/// Where the SQL statement is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlInput {
    /// Statement passed with `--sql`
    Inline(String),
    File(PathBuf),
    Stdin
}

impl From<InputArgs> for SqlInput {
    fn from(args: InputArgs) -> Self {
        match (args.sql, args.file) {
            (Some(sql), _) => Self::Inline(sql),
            (None, Some(path)) if path.as_os_str() == "-" => Self::Stdin,
            (None, Some(path)) => Self::File(path),
            (None, None) => Self::Stdin
        }
    }
}

/// Parameters for the `analyze` command.
///
/// # Example
///
/// ```
/// use safesheet::{
///     app::{AnalyzeParams, SqlInput},
///     cli::{Dialect, Format}
/// };
///
/// let params = AnalyzeParams {
///     input:         SqlInput::Inline("DELETE FROM users".into()),
///     no_rollback:   true,
///     no_dry_run:    false,
///     dialect:       Dialect::Generic,
///     provider:      None,
///     model:         None,
///     output_format: Format::Json,
///     no_color:      true,
///     verbose:       false
/// };
/// assert!(params.no_rollback);
/// ```
#[derive(Debug, Clone)]
pub struct AnalyzeParams {
    pub input:         SqlInput,
    /// Skip rollback generation even if enabled in configuration
    pub no_rollback:   bool,
    /// Skip the dry run even if enabled in configuration
    pub no_dry_run:    bool,
    pub dialect:       Dialect,
    /// Pinned provider; overrides `llm.provider`
    pub provider:      Option<Provider>,
    pub model:         Option<String>,
    pub output_format: Format,
    pub no_color:      bool,
    pub verbose:       bool
}

/// Parameters for the `dry-run` command.
#[derive(Debug, Clone)]
pub struct DryRunParams {
    pub input:         SqlInput,
    pub dialect:       Dialect,
    pub output_format: Format,
    pub no_color:      bool,
    pub verbose:       bool
}

/// Parameters for the `validate` command.
#[derive(Debug, Clone)]
pub struct ValidateParams {
    pub input:         SqlInput,
    /// DDL file replacing the built-in mock schema
    pub schema_path:   Option<PathBuf>,
    pub dialect:       Dialect,
    pub provider:      Option<Provider>,
    pub model:         Option<String>,
    pub output_format: Format,
    pub no_color:      bool,
    pub verbose:       bool
}

/// Output from CLI command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// 0 Low, 1 Medium, 2 High
    pub exit_code: i32,
    /// Rendered report
    pub stdout:    String
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(file: Option<&str>, sql: Option<&str>) -> InputArgs {
        InputArgs {
            file: file.map(PathBuf::from),
            sql:  sql.map(String::from)
        }
    }

    #[test]
    fn test_input_inline_wins() {
        assert_eq!(
            SqlInput::from(args(None, Some("SELECT 1"))),
            SqlInput::Inline("SELECT 1".into())
        );
    }

    #[test]
    fn test_input_dash_is_stdin() {
        assert_eq!(SqlInput::from(args(Some("-"), None)), SqlInput::Stdin);
        assert_eq!(SqlInput::from(args(None, None)), SqlInput::Stdin);
    }

    #[test]
    fn test_input_file() {
        assert_eq!(
            SqlInput::from(args(Some("q.sql"), None)),
            SqlInput::File(PathBuf::from("q.sql"))
        );
    }
}
