//! Error types and constructors.
//!
//! Pipeline failures are described by [`SafetyError`], one variant per
//! failure class. The command-line boundary works with
//! [`masterror::AppError`]; every `SafetyError` converts into it.

pub use masterror::{AppError, AppResult};
use thiserror::Error;

/// Failure raised by one stage of the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SafetyError {
    /// SQL text could not be parsed into exactly one statement.
    #[error("{0}")]
    Parse(String),
    /// No usable language-model provider is configured.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// The provider call failed (network, quota, authentication, HTTP status).
    #[error("Transport error: {0}")]
    Transport(String),
    /// The provider answered with content that does not fit the expected shape.
    #[error("Malformed model response: {reason}")]
    MalformedResponse {
        reason: String,
        raw:    String
    },
    /// The query engine failed for a reason other than a missing relation.
    #[error("Simulation error: {0}")]
    Simulation(String)
}

impl SafetyError {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "PARSE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::MalformedResponse {
                ..
            } => "MALFORMED_RESPONSE",
            Self::Simulation(_) => "SIMULATION_ERROR"
        }
    }

    /// Pipeline stage that produced the error
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Parse(_) => "classify",
            Self::Configuration(_) => "provider",
            Self::Transport(_) => "model",
            Self::MalformedResponse {
                ..
            } => "parse_response",
            Self::Simulation(_) => "dry_run"
        }
    }

    /// Raw model output attached to a malformed response
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Self::MalformedResponse {
                raw, ..
            } => Some(raw),
            _ => None
        }
    }
}

impl From<SafetyError> for AppError {
    fn from(err: SafetyError) -> Self {
        let msg = format!("[{}] {}", err.code(), err);
        match err {
            SafetyError::Parse(_) | SafetyError::Configuration(_) => AppError::bad_request(msg),
            SafetyError::Transport(_)
            | SafetyError::MalformedResponse {
                ..
            } => AppError::service(msg),
            SafetyError::Simulation(_) => AppError::internal(msg)
        }
    }
}

/// Create file read error
pub fn file_read_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to read file '{}': {}", path, source))
}

/// Create file write error
pub fn file_write_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to write file '{}': {}", path, source))
}

/// Create schema parse error with optional position info
pub fn schema_parse_error(message: impl Into<String>) -> AppError {
    let msg = message.into();
    AppError::bad_request(format_sql_error("Schema parse error", &msg))
}

/// Create statement parse error with optional position info
pub fn parse_error(message: impl Into<String>) -> SafetyError {
    let msg = message.into();
    SafetyError::Parse(format_sql_error("Parse error", &msg))
}

/// Create missing provider error
pub fn configuration_error(message: impl Into<String>) -> SafetyError {
    SafetyError::Configuration(message.into())
}

/// Create LLM transport error
pub fn transport_error(message: impl Into<String>) -> SafetyError {
    SafetyError::Transport(message.into())
}

/// Create malformed response error, keeping the raw text for diagnostics
pub fn malformed_response_error(reason: impl Into<String>, raw: impl Into<String>) -> SafetyError {
    SafetyError::MalformedResponse {
        reason: reason.into(),
        raw:    raw.into()
    }
}

/// Create HTTP error
pub fn http_error(err: reqwest::Error) -> SafetyError {
    let msg = if err.is_timeout() {
        format!("Request timeout: {}", err)
    } else if err.is_connect() {
        format!("Connection failed: {}", err)
    } else if err.is_status() {
        format!("HTTP error {}: {}", err.status().unwrap_or_default(), err)
    } else if err.is_decode() {
        format!("Unexpected response body: {}", err)
    } else {
        err.to_string()
    };
    SafetyError::Transport(msg)
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Format SQL error with position highlighting
fn format_sql_error(prefix: &str, message: &str) -> String {
    // sqlparser format: "... at Line: X, Column: Y" (older releases omit the colon)
    if let Some(pos) = extract_position(message) {
        format!(
            "{} at line {}, column {}:\n  {}",
            prefix, pos.line, pos.column, message
        )
    } else {
        format!("{}:\n  {}", prefix, message)
    }
}

struct SqlPosition {
    line:   usize,
    column: usize
}

fn extract_position(message: &str) -> Option<SqlPosition> {
    let line_marker = "Line: ";
    let col_marker = ", Column";

    let line_start = message.find(line_marker)?;
    let line_num_start = line_start + line_marker.len();
    let col_start = message[line_num_start..].find(col_marker)?;
    let line_str = &message[line_num_start..line_num_start + col_start];
    let mut col_num_start = line_num_start + col_start + col_marker.len();
    let rest = &message[col_num_start..];
    col_num_start += rest.len() - rest.trim_start_matches([':', ' ']).len();

    let col_end = message[col_num_start..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(message.len() - col_num_start);
    let col_str = &message[col_num_start..col_num_start + col_end];

    match (line_str.parse(), col_str.parse()) {
        (Ok(line), Ok(column)) => Some(SqlPosition {
            line,
            column
        }),
        _ => None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_is_extracted() {
        let pos = extract_position("Expected end of statement at Line: 3, Column 14").unwrap();
        assert_eq!(pos.line, 3);
        assert_eq!(pos.column, 14);

        let pos = extract_position("found: x at Line: 2, Column: 7").unwrap();
        assert_eq!((pos.line, pos.column), (2, 7));
    }

    #[test]
    fn test_position_missing() {
        assert!(extract_position("Expected identifier").is_none());
    }

    #[test]
    fn test_parse_error_mentions_position() {
        let err = parse_error("Expected FROM at Line: 1, Column 8");
        assert!(err.to_string().contains("line 1, column 8"));
    }
}
