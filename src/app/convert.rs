//! Conversions from CLI-facing enums to library types.

use crate::{
    cli::{Dialect, Format, Provider},
    llm::ProviderKind,
    output::OutputFormat,
    query::SqlDialect
};

/// Converts a CLI dialect to the parser dialect.
///
/// # Example
///
/// ```
/// use safesheet::{app::convert_dialect, cli::Dialect, query::SqlDialect};
///
/// let dialect = convert_dialect(Dialect::Mysql);
/// assert!(matches!(dialect, SqlDialect::MySQL));
/// ```
pub fn convert_dialect(dialect: Dialect) -> SqlDialect {
    match dialect {
        Dialect::Generic => SqlDialect::Generic,
        Dialect::Mysql => SqlDialect::MySQL,
        Dialect::Postgresql => SqlDialect::PostgreSQL,
        Dialect::Sqlite => SqlDialect::SQLite,
        Dialect::Duckdb => SqlDialect::DuckDB
    }
}

/// Converts a CLI format to the output format.
pub fn convert_format(format: Format) -> OutputFormat {
    match format {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
        Format::Yaml => OutputFormat::Yaml
    }
}

/// Converts a CLI provider to the provider family.
pub fn convert_provider(provider: Provider) -> ProviderKind {
    match provider {
        Provider::Deepseek => ProviderKind::DeepSeek,
        Provider::Anthropic => ProviderKind::Anthropic,
        Provider::OpenAI => ProviderKind::OpenAI,
        Provider::Ollama => ProviderKind::Ollama
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_dialect_duckdb() {
        assert!(matches!(convert_dialect(Dialect::Duckdb), SqlDialect::DuckDB));
        assert!(matches!(convert_dialect(Dialect::Generic), SqlDialect::Generic));
    }

    #[test]
    fn test_convert_format() {
        assert_eq!(convert_format(Format::Yaml), OutputFormat::Yaml);
    }

    #[test]
    fn test_convert_provider_names() {
        assert_eq!(convert_provider(Provider::OpenAI).as_str(), "openai");
        assert_eq!(convert_provider(Provider::Deepseek).as_str(), "deepseek");
    }
}
