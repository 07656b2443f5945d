use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// SafeSheet - pre-flight safety checks for SQL statements
#[derive(Parser, Debug)]
#[command(name = "safesheet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a statement, score its risk and build a safety report
    #[command(visible_alias = "report")]
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Skip rollback generation
        #[arg(long)]
        no_rollback: bool,

        /// Skip the dry-run simulation
        #[arg(long)]
        no_dry_run: bool,

        /// SQL dialect for parsing
        #[arg(long, value_enum, default_value = "generic")]
        dialect: Dialect,

        #[command(flatten)]
        llm: LlmArgs,

        #[command(flatten)]
        output: OutputArgs
    },

    /// Simulate a statement against an empty in-memory database
    DryRun {
        #[command(flatten)]
        input: InputArgs,

        /// SQL dialect for parsing
        #[arg(long, value_enum, default_value = "generic")]
        dialect: Dialect,

        #[command(flatten)]
        output: OutputArgs
    },

    /// Ask the model for a complete structured assessment
    Validate {
        #[command(flatten)]
        input: InputArgs,

        /// DDL file describing the schema shown to the model
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// SQL dialect of the schema file
        #[arg(long, value_enum, default_value = "generic")]
        dialect: Dialect,

        #[command(flatten)]
        llm: LlmArgs,

        #[command(flatten)]
        output: OutputArgs
    }
}

/// Where the statement comes from: FILE, --sql, or stdin
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// File containing one SQL statement (use - for stdin)
    pub file: Option<PathBuf>,

    /// SQL statement given inline
    #[arg(long, conflicts_with = "file")]
    pub sql: Option<String>
}

#[derive(Args, Debug, Clone)]
pub struct LlmArgs {
    /// Pin a provider instead of the first configured credential
    #[arg(short, long, value_enum)]
    pub provider: Option<Provider>,

    /// Model name
    #[arg(short, long)]
    pub model: Option<String>
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    pub output_format: Format,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Debug logging and per-table column details
    #[arg(short, long)]
    pub verbose: bool
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    Deepseek,
    Anthropic,
    #[value(name = "openai")]
    OpenAI,
    Ollama
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dialect {
    Generic,
    Mysql,
    Postgresql,
    Sqlite,
    Duckdb
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml
}
