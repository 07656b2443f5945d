//! Single entry point for both analysis pipelines.
//!
//! ```text
//! AnalysisRequest::RuleBased   classify -> assess -> [dry run] -> [rollback] -> assemble
//! AnalysisRequest::Structured  engine validation -> model -> parse
//! ```
//!
//! The model provider is resolved once, when the analyzer is built. The
//! analyzer holds no per-request state, so one instance can serve concurrent
//! callers.

use tracing::info;

use crate::{
    config::Config,
    dry_run::{DryRunCoordinator, DryRunResult, DuckDbSandbox, EngineValidation, QueryEngine},
    error::SafetyError,
    llm::ModelSelection,
    query::{SqlDialect, classify},
    report::{SafetyReport, assemble},
    risk::RiskAssessor,
    rollback::RollbackCoordinator,
    schema::Schema,
    structured::{StructuredValidationChain, StructuredValidationResult}
};

/// Which pipeline to run, and with what options
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisRequest {
    RuleBased {
        sql:              String,
        include_rollback: bool,
        include_dry_run:  bool
    },
    Structured {
        sql: String
    }
}

impl AnalysisRequest {
    /// Rule-based request with both optional steps enabled
    pub fn rule_based(sql: impl Into<String>) -> Self {
        Self::RuleBased {
            sql:              sql.into(),
            include_rollback: true,
            include_dry_run:  true
        }
    }

    pub fn structured(sql: impl Into<String>) -> Self {
        Self::Structured {
            sql: sql.into()
        }
    }
}

/// Result of [`SafetyAnalyzer::analyze`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    RuleBased(SafetyReport),
    Structured(StructuredValidationResult)
}

/// Both pipelines over shared, read-only collaborators
pub struct SafetyAnalyzer<E = DuckDbSandbox> {
    dialect:    SqlDialect,
    assessor:   RiskAssessor,
    dry_run:    DryRunCoordinator<E>,
    rollback:   RollbackCoordinator,
    structured: StructuredValidationChain<E>
}

impl SafetyAnalyzer<DuckDbSandbox> {
    /// Analyzer over the DuckDB sandbox with the provider chosen by `config`
    pub fn new(config: &Config, dialect: SqlDialect) -> Self {
        Self::with_parts(
            ModelSelection::from_config(&config.llm),
            DuckDbSandbox,
            dialect
        )
    }
}

impl<E: QueryEngine + Clone + 'static> SafetyAnalyzer<E> {
    pub fn with_parts(model: ModelSelection, engine: E, dialect: SqlDialect) -> Self {
        Self {
            dialect,
            assessor: RiskAssessor::new(),
            dry_run: DryRunCoordinator::with_engine(engine.clone()),
            rollback: RollbackCoordinator::new(model.clone()),
            structured: StructuredValidationChain::with_parts(
                model,
                DryRunCoordinator::with_engine(engine),
                &Schema::mock()
            )
        }
    }

    /// Use `schema` instead of the mock schema in structured validation
    pub fn with_schema(mut self, schema: &Schema) -> Self {
        self.structured = self.structured.with_schema(schema);
        self
    }

    /// Run the pipeline selected by `request`
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisOutcome, SafetyError> {
        match request {
            AnalysisRequest::RuleBased {
                sql,
                include_rollback,
                include_dry_run
            } => self
                .analyze_statement(&sql, include_rollback, include_dry_run)
                .await
                .map(AnalysisOutcome::RuleBased),
            AnalysisRequest::Structured {
                sql
            } => self.validate(&sql).await.map(AnalysisOutcome::Structured)
        }
    }

    /// Rule-based pipeline
    ///
    /// Only a classification failure is fatal. Dry-run and rollback failures
    /// are recorded inside their sub-results.
    pub async fn analyze_statement(
        &self,
        sql: &str,
        include_rollback: bool,
        include_dry_run: bool
    ) -> Result<SafetyReport, SafetyError> {
        info!(include_rollback, include_dry_run, "rule-based analysis started");
        let classification = classify(sql, self.dialect)?;
        let assessment = self.assessor.assess(&classification);

        let dry_run = if include_dry_run {
            Some(self.dry_run.spawn_simulate(&classification.raw_sql).await)
        } else {
            None
        };
        let rollback = if include_rollback {
            let result = self
                .rollback
                .generate_rollback(&classification.raw_sql, &classification)
                .await;
            Some(result)
        } else {
            None
        };

        let report = assemble(classification, assessment, dry_run, rollback);
        info!(
            statement = %report.classification.statement_type,
            risk_level = %report.risk_level,
            warnings = report.warnings.len(),
            "analysis finished"
        );
        Ok(report)
    }

    /// Dry run only, on the calling thread
    pub fn simulate(&self, sql: &str) -> DryRunResult {
        self.dry_run.simulate(sql)
    }

    /// Engine validation only, without a model
    pub fn engine_validation(&self, sql: &str) -> EngineValidation {
        self.dry_run.validate(sql)
    }

    /// Structured pipeline
    pub async fn validate(&self, sql: &str) -> Result<StructuredValidationResult, SafetyError> {
        info!("structured validation started");
        self.structured.validate(sql).await
    }
}
