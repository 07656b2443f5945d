//! In-test stand-ins for the query engine and the language model.

#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering}
};

use async_trait::async_trait;
use safesheet::{
    dry_run::{EngineError, ExecutionOutcome, QueryEngine},
    error::SafetyError,
    llm::{LanguageModel, ModelSelection}
};

/// Engine returning a fixed outcome and counting calls
#[derive(Clone)]
pub struct FakeEngine {
    outcome: Result<ExecutionOutcome, EngineError>,
    calls:   Arc<AtomicUsize>
}

impl FakeEngine {
    pub fn succeeding(rows: Option<u64>) -> Self {
        Self {
            outcome: Ok(ExecutionOutcome {
                rows_affected: rows
            }),
            calls:   Arc::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(EngineError::new(message)),
            calls:   Arc::default()
        }
    }

    pub fn missing_table(table: &str) -> Self {
        Self::failing(&format!(
            "Catalog Error: Table with name {} does not exist!",
            table
        ))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl QueryEngine for FakeEngine {
    fn execute(&self, _sql: &str) -> Result<ExecutionOutcome, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// Model returning a fixed reply, recording prompts
#[derive(Clone)]
pub struct FakeModel {
    reply:   Result<String, SafetyError>,
    prompts: Arc<Mutex<Vec<String>>>
}

impl FakeModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply:   Ok(reply.to_string()),
            prompts: Arc::default()
        }
    }

    pub fn failing(error: SafetyError) -> Self {
        Self {
            reply:   Err(error),
            prompts: Arc::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }

    pub fn selection(&self) -> ModelSelection {
        ModelSelection::ready(self.clone())
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    fn name(&self) -> &str {
        "fake"
    }

    async fn complete(&self, prompt: &str) -> Result<String, SafetyError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone()
    }
}

pub fn unconfigured() -> ModelSelection {
    ModelSelection::Unconfigured(safesheet::llm::MISSING_CREDENTIALS.to_string())
}
