//! Question → answer pipeline
//!
//! Drives one request through the stages
//! `Received → Normalized → IntentExtracted → Synthesized → SafetyChecked →
//! Validated → Executed → Responded`. A failure at any stage short-circuits
//! to [`Stage::Error`]; nothing is executed unless validation passed.

use aq_core::Schema;
use aq_db::{Database, Row};
use aq_sql::{validate, ValidationResult};
use aq_translate::{extract_intent, synthesize, TranslateError, Translator};
use serde::Serialize;
use std::fmt;

/// Error label for statements rejected by the validator
pub(crate) const INVALID_SQL: &str = "Invalid SQL generated";
/// Error label for questions that could not be translated
pub(crate) const UNTRANSLATABLE: &str = "Could not translate question";
/// Error label for backend failures
pub(crate) const EXECUTION_FAILED: &str = "Query execution failed";
/// Error label for schema introspection failures
pub(crate) const SCHEMA_UNAVAILABLE: &str = "Schema unavailable";

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    Received,
    Normalized,
    IntentExtracted,
    Synthesized,
    SafetyChecked,
    Validated,
    Executed,
    Responded,
    Error,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Normalized => "normalized",
            Stage::IntentExtracted => "intent_extracted",
            Stage::Synthesized => "synthesized",
            Stage::SafetyChecked => "safety_checked",
            Stage::Validated => "validated",
            Stage::Executed => "executed",
            Stage::Responded => "responded",
            Stage::Error => "error",
        };
        write!(f, "{name}")
    }
}

/// Caller-facing response body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub(crate) enum AskResponse {
    Success {
        sql: String,
        tables_used: Vec<String>,
        columns_used: Vec<String>,
        data: Vec<Row>,
    },
    Failure {
        error: String,
        reason: String,
        sql: Option<String>,
    },
}

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub(crate) struct Outcome {
    /// Last stage reached before responding (the failing stage on error)
    pub(crate) stage: Stage,
    pub(crate) response: AskResponse,
}

impl Outcome {
    pub(crate) fn is_success(&self) -> bool {
        matches!(self.response, AskResponse::Success { .. })
    }

    fn failed(stage: Stage, error: &str, reason: impl Into<String>, sql: Option<String>) -> Self {
        log::debug!("Pipeline: {} -> {}", stage, Stage::Error);
        Self {
            stage,
            response: AskResponse::Failure {
                error: error.to_string(),
                reason: reason.into(),
                sql,
            },
        }
    }
}

fn advance(from: Stage, to: Stage) -> Stage {
    log::debug!("Pipeline: {} -> {}", from, to);
    to
}

/// Answer a question: fetch a fresh schema, translate, validate, execute.
pub(crate) async fn ask(db: &dyn Database, translator: &Translator, question: &str) -> Outcome {
    log::info!("Question: {}", question);
    let schema = match db.fetch_schema().await {
        Ok(schema) => schema,
        Err(e) => return Outcome::failed(Stage::Received, SCHEMA_UNAVAILABLE, e.to_string(), None),
    };
    answer(db, translator, &schema, question).await
}

/// Run the pipeline against an already fetched schema snapshot
pub(crate) async fn answer(
    db: &dyn Database,
    translator: &Translator,
    schema: &Schema,
    question: &str,
) -> Outcome {
    let stage = Stage::Received;

    let normalized = translator.normalize(question);
    let stage = advance(stage, Stage::Normalized);

    let intent = match extract_intent(&normalized, schema, translator.vocabulary()) {
        Ok(intent) => intent,
        Err(e) => return Outcome::failed(Stage::IntentExtracted, UNTRANSLATABLE, e.to_string(), None),
    };
    let stage = advance(stage, Stage::IntentExtracted);

    let generated = match synthesize(&intent) {
        Ok(generated) => generated,
        Err(e @ TranslateError::UnsafeSql { .. }) => {
            return Outcome::failed(Stage::SafetyChecked, UNTRANSLATABLE, e.to_string(), None)
        }
        Err(e) => return Outcome::failed(Stage::Synthesized, UNTRANSLATABLE, e.to_string(), None),
    };
    let stage = advance(stage, Stage::Synthesized);
    let stage = advance(stage, Stage::SafetyChecked);
    log::info!("Generated SQL: {}", generated.display_sql);

    let validated = match validate(&generated.sql, schema) {
        ValidationResult::Valid { tables, columns } => (tables, columns),
        ValidationResult::Invalid(failure) => {
            return Outcome::failed(
                Stage::Validated,
                INVALID_SQL,
                failure.to_string(),
                Some(generated.display_sql),
            )
        }
    };
    let stage = advance(stage, Stage::Validated);

    let data = match db.execute_query(&generated.sql, &generated.params).await {
        Ok(rows) => rows,
        Err(e) => {
            return Outcome::failed(
                Stage::Executed,
                EXECUTION_FAILED,
                e.to_string(),
                Some(generated.display_sql),
            )
        }
    };
    let stage = advance(stage, Stage::Executed);
    log::info!("Rows returned: {}", data.len());

    let (tables, columns) = validated;
    Outcome {
        stage: advance(stage, Stage::Responded),
        response: AskResponse::Success {
            sql: generated.display_sql,
            tables_used: tables.into_iter().collect(),
            columns_used: columns,
            data,
        },
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
