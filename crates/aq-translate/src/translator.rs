//! Question → SQL translation facade

use crate::error::TranslateResult;
use crate::intent::{extract_intent, Intent};
use crate::normalizer::{NormalizedQuestion, Normalizer};
use crate::synthesizer::{synthesize, GeneratedSql};
use aq_core::{Schema, VocabularyConfig};
use serde::Serialize;

/// Every intermediate product of one translation
#[derive(Debug, Clone, Serialize)]
pub struct Translation {
    pub question: NormalizedQuestion,
    pub intent: Intent,
    pub sql: GeneratedSql,
}

/// Prepared translator: the typo table is compiled once and reused.
#[derive(Debug, Clone)]
pub struct Translator {
    normalizer: Normalizer,
    vocabulary: VocabularyConfig,
}

impl Translator {
    pub fn new(vocabulary: VocabularyConfig) -> TranslateResult<Self> {
        Ok(Self {
            normalizer: Normalizer::new(&vocabulary.typos)?,
            vocabulary,
        })
    }

    pub fn vocabulary(&self) -> &VocabularyConfig {
        &self.vocabulary
    }

    pub fn normalize(&self, question: &str) -> NormalizedQuestion {
        self.normalizer.normalize(question)
    }

    /// Normalize, extract intent, and synthesize against `schema`
    pub fn translate(&self, question: &str, schema: &Schema) -> TranslateResult<Translation> {
        let question = self.normalize(question);
        log::debug!("Normalized question: {}", question);
        let intent = extract_intent(&question, schema, &self.vocabulary)?;
        let sql = synthesize(&intent)?;
        Ok(Translation {
            question,
            intent,
            sql,
        })
    }
}

/// One-shot translation of `question` against `schema`
pub fn translate(
    question: &str,
    schema: &Schema,
    vocabulary: &VocabularyConfig,
) -> TranslateResult<GeneratedSql> {
    let translator = Translator::new(vocabulary.clone())?;
    Ok(translator.translate(question, schema)?.sql)
}

#[cfg(test)]
#[path = "translator_test.rs"]
mod tests;
