//! Question normalization

use crate::error::{TranslateError, TranslateResult};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Lowercase, whitespace-collapsed, typo-corrected question text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NormalizedQuestion(String);

impl NormalizedQuestion {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substring test against the normalized text
    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }
}

impl fmt::Display for NormalizedQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedQuestion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalizes raw questions.
///
/// Typo fixes only rewrite whole words, so `mny` is corrected but the
/// `mny` inside `company` is left alone.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    fixes: Vec<(Regex, String)>,
}

impl Normalizer {
    /// Compile the typo table. Entries apply in key order.
    pub fn new(typos: &BTreeMap<String, String>) -> TranslateResult<Self> {
        let fixes = typos
            .iter()
            .map(|(typo, fix)| {
                let pattern = format!(r"\b{}\b", regex::escape(&collapse(typo)));
                Regex::new(&pattern)
                    .map(|re| (re, collapse(fix)))
                    .map_err(|e| TranslateError::InvalidVocabulary {
                        entry: typo.clone(),
                        message: e.to_string(),
                    })
            })
            .collect::<TranslateResult<Vec<_>>>()?;
        Ok(Self { fixes })
    }

    /// Lowercase, collapse whitespace, trim, then apply typo fixes
    pub fn normalize(&self, raw: &str) -> NormalizedQuestion {
        let mut text = collapse(raw);
        for (re, fix) in &self.fixes {
            let fixed = re.replace_all(&text, regex::NoExpand(fix)).into_owned();
            text = fixed;
        }
        NormalizedQuestion(text)
    }
}

/// Lowercase and collapse runs of whitespace to single spaces
fn collapse(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "normalizer_test.rs"]
mod tests;
