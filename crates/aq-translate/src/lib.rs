//! aq-translate - Rule-based question to SQL translation for askql
//!
//! A question flows through three stages: the [`Normalizer`] canonicalizes
//! the text, [`extract_intent`] reads a structured [`Intent`] from it, and
//! [`synthesize`] renders a single parameterized SELECT statement that has
//! already passed the safety gate. The [`RelationshipResolver`] is a
//! separate capability for multi-table questions.

pub mod error;
pub mod intent;
pub mod normalizer;
pub mod relationships;
pub mod synthesizer;
pub mod translator;

pub use error::{TranslateError, TranslateResult};
pub use intent::{extract_intent, Intent};
pub use normalizer::{NormalizedQuestion, Normalizer};
pub use relationships::RelationshipResolver;
pub use synthesizer::{synthesize, GeneratedSql};
pub use translator::{translate, Translation, Translator};
