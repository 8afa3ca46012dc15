//! Foreign-key join map between tables

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Keys used to join a hub table to one of its peers.
///
/// `local_key` is the column on the hub table, `foreign_key` the column on
/// the peer it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinKeys {
    pub local_key: String,
    pub foreign_key: String,
}

/// Static join map: hub table → peer table → join keys.
///
/// Loaded from configuration once at process start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipMap(BTreeMap<String, BTreeMap<String, JoinKeys>>);

impl RelationshipMap {
    /// Empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// The students/courses/enrollments map used when no configuration
    /// overrides it.
    pub fn enrollment_defaults() -> Self {
        Self::new()
            .with_join("enrollments", "students", "student_id", "id")
            .with_join("enrollments", "courses", "course_id", "id")
    }

    /// Add (or replace) a hub → peer join
    pub fn with_join(
        mut self,
        hub: impl Into<String>,
        peer: impl Into<String>,
        local_key: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        self.0.entry(hub.into()).or_default().insert(
            peer.into(),
            JoinKeys {
                local_key: local_key.into(),
                foreign_key: foreign_key.into(),
            },
        );
        self
    }

    /// Peers of a hub table, in name order
    pub fn peers(&self, hub: &str) -> Option<&BTreeMap<String, JoinKeys>> {
        self.0.get(hub)
    }

    /// Iterate hubs and their peers in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, JoinKeys>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether no joins are configured
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
