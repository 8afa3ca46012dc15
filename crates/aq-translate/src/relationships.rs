//! Relationship resolver
//!
//! Maps a question to the set of tables it needs and, when that set matches
//! a hub table of the [`RelationshipMap`] together with all of its peers,
//! renders a join template. This path is not consulted by
//! [`translate`](crate::translate).

use aq_core::RelationshipMap;
use std::collections::BTreeSet;

/// Question keyword → table it implies
const TABLE_KEYWORDS: [(&str, &str); 3] = [
    ("student", "students"),
    ("course", "courses"),
    ("enroll", "enrollments"),
];

/// Resolves required tables to a FROM clause using the configured join map
#[derive(Debug, Clone)]
pub struct RelationshipResolver {
    map: RelationshipMap,
}

impl RelationshipResolver {
    pub fn new(map: RelationshipMap) -> Self {
        Self { map }
    }

    /// Tables implied by keywords in the (normalized) question
    pub fn required_tables(&self, question: &str) -> BTreeSet<String> {
        let q = question.to_lowercase();
        TABLE_KEYWORDS
            .iter()
            .filter(|(keyword, _)| q.contains(keyword))
            .map(|(_, table)| table.to_string())
            .collect()
    }

    /// FROM-clause text for the required tables.
    ///
    /// One table resolves to itself. A hub plus exactly its peers resolves to
    /// a join template. Anything else is unresolvable.
    pub fn resolve(&self, required: &BTreeSet<String>) -> Option<String> {
        if required.len() == 1 {
            return required.iter().next().cloned();
        }

        self.map.iter().find_map(|(hub, peers)| {
            let covers = required.len() == peers.len() + 1
                && required.contains(hub)
                && peers.keys().all(|peer| required.contains(peer));
            if !covers {
                return None;
            }
            let joins = peers
                .iter()
                .map(|(peer, keys)| {
                    format!(
                        " JOIN {peer} ON {hub}.{} = {peer}.{}",
                        keys.local_key, keys.foreign_key
                    )
                })
                .collect::<String>();
            Some(format!("{hub}{joins}"))
        })
    }
}
