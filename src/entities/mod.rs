// Entity Models - Journal, Category, Area
//
// Each entity carries an ordered set of unique string identifiers plus
// attributes. Entities are built fresh per query response from partial
// records and are never persisted by the engine.

pub mod area;
pub mod category;
pub mod journal;

pub use area::Area;
pub use category::Category;
pub use journal::Journal;

use serde::{Deserialize, Serialize};

// ============================================================================
// IDENTIFIER SET
// ============================================================================

/// Ordered set of unique string identifiers.
///
/// Insertion order is preserved, duplicates are silently dropped, and an
/// empty string is never admitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSet {
    ids: Vec<String>,
}

impl IdSet {
    pub fn new() -> Self {
        IdSet { ids: Vec::new() }
    }

    /// Add an identifier. No-op for empty or duplicate input.
    pub fn add(&mut self, id: &str) {
        if id.is_empty() || self.ids.iter().any(|existing| existing == id) {
            return;
        }
        self.ids.push(id.to_string());
    }

    /// Replace the whole set with at most one identifier.
    /// Empty input clears the set.
    pub fn set(&mut self, id: &str) {
        self.ids.clear();
        if !id.is_empty() {
            self.ids.push(id.to_string());
        }
    }

    /// First identifier, if any.
    pub fn first(&self) -> Option<&str> {
        self.ids.first().map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

// ============================================================================
// ENTITY
// ============================================================================

/// Any entity the engine can resolve by identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    Journal(Journal),
    Category(Category),
    Area(Area),
}

impl Entity {
    /// Identifier set of the wrapped entity.
    pub fn ids(&self) -> &IdSet {
        match self {
            Entity::Journal(journal) => journal.ids(),
            Entity::Category(category) => category.ids(),
            Entity::Area(area) => area.ids(),
        }
    }
}
