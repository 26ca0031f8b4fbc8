// Journal Entity - DOAJ journal metadata
//
// Primary identity for merge purposes is ISSN, falling back to EISSN.
// Rows with neither are keyed synthetically and never merge with anything.

use serde::{Deserialize, Serialize};

use super::{Area, Category, IdSet};

/// Scholarly journal with metadata from the graph store and classification
/// links from the relational store.
///
/// Mutators validate only for emptiness; invalid input is silently absorbed
/// as a no-op, so callers never need to pre-check values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    ids: IdSet,
    title: String,
    languages: Vec<String>,
    publisher: Option<String>,
    seal: bool,
    licence: String,
    apc: bool,
    categories: Vec<Category>,
    areas: Vec<Area>,
}

impl Journal {
    pub fn new() -> Self {
        Journal::default()
    }

    pub fn ids(&self) -> &IdSet {
        &self.ids
    }

    pub fn ids_mut(&mut self) -> &mut IdSet {
        &mut self.ids
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    /// Languages in which the journal accepts manuscripts, in insertion
    /// order with no duplicates.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Add a language. No-op for empty or already-present input.
    pub fn add_language(&mut self, language: &str) {
        if language.is_empty() || self.languages.iter().any(|known| known == language) {
            return;
        }
        self.languages.push(language.to_string());
    }

    pub fn publisher(&self) -> Option<&str> {
        self.publisher.as_deref()
    }

    pub fn set_publisher(&mut self, publisher: Option<&str>) {
        self.publisher = publisher.map(str::to_string);
    }

    pub fn has_doaj_seal(&self) -> bool {
        self.seal
    }

    pub fn set_seal(&mut self, seal: bool) {
        self.seal = seal;
    }

    pub fn licence(&self) -> &str {
        &self.licence
    }

    pub fn set_licence(&mut self, licence: &str) {
        self.licence = licence.to_string();
    }

    /// Whether an article processing charge applies. A journal without one
    /// is a "diamond" journal.
    pub fn has_apc(&self) -> bool {
        self.apc
    }

    pub fn set_apc(&mut self, apc: bool) {
        self.apc = apc;
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Associate a category. No-op if an equal category is already present.
    pub fn add_category(&mut self, category: Category) {
        if self.categories.iter().any(|known| *known == category) {
            return;
        }
        self.categories.push(category);
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    /// Associate an area. No-op if an equal area is already present.
    pub fn add_area(&mut self, area: Area) {
        if self.areas.iter().any(|known| *known == area) {
            return;
        }
        self.areas.push(area);
    }
}
