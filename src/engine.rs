// Basic Query Engine - fans queries out across registered store handlers
//
// The engine owns two ordered handler collections. Every "get many" query
// runs the same way: call each registered handler of the relevant kind,
// funnel every partial record through the merge map, return the merged
// entities in first-appearance order. A failing handler contributes an
// empty partial result; the other handlers' results survive.
//
// Calls are synchronous and blocking. The handler lists are mutated only
// through add/clear; callers sharing an engine across threads must
// serialize registration against running queries.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::warn;

use crate::batch::{chunked, DEFAULT_CHUNK_SIZE};
use crate::entities::{Area, Category, Entity, Journal};
use crate::handlers::{ClassificationStore, JournalStore};
use crate::merge::{
    area_from_record, category_from_record, collect_areas, collect_categories,
    collect_journals, journal_from_record, MergeMap,
};
use crate::records::{ClassificationRecord, JournalRecord};

pub struct BasicQueryEngine {
    pub(crate) journal_handlers: Vec<Arc<dyn JournalStore>>,
    pub(crate) classification_handlers: Vec<Arc<dyn ClassificationStore>>,
    chunk_size: usize,
}

impl BasicQueryEngine {
    pub fn new() -> Self {
        BasicQueryEngine {
            journal_handlers: Vec::new(),
            classification_handlers: Vec::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Engine with a non-default identifier chunk size for batched
    /// fetches. A size of zero disables chunking.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        let mut engine = BasicQueryEngine::new();
        engine.chunk_size = chunk_size;
        engine
    }

    // ========================================================================
    // HANDLER REGISTRATION
    // ========================================================================

    /// Register a journal handler. Registering the same instance twice
    /// keeps a single entry.
    pub fn add_journal_handler(&mut self, handler: Arc<dyn JournalStore>) {
        if self
            .journal_handlers
            .iter()
            .any(|known| Arc::ptr_eq(known, &handler))
        {
            return;
        }
        self.journal_handlers.push(handler);
    }

    pub fn clear_journal_handlers(&mut self) {
        self.journal_handlers.clear();
    }

    /// Register a classification handler. Registering the same instance
    /// twice keeps a single entry.
    pub fn add_classification_handler(&mut self, handler: Arc<dyn ClassificationStore>) {
        if self
            .classification_handlers
            .iter()
            .any(|known| Arc::ptr_eq(known, &handler))
        {
            return;
        }
        self.classification_handlers.push(handler);
    }

    pub fn clear_classification_handlers(&mut self) {
        self.classification_handlers.clear();
    }

    pub fn journal_handler_count(&self) -> usize {
        self.journal_handlers.len()
    }

    pub fn classification_handler_count(&self) -> usize {
        self.classification_handlers.len()
    }

    // ========================================================================
    // SINGLE-ENTITY LOOKUP
    // ========================================================================

    /// Resolve an identifier to an entity. Journal handlers are probed
    /// first in registration order; the first non-empty hit wins. A
    /// classification hit with a category-shaped row becomes a Category,
    /// otherwise an Area. `None` means no store knows the identifier.
    pub fn get_entity_by_id(&self, id: &str) -> Option<Entity> {
        for handler in &self.journal_handlers {
            match handler.journal_by_id(id) {
                Ok(records) => {
                    if let Some(record) = records.first() {
                        return Some(Entity::Journal(journal_from_record(record)));
                    }
                }
                Err(error) => warn!("journal handler failed during id lookup: {error:#}"),
            }
        }

        for handler in &self.classification_handlers {
            match handler.classification_by_id(id) {
                Ok(records) => {
                    if let Some(record) = records.first() {
                        return match record {
                            ClassificationRecord::Category { .. } => {
                                category_from_record(record).map(Entity::Category)
                            }
                            ClassificationRecord::Area { .. } => {
                                area_from_record(record).map(Entity::Area)
                            }
                        };
                    }
                }
                Err(error) => {
                    warn!("classification handler failed during id lookup: {error:#}");
                }
            }
        }

        None
    }

    // ========================================================================
    // JOURNAL QUERIES
    // ========================================================================

    pub fn get_all_journals(&self) -> Vec<Journal> {
        self.journal_fanout("all journals", |handler| handler.all_journals())
    }

    pub fn get_journals_with_title(&self, partial_title: &str) -> Vec<Journal> {
        self.journal_fanout("title search", |handler| {
            handler.journals_with_title(partial_title)
        })
    }

    pub fn get_journals_published_by(&self, partial_name: &str) -> Vec<Journal> {
        self.journal_fanout("publisher search", |handler| {
            handler.journals_published_by(partial_name)
        })
    }

    /// Journals whose licence is in `licences`. An empty set matches
    /// every journal.
    pub fn get_journals_with_licence(&self, licences: &BTreeSet<String>) -> Vec<Journal> {
        self.journal_fanout("licence search", |handler| {
            handler.journals_with_licences(licences)
        })
    }

    pub fn get_journals_with_apc(&self) -> Vec<Journal> {
        self.journal_fanout("apc search", |handler| handler.journals_with_apc())
    }

    pub fn get_journals_with_doaj_seal(&self) -> Vec<Journal> {
        self.journal_fanout("seal search", |handler| handler.journals_with_seal())
    }

    // ========================================================================
    // CLASSIFICATION QUERIES
    // ========================================================================

    pub fn get_all_categories(&self) -> Vec<Category> {
        self.category_fanout("all categories", |handler| handler.all_categories())
    }

    pub fn get_all_areas(&self) -> Vec<Area> {
        self.area_fanout("all areas", |handler| handler.all_areas())
    }

    /// Categories whose quartile is in `quartiles`. An empty set matches
    /// every category.
    pub fn get_categories_with_quartile(&self, quartiles: &BTreeSet<String>) -> Vec<Category> {
        self.category_fanout("quartile search", |handler| {
            handler.categories_with_quartiles(quartiles)
        })
    }

    /// Categories assigned to journals in any of `area_ids`. An empty set
    /// matches every category.
    pub fn get_categories_assigned_to_areas(&self, area_ids: &BTreeSet<String>) -> Vec<Category> {
        self.category_fanout("area assignment search", |handler| {
            handler.categories_in_areas(area_ids)
        })
    }

    /// Areas assigned to journals in any of `category_ids`. An empty set
    /// matches every area.
    pub fn get_areas_assigned_to_categories(&self, category_ids: &BTreeSet<String>) -> Vec<Area> {
        self.area_fanout("category assignment search", |handler| {
            handler.areas_with_categories(category_ids)
        })
    }

    // ========================================================================
    // FAN-OUT / MERGE PLUMBING
    // ========================================================================

    fn journal_fanout<F>(&self, operation: &str, call: F) -> Vec<Journal>
    where
        F: Fn(&dyn JournalStore) -> anyhow::Result<Vec<JournalRecord>>,
    {
        let mut merged = MergeMap::new();
        for handler in &self.journal_handlers {
            match call(handler.as_ref()) {
                Ok(records) => collect_journals(&records, &mut merged),
                Err(error) => warn!("journal handler failed during {operation}: {error:#}"),
            }
        }
        merged.into_values()
    }

    fn category_fanout<F>(&self, operation: &str, call: F) -> Vec<Category>
    where
        F: Fn(&dyn ClassificationStore) -> anyhow::Result<Vec<ClassificationRecord>>,
    {
        let mut merged = MergeMap::new();
        for handler in &self.classification_handlers {
            match call(handler.as_ref()) {
                Ok(records) => collect_categories(&records, &mut merged),
                Err(error) => {
                    warn!("classification handler failed during {operation}: {error:#}");
                }
            }
        }
        merged.into_values()
    }

    fn area_fanout<F>(&self, operation: &str, call: F) -> Vec<Area>
    where
        F: Fn(&dyn ClassificationStore) -> anyhow::Result<Vec<ClassificationRecord>>,
    {
        let mut merged = MergeMap::new();
        for handler in &self.classification_handlers {
            match call(handler.as_ref()) {
                Ok(records) => collect_areas(&records, &mut merged),
                Err(error) => {
                    warn!("classification handler failed during {operation}: {error:#}");
                }
            }
        }
        merged.into_values()
    }

    /// Fetch journals for an arbitrary-size identifier set, partitioned
    /// into chunks so no single store request exceeds the accepted size.
    /// All chunk results funnel through one merge map, so the outcome is
    /// identical to a single unchunked fetch.
    pub(crate) fn fetch_journals_by_ids(&self, ids: &BTreeSet<String>) -> Vec<Journal> {
        let cleaned: Vec<String> = ids.iter().filter(|id| !id.is_empty()).cloned().collect();
        if cleaned.is_empty() {
            return Vec::new();
        }

        let mut merged = MergeMap::new();
        for handler in &self.journal_handlers {
            for chunk in chunked(&cleaned, self.chunk_size) {
                let chunk_set: BTreeSet<String> = chunk.into_iter().collect();
                match handler.journals_by_ids(&chunk_set) {
                    Ok(records) => collect_journals(&records, &mut merged),
                    Err(error) => warn!("journal handler failed during batched fetch: {error:#}"),
                }
            }
        }
        merged.into_values()
    }
}

impl Default for BasicQueryEngine {
    fn default() -> Self {
        Self::new()
    }
}
