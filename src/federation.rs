// Full Query Engine - cross-store composite queries
//
// Extends the basic engine with queries that intersect identifier sets
// fetched from the classification store with journals fetched from the
// journal store. Classification filters resolve to identifier sets; an
// inactive filter is None, an active-but-empty filter is Some(empty) and
// matches nothing. The two must never be conflated.

use std::collections::BTreeSet;
use std::ops::{Deref, DerefMut};

use tracing::warn;

use crate::engine::BasicQueryEngine;
use crate::entities::{Category, Journal};

pub struct FullQueryEngine {
    inner: BasicQueryEngine,
}

impl FullQueryEngine {
    pub fn new() -> Self {
        FullQueryEngine {
            inner: BasicQueryEngine::new(),
        }
    }

    pub fn with_chunk_size(chunk_size: usize) -> Self {
        FullQueryEngine {
            inner: BasicQueryEngine::with_chunk_size(chunk_size),
        }
    }

    // ========================================================================
    // COMPOSITE QUERIES
    // ========================================================================

    /// Journals classified under `category_ids` restricted to categories
    /// ranked in `quartiles`. The quartile filter is authoritative: a
    /// non-empty quartile set that matches no category empties the result
    /// before any journal-id lookup happens. Empty sets mean "no filter".
    pub fn get_journals_in_categories_with_quartile(
        &self,
        category_ids: &BTreeSet<String>,
        quartiles: &BTreeSet<String>,
    ) -> Vec<Journal> {
        let Some(categories) = self.resolve_categories(category_ids, quartiles) else {
            return Vec::new();
        };
        if categories.is_empty() {
            return Vec::new();
        }

        let journal_ids = self.journal_ids_for_categories(&categories);
        self.inner.fetch_journals_by_ids(&journal_ids)
    }

    /// Journals with a licence in `licences`, narrowed to those classified
    /// under any of `area_ids`. An empty `area_ids` skips area filtering
    /// entirely; an empty `licences` matches every licence.
    pub fn get_journals_in_areas_with_licence(
        &self,
        area_ids: &BTreeSet<String>,
        licences: &BTreeSet<String>,
    ) -> Vec<Journal> {
        let journals = self.inner.get_journals_with_licence(licences);
        if area_ids.is_empty() {
            return journals;
        }

        let in_areas = self.journal_ids_for_areas(area_ids);

        let mut seen = BTreeSet::new();
        journals
            .into_iter()
            .filter(|journal| {
                journal
                    .ids()
                    .first()
                    .is_some_and(|id| in_areas.contains(id) && seen.insert(id.to_string()))
            })
            .collect()
    }

    /// Diamond journals (APC == false) classified under the given areas
    /// and under categories matching the given quartiles.
    ///
    /// The area filter and the category/quartile filter are computed
    /// independently and intersected by identifier. The category side
    /// keeps its authoritative short-circuit: a quartile set matching no
    /// category empties the whole result even when the area filter alone
    /// would still have matched journals. That asymmetry is intentional
    /// and pinned by tests.
    pub fn get_diamond_journals_in_areas_and_categories_with_quartile(
        &self,
        area_ids: &BTreeSet<String>,
        category_ids: &BTreeSet<String>,
        quartiles: &BTreeSet<String>,
    ) -> Vec<Journal> {
        let category_filter: Option<BTreeSet<String>> =
            if category_ids.is_empty() && quartiles.is_empty() {
                None
            } else {
                match self.resolve_categories(category_ids, quartiles) {
                    None => return Vec::new(),
                    Some(categories) => Some(self.journal_ids_for_categories(&categories)),
                }
            };

        let area_filter: Option<BTreeSet<String>> = if area_ids.is_empty() {
            None
        } else {
            Some(self.journal_ids_for_areas(area_ids))
        };

        let mut seen = BTreeSet::new();
        let mut survivors = Vec::new();
        for journal in self.inner.get_all_journals() {
            if journal.has_apc() {
                continue;
            }
            // Identifier-set intersection needs an identifier.
            let Some(id) = journal.ids().first() else {
                continue;
            };
            if area_filter.as_ref().is_some_and(|f| !f.contains(id)) {
                continue;
            }
            if category_filter.as_ref().is_some_and(|f| !f.contains(id)) {
                continue;
            }
            if seen.insert(id.to_string()) {
                survivors.push(journal);
            }
        }
        survivors
    }

    // ========================================================================
    // FILTER RESOLUTION
    // ========================================================================

    /// Resolve the category/quartile filter pair to concrete categories.
    /// `None` means an active filter eliminated everything (authoritative
    /// empty result); `Some` carries the surviving categories.
    fn resolve_categories(
        &self,
        category_ids: &BTreeSet<String>,
        quartiles: &BTreeSet<String>,
    ) -> Option<Vec<Category>> {
        let categories = self.inner.get_categories_with_quartile(quartiles);
        if categories.is_empty() && !quartiles.is_empty() {
            return None;
        }

        if category_ids.is_empty() {
            return Some(categories);
        }

        let narrowed: Vec<Category> = categories
            .into_iter()
            .filter(|category| {
                category
                    .ids()
                    .first()
                    .is_some_and(|id| category_ids.contains(id))
            })
            .collect();
        if narrowed.is_empty() {
            return None;
        }
        Some(narrowed)
    }

    /// Union of the journal-id sets of `categories` across every
    /// registered classification handler.
    fn journal_ids_for_categories(&self, categories: &[Category]) -> BTreeSet<String> {
        let mut journal_ids = BTreeSet::new();
        for handler in &self.inner.classification_handlers {
            for category in categories {
                let Some(category_id) = category.ids().first() else {
                    continue;
                };
                match handler.journal_ids_for_category(category_id) {
                    Ok(found) => journal_ids.extend(found),
                    Err(error) => {
                        warn!("classification handler failed during category id fetch: {error:#}");
                    }
                }
            }
        }
        journal_ids
    }

    /// Union of the journal-id sets of `area_ids` across every registered
    /// classification handler.
    fn journal_ids_for_areas(&self, area_ids: &BTreeSet<String>) -> BTreeSet<String> {
        let mut journal_ids = BTreeSet::new();
        for handler in &self.inner.classification_handlers {
            for area_id in area_ids {
                match handler.journal_ids_for_area(area_id) {
                    Ok(found) => journal_ids.extend(found),
                    Err(error) => {
                        warn!("classification handler failed during area id fetch: {error:#}");
                    }
                }
            }
        }
        journal_ids
    }
}

impl Default for FullQueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for FullQueryEngine {
    type Target = BasicQueryEngine;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for FullQueryEngine {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
