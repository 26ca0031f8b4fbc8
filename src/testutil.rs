// In-memory store fakes for engine tests
//
// Both fakes honor the capability contracts, including the rule that an
// empty filter set means "no filter". The journal fake records the largest
// id-set request it has seen so chunking behavior can be asserted; the
// classification fake counts raw identifier-set lookups so short-circuits
// can be asserted.

use std::cell::Cell;
use std::collections::BTreeSet;

use anyhow::{bail, Result};

use crate::handlers::{ClassificationStore, JournalStore};
use crate::records::{ClassificationRecord, JournalRecord};

/// Journal row shorthand used throughout the engine tests.
pub(crate) fn journal_record(
    issn: &str,
    eissn: &str,
    title: &str,
    language: &str,
    publisher: &str,
    licence: &str,
    seal: Option<bool>,
    apc: Option<bool>,
) -> JournalRecord {
    let opt = |value: &str| {
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    };
    JournalRecord {
        issn: opt(issn),
        eissn: opt(eissn),
        title: opt(title),
        language: opt(language),
        publisher: opt(publisher),
        licence: opt(licence),
        seal,
        apc,
    }
}

// ============================================================================
// JOURNAL STORE FAKE
// ============================================================================

#[derive(Default)]
pub(crate) struct MemoryJournalHandler {
    pub records: Vec<JournalRecord>,
    pub largest_id_request: Cell<usize>,
}

impl MemoryJournalHandler {
    pub fn new(records: Vec<JournalRecord>) -> Self {
        MemoryJournalHandler {
            records,
            largest_id_request: Cell::new(0),
        }
    }

    fn matching<F>(&self, keep: F) -> Result<Vec<JournalRecord>>
    where
        F: Fn(&JournalRecord) -> bool,
    {
        Ok(self.records.iter().filter(|r| keep(r)).cloned().collect())
    }
}

impl JournalStore for MemoryJournalHandler {
    fn journal_by_id(&self, id: &str) -> Result<Vec<JournalRecord>> {
        self.matching(|r| {
            r.issn.as_deref() == Some(id) || r.eissn.as_deref() == Some(id)
        })
    }

    fn journals_by_ids(&self, ids: &BTreeSet<String>) -> Result<Vec<JournalRecord>> {
        if ids.len() > self.largest_id_request.get() {
            self.largest_id_request.set(ids.len());
        }
        self.matching(|r| {
            r.issn.as_deref().is_some_and(|id| ids.contains(id))
                || r.eissn.as_deref().is_some_and(|id| ids.contains(id))
        })
    }

    fn all_journals(&self) -> Result<Vec<JournalRecord>> {
        Ok(self.records.clone())
    }

    fn journals_with_title(&self, partial_title: &str) -> Result<Vec<JournalRecord>> {
        let needle = partial_title.to_lowercase();
        self.matching(|r| {
            r.title
                .as_deref()
                .is_some_and(|title| title.to_lowercase().contains(&needle))
        })
    }

    fn journals_published_by(&self, partial_name: &str) -> Result<Vec<JournalRecord>> {
        let needle = partial_name.to_lowercase();
        self.matching(|r| {
            r.publisher
                .as_deref()
                .is_some_and(|publisher| publisher.to_lowercase().contains(&needle))
        })
    }

    fn journals_with_licences(&self, licences: &BTreeSet<String>) -> Result<Vec<JournalRecord>> {
        if licences.is_empty() {
            return self.all_journals();
        }
        self.matching(|r| r.licence.as_deref().is_some_and(|l| licences.contains(l)))
    }

    fn journals_with_apc(&self) -> Result<Vec<JournalRecord>> {
        self.matching(|r| r.apc == Some(true))
    }

    fn journals_with_seal(&self) -> Result<Vec<JournalRecord>> {
        self.matching(|r| r.seal == Some(true))
    }
}

/// Handler whose store is permanently unreachable.
pub(crate) struct FailingJournalHandler;

impl JournalStore for FailingJournalHandler {
    fn journal_by_id(&self, _id: &str) -> Result<Vec<JournalRecord>> {
        bail!("store unreachable")
    }

    fn journals_by_ids(&self, _ids: &BTreeSet<String>) -> Result<Vec<JournalRecord>> {
        bail!("store unreachable")
    }

    fn all_journals(&self) -> Result<Vec<JournalRecord>> {
        bail!("store unreachable")
    }

    fn journals_with_title(&self, _partial_title: &str) -> Result<Vec<JournalRecord>> {
        bail!("store unreachable")
    }

    fn journals_published_by(&self, _partial_name: &str) -> Result<Vec<JournalRecord>> {
        bail!("store unreachable")
    }

    fn journals_with_licences(&self, _licences: &BTreeSet<String>) -> Result<Vec<JournalRecord>> {
        bail!("store unreachable")
    }

    fn journals_with_apc(&self) -> Result<Vec<JournalRecord>> {
        bail!("store unreachable")
    }

    fn journals_with_seal(&self) -> Result<Vec<JournalRecord>> {
        bail!("store unreachable")
    }
}

// ============================================================================
// CLASSIFICATION STORE FAKE
// ============================================================================

#[derive(Default)]
pub(crate) struct MemoryClassificationHandler {
    /// (category id, quartile)
    pub categories: Vec<(String, Option<String>)>,
    pub areas: Vec<String>,
    /// (issn, category id)
    pub journal_categories: Vec<(String, String)>,
    /// (issn, area id)
    pub journal_areas: Vec<(String, String)>,
    /// Raw identifier-set lookups served, for short-circuit assertions.
    pub id_lookups: Cell<usize>,
}

impl MemoryClassificationHandler {
    fn category_record(&self, id: &str, quartile: &Option<String>) -> ClassificationRecord {
        ClassificationRecord::Category {
            id: Some(id.to_string()),
            quartile: quartile.clone(),
        }
    }
}

impl ClassificationStore for MemoryClassificationHandler {
    fn classification_by_id(&self, id: &str) -> Result<Vec<ClassificationRecord>> {
        // Category table first, then areas.
        if let Some((cat_id, quartile)) = self.categories.iter().find(|(c, _)| c == id) {
            return Ok(vec![self.category_record(cat_id, quartile)]);
        }
        if let Some(area) = self.areas.iter().find(|a| *a == id) {
            return Ok(vec![ClassificationRecord::Area {
                id: Some(area.clone()),
            }]);
        }
        Ok(Vec::new())
    }

    fn all_categories(&self) -> Result<Vec<ClassificationRecord>> {
        Ok(self
            .categories
            .iter()
            .map(|(id, quartile)| self.category_record(id, quartile))
            .collect())
    }

    fn all_areas(&self) -> Result<Vec<ClassificationRecord>> {
        Ok(self
            .areas
            .iter()
            .map(|id| ClassificationRecord::Area {
                id: Some(id.clone()),
            })
            .collect())
    }

    fn categories_with_quartiles(
        &self,
        quartiles: &BTreeSet<String>,
    ) -> Result<Vec<ClassificationRecord>> {
        if quartiles.is_empty() {
            return self.all_categories();
        }
        Ok(self
            .categories
            .iter()
            .filter(|(_, quartile)| {
                quartile.as_deref().is_some_and(|q| quartiles.contains(q))
            })
            .map(|(id, quartile)| self.category_record(id, quartile))
            .collect())
    }

    fn categories_in_areas(
        &self,
        area_ids: &BTreeSet<String>,
    ) -> Result<Vec<ClassificationRecord>> {
        if area_ids.is_empty() {
            return self.all_categories();
        }
        let issns: BTreeSet<&str> = self
            .journal_areas
            .iter()
            .filter(|(_, area)| area_ids.contains(area))
            .map(|(issn, _)| issn.as_str())
            .collect();
        Ok(self
            .categories
            .iter()
            .filter(|(id, _)| {
                self.journal_categories
                    .iter()
                    .any(|(issn, cat)| cat == id && issns.contains(issn.as_str()))
            })
            .map(|(id, quartile)| self.category_record(id, quartile))
            .collect())
    }

    fn areas_with_categories(
        &self,
        category_ids: &BTreeSet<String>,
    ) -> Result<Vec<ClassificationRecord>> {
        if category_ids.is_empty() {
            return self.all_areas();
        }
        let issns: BTreeSet<&str> = self
            .journal_categories
            .iter()
            .filter(|(_, cat)| category_ids.contains(cat))
            .map(|(issn, _)| issn.as_str())
            .collect();
        Ok(self
            .areas
            .iter()
            .filter(|id| {
                self.journal_areas
                    .iter()
                    .any(|(issn, area)| area == *id && issns.contains(issn.as_str()))
            })
            .map(|id| ClassificationRecord::Area {
                id: Some(id.clone()),
            })
            .collect())
    }

    fn journal_ids_for_category(&self, category_id: &str) -> Result<BTreeSet<String>> {
        self.id_lookups.set(self.id_lookups.get() + 1);
        Ok(self
            .journal_categories
            .iter()
            .filter(|(_, cat)| cat == category_id)
            .map(|(issn, _)| issn.clone())
            .collect())
    }

    fn journal_ids_for_area(&self, area_id: &str) -> Result<BTreeSet<String>> {
        self.id_lookups.set(self.id_lookups.get() + 1);
        Ok(self
            .journal_areas
            .iter()
            .filter(|(_, area)| area == area_id)
            .map(|(issn, _)| issn.clone())
            .collect())
    }
}
