// Store Capability Interfaces
//
// The engine federates over two kinds of stores through these traits. It
// never sees query text or transport details; it consumes partial records
// and raw identifier sets.
//
// Contract shared by every set-valued filter parameter: an empty set means
// "no filter" (return everything), never "match nothing". The single
// exception is `journals_by_ids`, which is an identifier fetch rather than
// a filter and returns nothing for an empty set.

use std::collections::BTreeSet;

use anyhow::Result;

use crate::records::{ClassificationRecord, JournalRecord};

/// Read capability of a journal metadata store.
///
/// Implementations report failures as errors; the engine converts them to
/// empty partial results at its public boundary.
pub trait JournalStore {
    /// Rows for the journal whose ISSN or EISSN equals `id`. Empty when
    /// the store holds no such journal.
    fn journal_by_id(&self, id: &str) -> Result<Vec<JournalRecord>>;

    /// Rows for every journal whose ISSN or EISSN is in `ids`.
    fn journals_by_ids(&self, ids: &BTreeSet<String>) -> Result<Vec<JournalRecord>>;

    fn all_journals(&self) -> Result<Vec<JournalRecord>>;

    /// Case-insensitive title substring match.
    fn journals_with_title(&self, partial_title: &str) -> Result<Vec<JournalRecord>>;

    /// Case-insensitive publisher substring match.
    fn journals_published_by(&self, partial_name: &str) -> Result<Vec<JournalRecord>>;

    fn journals_with_licences(&self, licences: &BTreeSet<String>) -> Result<Vec<JournalRecord>>;

    fn journals_with_apc(&self) -> Result<Vec<JournalRecord>>;

    fn journals_with_seal(&self) -> Result<Vec<JournalRecord>>;
}

/// Read capability of a journal classification store.
pub trait ClassificationStore {
    /// Rows for the category or area whose identifier equals `id`. The
    /// category table is tried first, then the area table.
    fn classification_by_id(&self, id: &str) -> Result<Vec<ClassificationRecord>>;

    fn all_categories(&self) -> Result<Vec<ClassificationRecord>>;

    fn all_areas(&self) -> Result<Vec<ClassificationRecord>>;

    fn categories_with_quartiles(
        &self,
        quartiles: &BTreeSet<String>,
    ) -> Result<Vec<ClassificationRecord>>;

    /// Categories assigned to journals classified under any of `area_ids`.
    fn categories_in_areas(&self, area_ids: &BTreeSet<String>)
        -> Result<Vec<ClassificationRecord>>;

    /// Areas assigned to journals classified under any of `category_ids`.
    fn areas_with_categories(
        &self,
        category_ids: &BTreeSet<String>,
    ) -> Result<Vec<ClassificationRecord>>;

    /// Identifiers of every journal classified under `category_id`.
    fn journal_ids_for_category(&self, category_id: &str) -> Result<BTreeSet<String>>;

    /// Identifiers of every journal classified under `area_id`.
    fn journal_ids_for_area(&self, area_id: &str) -> Result<BTreeSet<String>>;
}
