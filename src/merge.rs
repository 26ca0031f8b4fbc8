// Merge Map - accumulates partial records into complete entities
//
// Heterogeneous stores return overlapping partial rows for the same entity.
// Everything funnels through one insertion-ordered map keyed by stable
// identity, so result order is first-appearance order across handlers and
// repeated keys merge instead of duplicating.
//
// Conflict rules:
// - scalar strings (title, publisher, licence, quartile): first-non-empty-wins
// - language lists: union, insertion order preserved
// - booleans (seal, apc): last-writer-wins whenever the new row has a value

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use crate::entities::{Area, Category, Journal};
use crate::records::{non_empty, ClassificationRecord, JournalRecord};

// ============================================================================
// MERGE MAP
// ============================================================================

/// Map that remembers first-insertion order of its keys.
pub(crate) struct MergeMap<V> {
    order: Vec<String>,
    entries: HashMap<String, V>,
}

impl<V> MergeMap<V> {
    pub fn new() -> Self {
        MergeMap {
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    pub fn insert(&mut self, key: String, value: V) {
        if !self.entries.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.entries.insert(key, value);
    }

    /// Values in first-insertion order.
    pub fn into_values(mut self) -> Vec<V> {
        self.order
            .iter()
            .filter_map(|key| self.entries.remove(key))
            .collect()
    }
}

/// Key that can never match any real identifier or any other row.
fn synthetic_row_key() -> String {
    format!("__row_{}", Uuid::new_v4())
}

// ============================================================================
// JOURNALS
// ============================================================================

/// Fold journal rows into the merge map, keyed by ISSN, then EISSN, then a
/// synthetic per-row key. A real identity is never replaced by a synthetic
/// one: synthetic keys only ever label rows that carry no identifier.
pub(crate) fn collect_journals(records: &[JournalRecord], target: &mut MergeMap<Journal>) {
    for record in records {
        let key = match record.primary_id() {
            Some(id) => id.to_string(),
            None => synthetic_row_key(),
        };

        match target.get_mut(&key) {
            Some(existing) => update_journal(existing, record),
            None => target.insert(key, journal_from_record(record)),
        }
    }
}

/// Build a fresh journal from its first row. Absent booleans default to
/// false here: the store contract guarantees no row reaches the engine
/// with a meaningfully-unset boolean.
pub(crate) fn journal_from_record(record: &JournalRecord) -> Journal {
    let mut journal = Journal::new();

    if let Some(id) = record.primary_id() {
        journal.ids_mut().set(id);
    }
    if let Some(title) = non_empty(&record.title) {
        journal.set_title(title);
    }
    if let Some(language) = non_empty(&record.language) {
        journal.add_language(language);
    }
    if let Some(publisher) = non_empty(&record.publisher) {
        journal.set_publisher(Some(publisher));
    }
    if let Some(seal) = record.seal {
        journal.set_seal(seal);
    }
    if let Some(licence) = non_empty(&record.licence) {
        journal.set_licence(licence);
    }
    if let Some(apc) = record.apc {
        journal.set_apc(apc);
    }

    journal
}

/// Merge a repeat row into an existing journal.
fn update_journal(journal: &mut Journal, record: &JournalRecord) {
    if journal.title().is_empty() {
        if let Some(title) = non_empty(&record.title) {
            journal.set_title(title);
        }
    }

    if let Some(language) = non_empty(&record.language) {
        journal.add_language(language);
    }

    if journal.publisher().is_none() {
        if let Some(publisher) = non_empty(&record.publisher) {
            journal.set_publisher(Some(publisher));
        }
    }

    if journal.licence().is_empty() {
        if let Some(licence) = non_empty(&record.licence) {
            journal.set_licence(licence);
        }
    }

    // A present boolean is never "more correct" by emptiness, so the
    // latest row wins.
    if let Some(seal) = record.seal {
        journal.set_seal(seal);
    }
    if let Some(apc) = record.apc {
        journal.set_apc(apc);
    }
}

// ============================================================================
// CATEGORIES
// ============================================================================

/// Fold category rows into the merge map. The quartile is filled only
/// while empty: the first store to supply one wins.
pub(crate) fn collect_categories(
    records: &[ClassificationRecord],
    target: &mut MergeMap<Category>,
) {
    for record in records {
        let ClassificationRecord::Category { id, quartile } = record else {
            debug!("dropping area-shaped row from a category result");
            continue;
        };

        let key = match non_empty(id) {
            Some(id) => id.to_string(),
            None => synthetic_row_key(),
        };

        match target.get_mut(&key) {
            Some(existing) => {
                if existing.quartile().is_none() {
                    existing.set_quartile(non_empty(quartile));
                }
            }
            None => {
                let mut category = Category::new();
                if let Some(id) = non_empty(id) {
                    category.ids_mut().set(id);
                }
                category.set_quartile(non_empty(quartile));
                target.insert(key, category);
            }
        }
    }
}

pub(crate) fn category_from_record(record: &ClassificationRecord) -> Option<Category> {
    let ClassificationRecord::Category { id, quartile } = record else {
        return None;
    };

    let mut category = Category::new();
    if let Some(id) = non_empty(id) {
        category.ids_mut().set(id);
    }
    category.set_quartile(non_empty(quartile));
    Some(category)
}

// ============================================================================
// AREAS
// ============================================================================

/// Fold area rows into the merge map. Areas carry no mutable attributes,
/// so repeat keys are simply dropped.
pub(crate) fn collect_areas(records: &[ClassificationRecord], target: &mut MergeMap<Area>) {
    for record in records {
        let ClassificationRecord::Area { id } = record else {
            debug!("dropping category-shaped row from an area result");
            continue;
        };

        let key = match non_empty(id) {
            Some(id) => id.to_string(),
            None => synthetic_row_key(),
        };

        if target.get_mut(&key).is_none() {
            let mut area = Area::new();
            if let Some(id) = non_empty(id) {
                area.ids_mut().set(id);
            }
            target.insert(key, area);
        }
    }
}

pub(crate) fn area_from_record(record: &ClassificationRecord) -> Option<Area> {
    let ClassificationRecord::Area { id } = record else {
        return None;
    };

    let mut area = Area::new();
    if let Some(id) = non_empty(id) {
        area.ids_mut().set(id);
    }
    Some(area)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(issn: &str, title: &str, language: &str) -> JournalRecord {
        JournalRecord {
            issn: if issn.is_empty() { None } else { Some(issn.to_string()) },
            title: if title.is_empty() { None } else { Some(title.to_string()) },
            language: if language.is_empty() { None } else { Some(language.to_string()) },
            ..JournalRecord::default()
        }
    }

    #[test]
    fn test_scalars_first_non_empty_wins() {
        let mut first = record("1111-1111", "Nature Physics", "English");
        first.publisher = Some(String::new());

        let mut second = record("1111-1111", "A Different Title", "English");
        second.publisher = Some("ACME Publishing".to_string());

        let mut map = MergeMap::new();
        collect_journals(&[first, second], &mut map);
        let journals = map.into_values();

        assert_eq!(journals.len(), 1);
        assert_eq!(journals[0].title(), "Nature Physics");
        assert_eq!(journals[0].publisher(), Some("ACME Publishing"));
    }

    #[test]
    fn test_languages_union_in_order() {
        let rows = vec![
            record("1111-1111", "X", "English"),
            record("1111-1111", "", "French"),
            record("1111-1111", "", "English"),
        ];

        let mut map = MergeMap::new();
        collect_journals(&rows, &mut map);
        let journals = map.into_values();

        assert_eq!(journals[0].languages(), &["English", "French"]);
    }

    #[test]
    fn test_booleans_last_writer_wins() {
        let mut first = record("1111-1111", "X", "");
        first.apc = Some(true);
        first.seal = Some(true);

        let mut second = record("1111-1111", "", "");
        second.apc = Some(false);
        // seal absent in the second row: previous value must survive

        let mut map = MergeMap::new();
        collect_journals(&[first, second], &mut map);
        let journals = map.into_values();

        assert!(!journals[0].has_apc());
        assert!(journals[0].has_doaj_seal());
    }

    #[test]
    fn test_rows_without_identity_never_merge() {
        let rows = vec![record("", "Orphan A", ""), record("", "Orphan B", "")];

        let mut map = MergeMap::new();
        collect_journals(&rows, &mut map);

        assert_eq!(map.into_values().len(), 2);
    }

    #[test]
    fn test_first_appearance_order_is_preserved() {
        let rows = vec![
            record("2222-2222", "Second", ""),
            record("1111-1111", "First", ""),
            record("2222-2222", "", "English"),
        ];

        let mut map = MergeMap::new();
        collect_journals(&rows, &mut map);
        let journals = map.into_values();

        assert_eq!(journals[0].ids().first(), Some("2222-2222"));
        assert_eq!(journals[1].ids().first(), Some("1111-1111"));
    }

    #[test]
    fn test_category_quartile_first_non_empty_wins() {
        let rows = vec![
            ClassificationRecord::Category {
                id: Some("Oncology".to_string()),
                quartile: None,
            },
            ClassificationRecord::Category {
                id: Some("Oncology".to_string()),
                quartile: Some("Q1".to_string()),
            },
            ClassificationRecord::Category {
                id: Some("Oncology".to_string()),
                quartile: Some("Q4".to_string()),
            },
        ];

        let mut map = MergeMap::new();
        collect_categories(&rows, &mut map);
        let categories = map.into_values();

        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].quartile(), Some("Q1"));
    }

    #[test]
    fn test_area_duplicates_dropped() {
        let rows = vec![
            ClassificationRecord::Area {
                id: Some("Medicine".to_string()),
            },
            ClassificationRecord::Area {
                id: Some("Medicine".to_string()),
            },
        ];

        let mut map = MergeMap::new();
        collect_areas(&rows, &mut map);

        assert_eq!(map.into_values().len(), 1);
    }

    #[test]
    fn test_mistagged_rows_are_dropped() {
        let rows = vec![ClassificationRecord::Area {
            id: Some("Medicine".to_string()),
        }];

        let mut map = MergeMap::new();
        collect_categories(&rows, &mut map);

        assert!(map.into_values().is_empty());
    }
}
