// Partial Records - loosely-shaped rows returned by the store handlers
//
// A store may omit any attribute for a given row. Absent is not the same
// as present-but-empty: an absent `apc` means the store did not produce
// the attribute, not that the journal has no APC.

use serde::{Deserialize, Serialize};

/// One row of journal attributes produced by a single journal store.
///
/// Every field is optional. `None` means the column was absent from the
/// row; `Some("")` means the store produced an empty value. The conversion
/// layer collapses whitespace-only values to "no value" via [`non_empty`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRecord {
    pub issn: Option<String>,
    pub eissn: Option<String>,
    pub title: Option<String>,
    pub language: Option<String>,
    pub publisher: Option<String>,
    pub seal: Option<bool>,
    pub licence: Option<String>,
    pub apc: Option<bool>,
}

impl JournalRecord {
    /// Merge identity: ISSN if meaningful, else EISSN.
    pub fn primary_id(&self) -> Option<&str> {
        non_empty(&self.issn).or_else(|| non_empty(&self.eissn))
    }
}

/// One row of classification attributes produced by a single
/// classification store.
///
/// The two tables have different shapes, so the record is a tagged union:
/// a category row always carries a quartile column (whose value may still
/// be absent), an area row never does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassificationRecord {
    Category {
        id: Option<String>,
        quartile: Option<String>,
    },
    Area {
        id: Option<String>,
    },
}

impl ClassificationRecord {
    pub fn id(&self) -> Option<&str> {
        match self {
            ClassificationRecord::Category { id, .. } => non_empty(id),
            ClassificationRecord::Area { id } => non_empty(id),
        }
    }
}

/// Trimmed value of an optional cell, with absent and whitespace-only
/// collapsed to `None`.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
}
