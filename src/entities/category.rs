// Category Entity - Scimago subject category with quartile ranking

use serde::{Deserialize, Serialize};

use super::IdSet;

/// Subject category from the classification store. The sole identifier is
/// the category name; the quartile is Q1-Q4 or absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    ids: IdSet,
    quartile: Option<String>,
}

impl Category {
    pub fn new() -> Self {
        Category::default()
    }

    pub fn ids(&self) -> &IdSet {
        &self.ids
    }

    pub fn ids_mut(&mut self) -> &mut IdSet {
        &mut self.ids
    }

    pub fn quartile(&self) -> Option<&str> {
        self.quartile.as_deref()
    }

    pub fn set_quartile(&mut self, quartile: Option<&str>) {
        self.quartile = quartile.filter(|value| !value.is_empty()).map(str::to_string);
    }
}
