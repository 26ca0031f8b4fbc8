// Area Entity - Scimago subject area

use serde::{Deserialize, Serialize};

use super::IdSet;

/// Subject area from the classification store. Identifier only, no extra
/// attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    ids: IdSet,
}

impl Area {
    pub fn new() -> Self {
        Area::default()
    }

    pub fn ids(&self) -> &IdSet {
        &self.ids
    }

    pub fn ids_mut(&mut self) -> &mut IdSet {
        &mut self.ids
    }
}
