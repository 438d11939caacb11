use crate::domain::entities::strategy::Strategy;
use crate::domain::values::layer::LayerKey;
use std::collections::HashMap;

/// Display name for selections whose category id is not in the taxonomy.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRef {
    pub name: String,
    pub layer: LayerKey,
}

/// Flat `category id -> (name, layer)` table for one taxonomy snapshot.
///
/// Built once per aggregation instead of scanning the four layers for every
/// selected tag. Ids are expected to be unique across layers; if they are
/// not, the first layer in order wins.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    entries: HashMap<String, CategoryRef>,
}

impl CategoryIndex {
    pub fn build(strategy: &Strategy) -> Self {
        let mut entries = HashMap::new();
        for (layer, category) in strategy.categories() {
            entries
                .entry(category.id.clone())
                .or_insert_with(|| CategoryRef {
                    name: category.name.clone(),
                    layer,
                });
        }
        Self { entries }
    }

    pub fn resolve(&self, category_id: &str) -> Option<&CategoryRef> {
        self.entries.get(category_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
