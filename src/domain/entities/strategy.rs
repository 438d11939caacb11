//! Strategy taxonomy: four ordered layers of categories, each holding tags.
//!
//! A trade's `selections` are keyed by category id and only make sense
//! relative to the strategy they were recorded against. Editing a strategy
//! never rewrites historical trades.

use crate::domain::error::DomainError;
use crate::domain::values::category_index::CategoryIndex;
use crate::domain::values::layer::LayerKey;
use crate::domain::values::selection_type::SelectionType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Id of the built-in template strategy. It can be edited but not deleted.
pub const DEFAULT_STRATEGY_ID: &str = "strat-default-sr";

pub const DEFAULT_STARTING_EQUITY: f64 = 10_000.0;

const MIN_CATEGORY_NAME_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub text: String,
    pub color: String,
}

impl Tag {
    pub fn new(text: &str, color: &str) -> Self {
        Self {
            text: text.to_string(),
            color: color.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub selection_type: SelectionType,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Category {
    pub fn has_tag(&self, text: &str) -> bool {
        self.tags.iter().any(|t| t.text == text)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layers {
    #[serde(default)]
    pub layer1: Vec<Category>,
    #[serde(default)]
    pub layer2: Vec<Category>,
    #[serde(default)]
    pub layer3: Vec<Category>,
    #[serde(default)]
    pub layer4: Vec<Category>,
}

impl Layers {
    pub fn get(&self, key: LayerKey) -> &[Category] {
        match key {
            LayerKey::Layer1 => &self.layer1,
            LayerKey::Layer2 => &self.layer2,
            LayerKey::Layer3 => &self.layer3,
            LayerKey::Layer4 => &self.layer4,
        }
    }

    pub fn get_mut(&mut self, key: LayerKey) -> &mut Vec<Category> {
        match key {
            LayerKey::Layer1 => &mut self.layer1,
            LayerKey::Layer2 => &mut self.layer2,
            LayerKey::Layer3 => &mut self.layer3,
            LayerKey::Layer4 => &mut self.layer4,
        }
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Category> + '_ {
        self.layer1
            .iter_mut()
            .chain(self.layer2.iter_mut())
            .chain(self.layer3.iter_mut())
            .chain(self.layer4.iter_mut())
    }

    /// All categories with their layer, in layer order.
    pub fn iter(&self) -> impl Iterator<Item = (LayerKey, &Category)> + '_ {
        LayerKey::ALL
            .into_iter()
            .flat_map(move |key| self.get(key).iter().map(move |c| (key, c)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: String,
    pub name: String,
    pub starting_equity: f64,
    pub layers: Layers,
    pub created_at: DateTime<Utc>,
}

impl Strategy {
    /// A fresh workspace: layer 1 comes seeded with an instrument category.
    pub fn new(name: String, starting_equity: f64) -> Self {
        let mut layers = Layers::default();
        layers.layer1.push(Category {
            id: new_category_id(),
            name: "INSTRUMENT".to_string(),
            selection_type: SelectionType::Single,
            tags: vec![Tag::new("NQ", "#06b6d4"), Tag::new("ES", "#f43f5e")],
        });
        Self {
            id: format!("strat-{}", uuid::Uuid::new_v4()),
            name,
            starting_equity,
            layers,
            created_at: Utc::now(),
        }
    }

    /// The built-in support & resistance template.
    pub fn support_and_resistance() -> Self {
        let layers = Layers {
            layer1: vec![Category {
                id: "cat-instrument".to_string(),
                name: "INSTRUMENT".to_string(),
                selection_type: SelectionType::Single,
                tags: vec![Tag::new("NQ", "#06b6d4"), Tag::new("ES", "#f43f5e")],
            }],
            layer2: vec![Category {
                id: "cat-sr-logic".to_string(),
                name: "ZONE_IDENTIFIER".to_string(),
                selection_type: SelectionType::Multi,
                tags: vec![
                    Tag::new("MAJOR_S/R", "#8b5cf6"),
                    Tag::new("MINOR_S/R", "#06b6d4"),
                    Tag::new("DYNAMIC_EMA", "#3b82f6"),
                    Tag::new("VBP_POC", "#f59e0b"),
                ],
            }],
            layer3: vec![Category {
                id: "cat-risk-mgt".to_string(),
                name: "RISK_PROTOCOL".to_string(),
                selection_type: SelectionType::Single,
                tags: vec![
                    Tag::new("FIXED_1%", "#10b981"),
                    Tag::new("SCALED_ENTRY", "#06b6d4"),
                    Tag::new("AGGRESSIVE", "#f43f5e"),
                ],
            }],
            layer4: vec![Category {
                id: "cat-neural-state".to_string(),
                name: "PSYCH_INDEX".to_string(),
                selection_type: SelectionType::Single,
                tags: vec![
                    Tag::new("OPTIMAL_FLOW", "#10b981"),
                    Tag::new("HESITANT", "#f59e0b"),
                    Tag::new("FOMO_IMPULSE", "#f43f5e"),
                ],
            }],
        };
        Self {
            id: DEFAULT_STRATEGY_ID.to_string(),
            name: "SUPPORT AND RESISTANCE".to_string(),
            starting_equity: DEFAULT_STARTING_EQUITY,
            layers,
            created_at: Utc::now(),
        }
    }

    pub fn layer(&self, key: LayerKey) -> &[Category] {
        self.layers.get(key)
    }

    pub fn categories(&self) -> impl Iterator<Item = (LayerKey, &Category)> + '_ {
        self.layers.iter()
    }

    pub fn category(&self, category_id: &str) -> Option<&Category> {
        self.categories()
            .map(|(_, c)| c)
            .find(|c| c.id == category_id)
    }

    /// Flat id -> (name, layer) lookup for this snapshot of the taxonomy.
    pub fn index(&self) -> CategoryIndex {
        CategoryIndex::build(self)
    }

    /// Adds a category to `layer`. Names are upper-cased and must be unique
    /// across all four layers.
    pub fn add_category(
        &mut self,
        layer: LayerKey,
        name: &str,
        selection_type: SelectionType,
    ) -> Result<String, DomainError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidInput("Category name is required".into()));
        }
        if trimmed.chars().count() < MIN_CATEGORY_NAME_LEN {
            return Err(DomainError::InvalidInput(format!(
                "Category name too short: minimum {MIN_CATEGORY_NAME_LEN} characters"
            )));
        }

        let upper = trimmed.to_uppercase();
        if self.categories().any(|(_, c)| c.name == upper) {
            return Err(DomainError::InvalidInput(format!(
                "Category \"{upper}\" already exists in this strategy"
            )));
        }

        let id = new_category_id();
        self.layers.get_mut(layer).push(Category {
            id: id.clone(),
            name: upper,
            selection_type,
            tags: Vec::new(),
        });
        Ok(id)
    }

    pub fn add_tag(&mut self, category_id: &str, text: &str, color: &str) -> Result<(), DomainError> {
        let text = text.trim().to_uppercase();
        if text.is_empty() {
            return Err(DomainError::InvalidInput("Tag text is required".into()));
        }
        let category = self.category_mut(category_id)?;
        if category.has_tag(&text) {
            return Err(DomainError::InvalidInput(format!(
                "Tag \"{text}\" already exists in {}",
                category.name
            )));
        }
        category.tags.push(Tag::new(&text, color));
        Ok(())
    }

    /// Removes a tag from a category. Trades that selected it keep the raw
    /// text and still aggregate under it.
    pub fn remove_tag(&mut self, category_id: &str, text: &str) -> Result<Tag, DomainError> {
        let text = text.trim().to_uppercase();
        let category = self.category_mut(category_id)?;
        let pos = category
            .tags
            .iter()
            .position(|t| t.text == text)
            .ok_or_else(|| {
                DomainError::NotFound(format!("Tag \"{text}\" not found in {}", category.name))
            })?;
        Ok(category.tags.remove(pos))
    }

    /// Switches a category between single- and multi-select. Existing trades
    /// are left as recorded.
    pub fn set_selection_type(
        &mut self,
        category_id: &str,
        selection_type: SelectionType,
    ) -> Result<(), DomainError> {
        self.category_mut(category_id)?.selection_type = selection_type;
        Ok(())
    }

    /// Removes a category. Trades that referenced it keep their raw keys.
    pub fn remove_category(&mut self, category_id: &str) -> Result<Category, DomainError> {
        for key in LayerKey::ALL {
            let layer = self.layers.get_mut(key);
            if let Some(pos) = layer.iter().position(|c| c.id == category_id) {
                return Ok(layer.remove(pos));
            }
        }
        Err(DomainError::NotFound(format!("Category not found: {category_id}")))
    }

    fn category_mut(&mut self, category_id: &str) -> Result<&mut Category, DomainError> {
        self.layers
            .iter_mut()
            .find(|c| c.id == category_id)
            .ok_or_else(|| DomainError::NotFound(format!("Category not found: {category_id}")))
    }
}

fn new_category_id() -> String {
    format!("cat-{}", uuid::Uuid::new_v4())
}
