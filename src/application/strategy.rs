use crate::domain::entities::strategy::{Strategy, DEFAULT_STRATEGY_ID};
use crate::domain::error::DomainError;
use crate::domain::ports::strategy_repository::StrategyRepository;
use crate::domain::values::layer::LayerKey;
use crate::domain::values::selection_type::SelectionType;
use std::sync::Arc;

pub struct StrategyUseCase {
    strategies: Arc<dyn StrategyRepository>,
}

impl StrategyUseCase {
    pub fn new(strategies: Arc<dyn StrategyRepository>) -> Self {
        Self { strategies }
    }

    pub fn create(&self, name: String, starting_equity: f64) -> Result<Strategy, DomainError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::InvalidInput("Strategy name is required".into()));
        }
        if !starting_equity.is_finite() {
            return Err(DomainError::InvalidInput("starting_equity must be a finite number".into()));
        }
        let strategy = Strategy::new(name, starting_equity);
        self.strategies.save_strategy(&strategy)?;
        tracing::info!(strategy = %strategy.id, name = %strategy.name, "strategy created");
        Ok(strategy)
    }

    /// Seeds the built-in template when no strategy exists yet.
    /// Returns true if it was created.
    pub fn ensure_default(&self) -> Result<bool, DomainError> {
        if !self.strategies.list_strategies()?.is_empty() {
            return Ok(false);
        }
        self.strategies.save_strategy(&Strategy::support_and_resistance())?;
        tracing::info!(strategy = DEFAULT_STRATEGY_ID, "seeded default strategy");
        Ok(true)
    }

    pub fn get(&self, id: &str) -> Result<Option<Strategy>, DomainError> {
        self.strategies.get_strategy(id)
    }

    pub fn list(&self) -> Result<Vec<Strategy>, DomainError> {
        self.strategies.list_strategies()
    }

    pub fn rename(&self, id: &str, name: Option<String>, starting_equity: Option<f64>) -> Result<Strategy, DomainError> {
        self.modify(id, |s| {
            if let Some(name) = name {
                let name = name.trim();
                if name.is_empty() {
                    return Err(DomainError::InvalidInput("Strategy name is required".into()));
                }
                s.name = name.to_string();
            }
            if let Some(equity) = starting_equity {
                if !equity.is_finite() {
                    return Err(DomainError::InvalidInput("starting_equity must be a finite number".into()));
                }
                s.starting_equity = equity;
            }
            Ok(())
        })
    }

    pub fn add_category(
        &self,
        strategy_id: &str,
        layer: LayerKey,
        name: &str,
        selection_type: SelectionType,
    ) -> Result<(Strategy, String), DomainError> {
        let mut category_id = String::new();
        let strategy = self.modify(strategy_id, |s| {
            category_id = s.add_category(layer, name, selection_type)?;
            Ok(())
        })?;
        Ok((strategy, category_id))
    }

    pub fn add_tag(&self, strategy_id: &str, category_id: &str, text: &str, color: &str) -> Result<Strategy, DomainError> {
        self.modify(strategy_id, |s| s.add_tag(category_id, text, color))
    }

    /// Trades that already picked the tag keep it; analytics still groups
    /// them under the tag text.
    pub fn remove_tag(&self, strategy_id: &str, category_id: &str, text: &str) -> Result<Strategy, DomainError> {
        let strategy = self.modify(strategy_id, |s| s.remove_tag(category_id, text).map(|_| ()))?;
        tracing::info!(strategy = %strategy_id, category = %category_id, tag = %text, "tag removed");
        Ok(strategy)
    }

    pub fn set_selection_type(
        &self,
        strategy_id: &str,
        category_id: &str,
        selection_type: SelectionType,
    ) -> Result<Strategy, DomainError> {
        self.modify(strategy_id, |s| s.set_selection_type(category_id, selection_type))
    }

    /// Trades that used the category keep their selections; analytics will
    /// show them under the unknown category.
    pub fn remove_category(&self, strategy_id: &str, category_id: &str) -> Result<Strategy, DomainError> {
        self.modify(strategy_id, |s| s.remove_category(category_id).map(|_| ()))
    }

    /// Deletes a strategy together with every trade logged against it.
    /// Returns the number of trades removed.
    pub fn delete(&self, id: &str) -> Result<usize, DomainError> {
        if id == DEFAULT_STRATEGY_ID {
            return Err(DomainError::InvalidInput("The default strategy cannot be deleted".into()));
        }
        let removed = self.strategies.delete_strategy(id)?;
        tracing::info!(strategy = %id, trades = removed, "strategy deleted");
        Ok(removed)
    }

    fn modify<F>(&self, id: &str, f: F) -> Result<Strategy, DomainError>
    where
        F: FnOnce(&mut Strategy) -> Result<(), DomainError>,
    {
        let mut strategy = self
            .strategies
            .get_strategy(id)?
            .ok_or_else(|| DomainError::NotFound(format!("Strategy not found: {id}")))?;
        f(&mut strategy)?;
        self.strategies.save_strategy(&strategy)?;
        Ok(strategy)
    }
}
