use crate::domain::entities::strategy::Strategy;
use crate::domain::entities::trade::{NewTrade, Selections, Trade, TradeUpdate};
use crate::domain::error::DomainError;
use crate::domain::ports::strategy_repository::StrategyRepository;
use crate::domain::ports::trade_repository::{TradeFilter, TradeRepository};
use crate::domain::values::selection_type::SelectionType;
use std::sync::Arc;

pub struct TradeUseCase {
    trades: Arc<dyn TradeRepository>,
    strategies: Arc<dyn StrategyRepository>,
}

impl TradeUseCase {
    pub fn new(trades: Arc<dyn TradeRepository>, strategies: Arc<dyn StrategyRepository>) -> Self {
        Self { trades, strategies }
    }

    pub fn add(&self, input: NewTrade) -> Result<Trade, DomainError> {
        input.validate()?;
        let strategy = self.require_strategy(&input.strategy_id)?;
        warn_on_selection_mismatch(&strategy, &input.selections);

        let trade = Trade::new(input);
        self.trades.add_trade(&trade)?;
        tracing::info!(trade = %trade.id, strategy = %trade.strategy_id, pnl = trade.pnl, "trade logged");
        Ok(trade)
    }

    pub fn update(&self, id: &str, update: TradeUpdate) -> Result<Trade, DomainError> {
        let mut trade = self
            .trades
            .get_trade(id)?
            .ok_or_else(|| DomainError::NotFound(format!("Trade not found: {id}")))?;

        trade.apply(update)?;
        let strategy = self.require_strategy(&trade.strategy_id)?;
        warn_on_selection_mismatch(&strategy, &trade.selections);

        self.trades.update_trade(&trade)?;
        tracing::info!(trade = %trade.id, "trade updated");
        Ok(trade)
    }

    pub fn delete(&self, id: &str) -> Result<(), DomainError> {
        self.trades.delete_trade(id)?;
        tracing::info!(trade = %id, "trade deleted");
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Option<Trade>, DomainError> {
        self.trades.get_trade(id)
    }

    pub fn list(&self, filter: &TradeFilter) -> Result<Vec<Trade>, DomainError> {
        self.trades.list_trades(filter)
    }

    fn require_strategy(&self, id: &str) -> Result<Strategy, DomainError> {
        self.strategies
            .get_strategy(id)?
            .ok_or_else(|| DomainError::NotFound(format!("Strategy not found: {id}")))
    }
}

/// Selections are stored as given; mismatches with the taxonomy are only
/// logged, and analytics reports them under the unknown category.
fn warn_on_selection_mismatch(strategy: &Strategy, selections: &Selections) {
    for (category_id, tags) in selections {
        match strategy.category(category_id) {
            None => tracing::warn!(
                strategy = %strategy.id,
                category = %category_id,
                "selection references a category not in the strategy"
            ),
            Some(category) => {
                if category.selection_type == SelectionType::Single && tags.len() > 1 {
                    tracing::warn!(
                        category = %category.name,
                        count = tags.len(),
                        "single-select category has more than one tag"
                    );
                }
                for tag in tags.iter().filter(|t| !category.has_tag(t)) {
                    tracing::warn!(category = %category.name, tag = %tag, "tag not defined in category");
                }
            }
        }
    }
}
