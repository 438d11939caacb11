use crate::domain::entities::trade::Trade;
use crate::domain::error::DomainError;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default)]
pub struct TradeFilter {
    pub strategy_id: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl TradeFilter {
    pub fn for_strategy(strategy_id: &str) -> Self {
        Self {
            strategy_id: Some(strategy_id.to_string()),
            ..Default::default()
        }
    }
}

/// Trades are returned newest first.
pub trait TradeRepository: Send + Sync {
    fn add_trade(&self, trade: &Trade) -> Result<(), DomainError>;
    fn update_trade(&self, trade: &Trade) -> Result<(), DomainError>;
    fn delete_trade(&self, id: &str) -> Result<(), DomainError>;
    fn get_trade(&self, id: &str) -> Result<Option<Trade>, DomainError>;
    fn list_trades(&self, filter: &TradeFilter) -> Result<Vec<Trade>, DomainError>;
}
