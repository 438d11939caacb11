use crate::domain::entities::strategy::Strategy;
use crate::domain::error::DomainError;

pub trait StrategyRepository: Send + Sync {
    /// Inserts or replaces the strategy with the same id.
    fn save_strategy(&self, strategy: &Strategy) -> Result<(), DomainError>;
    fn get_strategy(&self, id: &str) -> Result<Option<Strategy>, DomainError>;
    /// Oldest first.
    fn list_strategies(&self) -> Result<Vec<Strategy>, DomainError>;
    /// Deletes the strategy together with every trade logged against it,
    /// all or nothing. Returns the number of trades removed.
    fn delete_strategy(&self, id: &str) -> Result<usize, DomainError>;
}
