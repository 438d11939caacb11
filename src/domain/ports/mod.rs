pub mod strategy_repository;
pub mod trade_repository;
