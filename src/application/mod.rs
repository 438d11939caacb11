pub mod analytics;
pub mod strategy;
pub mod trade;
