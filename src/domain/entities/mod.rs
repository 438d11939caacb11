pub mod strategy;
pub mod trade;
