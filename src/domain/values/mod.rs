pub mod category_index;
pub mod layer;
pub mod selection_type;
pub mod summary;
pub mod tag_performance;
pub mod trade_direction;
pub mod trade_outcome;
pub mod weekday;
