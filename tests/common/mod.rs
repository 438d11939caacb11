//! Shared test helpers.

use tradejournal::domain::entities::strategy::DEFAULT_STRATEGY_ID;
use tradejournal::domain::entities::trade::{NewTrade, Selections, Trade};
use tradejournal::domain::values::trade_direction::TradeDirection;
use tradejournal::TradeJournal;

/// In-memory journal seeded with the default support & resistance strategy.
pub fn setup() -> TradeJournal {
    let journal = TradeJournal::open(":memory:").unwrap();
    journal.ensure_default_strategy().unwrap();
    journal
}

pub fn new_trade(time: &str, pnl: f64, selections: &[(&str, &[&str])]) -> NewTrade {
    NewTrade {
        time: time.parse().unwrap(),
        pair: "NQ".into(),
        direction: if pnl >= 0.0 {
            TradeDirection::Long
        } else {
            TradeDirection::Short
        },
        size: Some("1 Lot".into()),
        entry: 17850.0,
        exit: 17850.0 + pnl / 20.0,
        pnl,
        strategy_id: DEFAULT_STRATEGY_ID.into(),
        selections: selections
            .iter()
            .map(|(cat, tags)| (cat.to_string(), tags.iter().map(|t| t.to_string()).collect()))
            .collect::<Selections>(),
        reflection: None,
    }
}

pub fn log(journal: &TradeJournal, time: &str, pnl: f64, selections: &[(&str, &[&str])]) -> Trade {
    journal.trade_add(new_trade(time, pnl, selections)).unwrap()
}
