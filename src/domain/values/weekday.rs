//! Day-of-week P&L breakdown.
//!
//! Trades are bucketed by the UTC calendar weekday of their timestamp.
//! Every date-based rollup in this crate uses UTC so a trade never lands
//! on different days in different views.

use crate::domain::entities::trade::Trade;
use chrono::{Datelike, Weekday};
use serde::Serialize;

const LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayStats {
    pub weekday: &'static str,
    /// Monday = 0 .. Sunday = 6.
    pub index: u8,
    pub total_trades: usize,
    pub total_pnl: f64,
}

pub fn weekday_index(day: Weekday) -> usize {
    day.num_days_from_monday() as usize
}

/// Always seven buckets, Monday first, including days without trades.
pub fn aggregate_by_weekday(trades: &[Trade]) -> [WeekdayStats; 7] {
    let mut buckets: [WeekdayStats; 7] = std::array::from_fn(|i| WeekdayStats {
        weekday: LABELS[i],
        index: i as u8,
        total_trades: 0,
        total_pnl: 0.0,
    });

    for trade in trades {
        let bucket = &mut buckets[weekday_index(trade.time.weekday())];
        bucket.total_trades += 1;
        bucket.total_pnl += trade.pnl;
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::trade::Selections;
    use crate::domain::values::trade_direction::TradeDirection;
    use crate::domain::values::trade_outcome::TradeOutcome;

    fn trade_at(time: &str, pnl: f64) -> Trade {
        Trade {
            id: time.to_string(),
            time: time.parse().unwrap(),
            pair: "ES".into(),
            direction: TradeDirection::Long,
            size: None,
            entry: 1.0,
            exit: 1.0,
            pnl,
            outcome: TradeOutcome::from_pnl(pnl),
            strategy_id: "s".into(),
            selections: Selections::new(),
            reflection: None,
        }
    }

    #[test]
    fn test_empty_input_has_seven_zero_buckets() {
        let days = aggregate_by_weekday(&[]);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].weekday, "Mon");
        assert_eq!(days[6].weekday, "Sun");
        assert!(days.iter().all(|d| d.total_trades == 0 && d.total_pnl == 0.0));
    }

    #[test]
    fn test_buckets_by_weekday_regardless_of_order() {
        // 2024-02-26 is a Monday, 2024-03-03 a Sunday
        let trades = vec![
            trade_at("2024-03-03T10:00:00Z", -20.0),
            trade_at("2024-02-26T14:30:00Z", 100.0),
            trade_at("2024-02-28T09:00:00Z", 40.0),
            trade_at("2024-02-26T19:00:00Z", -30.0),
        ];
        let days = aggregate_by_weekday(&trades);
        assert_eq!(days[0].total_trades, 2);
        assert_eq!(days[0].total_pnl, 70.0);
        assert_eq!(days[2].total_trades, 1);
        assert_eq!(days[6].total_pnl, -20.0);
        assert_eq!(days[1].total_trades, 0);
        for (i, d) in days.iter().enumerate() {
            assert_eq!(d.index as usize, i);
        }
    }

    #[test]
    fn test_uses_utc_calendar_day() {
        // Monday 23:30 at -05:00 is already Tuesday in UTC
        let trades = vec![trade_at("2024-02-26T23:30:00-05:00", 10.0)];
        let days = aggregate_by_weekday(&trades);
        assert_eq!(days[1].total_trades, 1);
        assert_eq!(days[0].total_trades, 0);
    }
}
