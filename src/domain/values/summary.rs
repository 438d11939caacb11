//! Journal-level rollups: headline stats, equity curve, P&L calendar and
//! per-strategy win rates.

use crate::domain::entities::trade::Trade;
use crate::domain::error::DomainError;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// A ratio whose denominator may be zero. Serialized as a number, or as
/// `"max"` when there is something over nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ratio {
    Value(f64),
    Unbounded,
}

impl Ratio {
    /// `zero_zero` is reported when both sides are zero.
    fn of(numerator: f64, denominator: f64, zero_zero: f64) -> Self {
        if denominator == 0.0 {
            if numerator > 0.0 {
                Ratio::Unbounded
            } else {
                Ratio::Value(zero_zero)
            }
        } else {
            Ratio::Value(numerator / denominator)
        }
    }
}

impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Ratio::Value(v) => serializer.serialize_f64(*v),
            Ratio::Unbounded => serializer.serialize_str("max"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub total_trades: usize,
    pub total_pnl: f64,
    /// Trades with `pnl > 0`.
    pub wins: usize,
    /// Trades with `pnl < 0`.
    pub losses: usize,
    pub breakeven: usize,
    pub win_rate: f64,
    pub gross_profit: f64,
    /// Absolute value of the summed losing P&L.
    pub gross_loss: f64,
    pub profit_factor: Ratio,
    pub avg_win: f64,
    pub avg_loss: f64,
    /// Average win over average loss (the "1:R" figure).
    pub avg_risk_reward: Ratio,
}

/// Headline statistics. Unlike trade outcomes, a flat trade is neither a
/// win nor a loss here: it counts toward `total_trades` and `breakeven`
/// only, so it cannot dilute the average win.
pub fn summarize(trades: &[Trade]) -> PerformanceSummary {
    let mut wins = 0usize;
    let mut losses = 0usize;
    let mut gross_profit = 0.0;
    let mut gross_loss = 0.0;
    let mut total_pnl = 0.0;

    for t in trades {
        total_pnl += t.pnl;
        if t.pnl > 0.0 {
            wins += 1;
            gross_profit += t.pnl;
        } else if t.pnl < 0.0 {
            losses += 1;
            gross_loss += t.pnl.abs();
        }
    }

    let total_trades = trades.len();
    let win_rate = if total_trades > 0 {
        wins as f64 / total_trades as f64 * 100.0
    } else {
        0.0
    };
    let avg_win = if wins > 0 { gross_profit / wins as f64 } else { 0.0 };
    let avg_loss = if losses > 0 { gross_loss / losses as f64 } else { 0.0 };

    PerformanceSummary {
        total_trades,
        total_pnl,
        wins,
        losses,
        breakeven: total_trades - wins - losses,
        win_rate,
        gross_profit,
        gross_loss,
        profit_factor: Ratio::of(gross_profit, gross_loss, 0.0),
        avg_win,
        avg_loss,
        avg_risk_reward: Ratio::of(avg_win, avg_loss, 1.0),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    pub trade_id: String,
    pub time: DateTime<Utc>,
    pub pnl: f64,
    pub equity: f64,
}

/// Running account equity after each trade, oldest first. Trades sharing a
/// timestamp keep their input order.
pub fn equity_curve(trades: &[Trade], starting_equity: f64) -> Vec<EquityPoint> {
    let mut ordered: Vec<&Trade> = trades.iter().collect();
    ordered.sort_by_key(|t| t.time);

    let mut equity = starting_equity;
    ordered
        .into_iter()
        .map(|t| {
            equity += t.pnl;
            EquityPoint {
                trade_id: t.id.clone(),
                time: t.time,
                pnl: t.pnl,
                equity,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPnl {
    pub date: NaiveDate,
    pub trades: usize,
    pub pnl: f64,
}

/// One entry per day of `month`, using each trade's UTC date.
pub fn daily_pnl(trades: &[Trade], year: i32, month: u32) -> Result<Vec<DailyPnl>, DomainError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| DomainError::InvalidInput(format!("Invalid month: {year}-{month:02}")))?;

    let mut days: Vec<DailyPnl> = first
        .iter_days()
        .take_while(|d| d.month() == month)
        .map(|date| DailyPnl {
            date,
            trades: 0,
            pnl: 0.0,
        })
        .collect();

    for t in trades {
        let date = t.time.date_naive();
        if date.year() == year && date.month() == month {
            let day = &mut days[date.day0() as usize];
            day.trades += 1;
            day.pnl += t.pnl;
        }
    }
    Ok(days)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyWinRate {
    pub strategy_id: String,
    pub trades: usize,
    pub wins: usize,
    pub win_rate: f64,
}

/// Wins are trades with `pnl > 0`, as in [`summarize`].
pub fn win_rate_by_strategy(trades: &[Trade]) -> Vec<StrategyWinRate> {
    let mut groups: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for t in trades {
        let entry = groups.entry(t.strategy_id.as_str()).or_insert((0, 0));
        entry.0 += 1;
        if t.pnl > 0.0 {
            entry.1 += 1;
        }
    }

    groups
        .into_iter()
        .map(|(id, (count, wins))| StrategyWinRate {
            strategy_id: id.to_string(),
            trades: count,
            wins,
            win_rate: if count > 0 {
                wins as f64 / count as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect()
}
