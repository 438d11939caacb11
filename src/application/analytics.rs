//! Read-side analytics. Each call loads a fresh snapshot of the strategy and
//! its trades and hands them to the pure aggregation functions; nothing is
//! cached between calls.

use crate::domain::entities::strategy::Strategy;
use crate::domain::entities::trade::Trade;
use crate::domain::error::DomainError;
use crate::domain::ports::strategy_repository::StrategyRepository;
use crate::domain::ports::trade_repository::{TradeFilter, TradeRepository};
use crate::domain::values::layer::LayerFilter;
use crate::domain::values::summary::{
    daily_pnl, equity_curve, summarize, win_rate_by_strategy, DailyPnl, EquityPoint,
    PerformanceSummary, StrategyWinRate,
};
use crate::domain::values::tag_performance::{aggregate_by_tag, leaderboard, TagStats};
use crate::domain::values::weekday::{aggregate_by_weekday, WeekdayStats};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct TagReport {
    pub strategy_id: String,
    pub strategy_name: String,
    pub layer_filter: LayerFilter,
    pub stats: Vec<TagStats>,
    pub leaderboard: Vec<TagStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EquityCurve {
    pub strategy_id: String,
    pub starting_equity: f64,
    pub final_equity: f64,
    pub points: Vec<EquityPoint>,
}

pub struct AnalyticsUseCase {
    trades: Arc<dyn TradeRepository>,
    strategies: Arc<dyn StrategyRepository>,
}

impl AnalyticsUseCase {
    pub fn new(trades: Arc<dyn TradeRepository>, strategies: Arc<dyn StrategyRepository>) -> Self {
        Self { trades, strategies }
    }

    pub fn tag_report(&self, strategy_id: &str, layer_filter: LayerFilter) -> Result<TagReport, DomainError> {
        let (strategy, trades) = self.snapshot(strategy_id)?;
        let stats = aggregate_by_tag(&trades, &strategy, layer_filter);
        let leaderboard = leaderboard(&stats);
        Ok(TagReport {
            strategy_id: strategy.id,
            strategy_name: strategy.name,
            layer_filter,
            stats,
            leaderboard,
        })
    }

    pub fn weekdays(&self, strategy_id: &str) -> Result<[WeekdayStats; 7], DomainError> {
        let (_, trades) = self.snapshot(strategy_id)?;
        Ok(aggregate_by_weekday(&trades))
    }

    /// Summary for one strategy, or for the whole journal when `None`.
    pub fn summary(&self, strategy_id: Option<&str>) -> Result<PerformanceSummary, DomainError> {
        let trades = match strategy_id {
            Some(id) => self.snapshot(id)?.1,
            None => self.trades.list_trades(&TradeFilter::default())?,
        };
        Ok(summarize(&trades))
    }

    pub fn equity_curve(&self, strategy_id: &str) -> Result<EquityCurve, DomainError> {
        let (strategy, trades) = self.snapshot(strategy_id)?;
        let points = equity_curve(&trades, strategy.starting_equity);
        let final_equity = points
            .last()
            .map(|p| p.equity)
            .unwrap_or(strategy.starting_equity);
        Ok(EquityCurve {
            strategy_id: strategy.id,
            starting_equity: strategy.starting_equity,
            final_equity,
            points,
        })
    }

    pub fn calendar(&self, strategy_id: &str, year: i32, month: u32) -> Result<Vec<DailyPnl>, DomainError> {
        let (_, trades) = self.snapshot(strategy_id)?;
        daily_pnl(&trades, year, month)
    }

    pub fn strategy_win_rates(&self) -> Result<Vec<StrategyWinRate>, DomainError> {
        let trades = self.trades.list_trades(&TradeFilter::default())?;
        Ok(win_rate_by_strategy(&trades))
    }

    fn snapshot(&self, strategy_id: &str) -> Result<(Strategy, Vec<Trade>), DomainError> {
        let strategy = self
            .strategies
            .get_strategy(strategy_id)?
            .ok_or_else(|| DomainError::NotFound(format!("Strategy not found: {strategy_id}")))?;
        let trades = self.trades.list_trades(&TradeFilter::for_strategy(strategy_id))?;
        Ok((strategy, trades))
    }
}
