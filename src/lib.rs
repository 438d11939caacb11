pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::analytics::{AnalyticsUseCase, EquityCurve, TagReport};
use crate::application::strategy::StrategyUseCase;
use crate::application::trade::TradeUseCase;
use crate::config::JournalConfig;
use crate::domain::entities::strategy::Strategy;
use crate::domain::entities::trade::{NewTrade, Trade, TradeUpdate};
use crate::domain::error::DomainError;
use crate::domain::ports::strategy_repository::StrategyRepository;
use crate::domain::ports::trade_repository::{TradeFilter, TradeRepository};
use crate::domain::values::layer::{LayerFilter, LayerKey};
use crate::domain::values::selection_type::SelectionType;
use crate::domain::values::summary::{DailyPnl, PerformanceSummary, StrategyWinRate};
use crate::domain::values::weekday::WeekdayStats;
use crate::infrastructure::sqlite::migrations::run_migrations;
use crate::infrastructure::sqlite::strategy_repo::SqliteStrategyRepo;
use crate::infrastructure::sqlite::trade_repo::SqliteTradeRepo;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

pub struct TradeJournal {
    trade_uc: TradeUseCase,
    strategy_uc: StrategyUseCase,
    analytics_uc: AnalyticsUseCase,
}

impl TradeJournal {
    pub fn from_config(config: &JournalConfig) -> Result<Self, DomainError> {
        let journal = Self::open(&config.db_path)?;
        if config.seed_default {
            journal.strategy_uc.ensure_default()?;
        }
        Ok(journal)
    }

    pub fn open(db_path: &str) -> Result<Self, DomainError> {
        let conn = Connection::open(db_path).map_err(|e| DomainError::Database(format!("DB error: {e}")))?;
        // in-memory databases report "memory" and ignore the request
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| DomainError::Database(format!("WAL error: {e}")))?;

        run_migrations(&conn)?;
        tracing::debug!(path = %db_path, "journal database ready");

        let shared = Arc::new(Mutex::new(conn));
        let trade_repo: Arc<dyn TradeRepository> = Arc::new(SqliteTradeRepo::new(shared.clone()));
        let strategy_repo: Arc<dyn StrategyRepository> = Arc::new(SqliteStrategyRepo::new(shared));

        Ok(Self::with_repositories(trade_repo, strategy_repo))
    }

    pub fn with_repositories(
        trade_repo: Arc<dyn TradeRepository>,
        strategy_repo: Arc<dyn StrategyRepository>,
    ) -> Self {
        Self {
            trade_uc: TradeUseCase::new(trade_repo.clone(), strategy_repo.clone()),
            strategy_uc: StrategyUseCase::new(strategy_repo.clone()),
            analytics_uc: AnalyticsUseCase::new(trade_repo, strategy_repo),
        }
    }

    // Strategies

    pub fn ensure_default_strategy(&self) -> Result<bool, DomainError> {
        self.strategy_uc.ensure_default()
    }

    pub fn strategy_create(&self, name: String, starting_equity: f64) -> Result<Strategy, DomainError> {
        self.strategy_uc.create(name, starting_equity)
    }

    pub fn strategy_update(
        &self,
        id: &str,
        name: Option<String>,
        starting_equity: Option<f64>,
    ) -> Result<Strategy, DomainError> {
        self.strategy_uc.rename(id, name, starting_equity)
    }

    pub fn strategy_get(&self, id: &str) -> Result<Option<Strategy>, DomainError> {
        self.strategy_uc.get(id)
    }

    pub fn strategy_list(&self) -> Result<Vec<Strategy>, DomainError> {
        self.strategy_uc.list()
    }

    pub fn strategy_delete(&self, id: &str) -> Result<usize, DomainError> {
        self.strategy_uc.delete(id)
    }

    pub fn category_add(
        &self,
        strategy_id: &str,
        layer: LayerKey,
        name: &str,
        selection_type: SelectionType,
    ) -> Result<(Strategy, String), DomainError> {
        self.strategy_uc.add_category(strategy_id, layer, name, selection_type)
    }

    pub fn category_remove(&self, strategy_id: &str, category_id: &str) -> Result<Strategy, DomainError> {
        self.strategy_uc.remove_category(strategy_id, category_id)
    }

    pub fn tag_add(
        &self,
        strategy_id: &str,
        category_id: &str,
        text: &str,
        color: &str,
    ) -> Result<Strategy, DomainError> {
        self.strategy_uc.add_tag(strategy_id, category_id, text, color)
    }

    pub fn tag_remove(&self, strategy_id: &str, category_id: &str, text: &str) -> Result<Strategy, DomainError> {
        self.strategy_uc.remove_tag(strategy_id, category_id, text)
    }

    pub fn category_set_selection_type(
        &self,
        strategy_id: &str,
        category_id: &str,
        selection_type: SelectionType,
    ) -> Result<Strategy, DomainError> {
        self.strategy_uc.set_selection_type(strategy_id, category_id, selection_type)
    }

    // Trades

    pub fn trade_add(&self, input: NewTrade) -> Result<Trade, DomainError> {
        self.trade_uc.add(input)
    }

    pub fn trade_update(&self, id: &str, update: TradeUpdate) -> Result<Trade, DomainError> {
        self.trade_uc.update(id, update)
    }

    pub fn trade_delete(&self, id: &str) -> Result<(), DomainError> {
        self.trade_uc.delete(id)
    }

    pub fn trade_get(&self, id: &str) -> Result<Option<Trade>, DomainError> {
        self.trade_uc.get(id)
    }

    pub fn trade_list(&self, filter: &TradeFilter) -> Result<Vec<Trade>, DomainError> {
        self.trade_uc.list(filter)
    }

    // Analytics

    pub fn tag_report(&self, strategy_id: &str, layer_filter: LayerFilter) -> Result<TagReport, DomainError> {
        self.analytics_uc.tag_report(strategy_id, layer_filter)
    }

    pub fn weekdays(&self, strategy_id: &str) -> Result<[WeekdayStats; 7], DomainError> {
        self.analytics_uc.weekdays(strategy_id)
    }

    pub fn summary(&self, strategy_id: Option<&str>) -> Result<PerformanceSummary, DomainError> {
        self.analytics_uc.summary(strategy_id)
    }

    pub fn equity_curve(&self, strategy_id: &str) -> Result<EquityCurve, DomainError> {
        self.analytics_uc.equity_curve(strategy_id)
    }

    pub fn calendar(&self, strategy_id: &str, year: i32, month: u32) -> Result<Vec<DailyPnl>, DomainError> {
        self.analytics_uc.calendar(strategy_id, year, month)
    }

    pub fn strategy_win_rates(&self) -> Result<Vec<StrategyWinRate>, DomainError> {
        self.analytics_uc.strategy_win_rates()
    }
}
