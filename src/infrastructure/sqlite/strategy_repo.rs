use crate::domain::entities::strategy::{Layers, Strategy};
use crate::domain::error::DomainError;
use crate::domain::ports::strategy_repository::StrategyRepository;
use crate::infrastructure::sqlite::trade_repo::{from_db_time, to_db_time};
use crate::infrastructure::sqlite::SharedConnection;
use rusqlite::params;

const SELECT_COLS: &str = "id, name, starting_equity, layers, created_at";

pub struct SqliteStrategyRepo {
    conn: SharedConnection,
}

impl SqliteStrategyRepo {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    fn row_to_strategy(row: &rusqlite::Row) -> Result<Strategy, rusqlite::Error> {
        let id: String = row.get(0)?;
        let layers_str: String = row.get(3)?;
        let created_str: String = row.get(4)?;

        let layers: Layers = serde_json::from_str(&layers_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Strategy {
            created_at: from_db_time(&created_str).unwrap_or_else(|| {
                tracing::warn!(strategy = %id, created_at = %created_str, "invalid created_at, using now");
                chrono::Utc::now()
            }),
            id,
            name: row.get(1)?,
            starting_equity: row.get(2)?,
            layers,
        })
    }
}

impl StrategyRepository for SqliteStrategyRepo {
    fn save_strategy(&self, strategy: &Strategy) -> Result<(), DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        conn.execute(
            "INSERT INTO strategies (id, name, starting_equity, layers, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 starting_equity = excluded.starting_equity,
                 layers = excluded.layers",
            params![
                strategy.id,
                strategy.name,
                strategy.starting_equity,
                serde_json::to_string(&strategy.layers)?,
                to_db_time(&strategy.created_at),
            ],
        )
        .map_err(|e| DomainError::Database(format!("Failed to save strategy: {e}")))?;
        Ok(())
    }

    fn get_strategy(&self, id: &str) -> Result<Option<Strategy>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut stmt = conn.prepare(&format!("SELECT {SELECT_COLS} FROM strategies WHERE id = ?1"))?;
        let mut rows = stmt.query_map(params![id], Self::row_to_strategy)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    fn list_strategies(&self) -> Result<Vec<Strategy>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLS} FROM strategies ORDER BY created_at ASC, id ASC"
        ))?;
        let strategies = stmt
            .query_map([], Self::row_to_strategy)?
            .filter_map(|r| match r {
                Ok(s) => Some(s),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable strategy row");
                    None
                }
            })
            .collect();
        Ok(strategies)
    }

    fn delete_strategy(&self, id: &str) -> Result<usize, DomainError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let tx = conn.transaction()?;
        let trades = tx
            .execute("DELETE FROM trades WHERE strategy_id = ?1", params![id])
            .map_err(|e| DomainError::Database(format!("Failed to delete trades: {e}")))?;
        let rows = tx
            .execute("DELETE FROM strategies WHERE id = ?1", params![id])
            .map_err(|e| DomainError::Database(format!("Failed to delete strategy: {e}")))?;
        if rows == 0 {
            // dropping the transaction rolls back the trade delete
            return Err(DomainError::NotFound(format!("Strategy not found: {id}")));
        }
        tx.commit()?;
        Ok(trades)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::trade::{NewTrade, Selections, Trade};
    use crate::domain::ports::trade_repository::{TradeFilter, TradeRepository};
    use crate::domain::values::trade_direction::TradeDirection;
    use crate::infrastructure::sqlite::migrations::run_migrations;
    use crate::infrastructure::sqlite::trade_repo::SqliteTradeRepo;
    use rusqlite::Connection;
    use std::sync::{Arc, Mutex};

    fn repos() -> (SqliteStrategyRepo, SqliteTradeRepo) {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let shared = Arc::new(Mutex::new(conn));
        (SqliteStrategyRepo::new(shared.clone()), SqliteTradeRepo::new(shared))
    }

    fn trade_for(strategy_id: &str) -> Trade {
        Trade::new(NewTrade {
            time: "2024-03-04T10:00:00Z".parse().unwrap(),
            pair: "ES".into(),
            direction: TradeDirection::Long,
            size: None,
            entry: 5000.0,
            exit: 5001.0,
            pnl: 50.0,
            strategy_id: strategy_id.to_string(),
            selections: Selections::new(),
            reflection: None,
        })
    }

    #[test]
    fn test_delete_cascades_to_trades() {
        let (strategies, trades) = repos();
        let s = Strategy::new("Fades".into(), 1_000.0);
        strategies.save_strategy(&s).unwrap();
        trades.add_trade(&trade_for(&s.id)).unwrap();
        trades.add_trade(&trade_for(&s.id)).unwrap();
        trades.add_trade(&trade_for("strat-other")).unwrap();

        assert_eq!(strategies.delete_strategy(&s.id).unwrap(), 2);
        assert!(strategies.get_strategy(&s.id).unwrap().is_none());
        let left = trades.list_trades(&TradeFilter::default()).unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].strategy_id, "strat-other");
    }

    #[test]
    fn test_failed_delete_keeps_trades() {
        let (strategies, trades) = repos();
        trades.add_trade(&trade_for("strat-missing")).unwrap();

        assert!(matches!(
            strategies.delete_strategy("strat-missing"),
            Err(DomainError::NotFound(_))
        ));
        assert_eq!(trades.list_trades(&TradeFilter::default()).unwrap().len(), 1);
    }
}
