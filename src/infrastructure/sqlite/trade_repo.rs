use crate::domain::entities::trade::{Selections, Trade};
use crate::domain::error::DomainError;
use crate::domain::ports::trade_repository::*;
use crate::domain::values::trade_direction::TradeDirection;
use crate::domain::values::trade_outcome::TradeOutcome;
use crate::infrastructure::sqlite::SharedConnection;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::params;

const SELECT_COLS: &str =
    "id, time, pair, direction, size, entry, exit, pnl, strategy_id, selections, reflection";

pub struct SqliteTradeRepo {
    conn: SharedConnection,
}

/// Fixed-width UTC timestamps with full nanosecond precision, so text
/// comparison in SQL matches time order and reloads are lossless.
pub(crate) fn to_db_time(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn from_db_time(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

impl SqliteTradeRepo {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    fn row_to_trade(row: &rusqlite::Row) -> Result<Trade, rusqlite::Error> {
        let id: String = row.get(0)?;
        let time_str: String = row.get(1)?;
        let dir_str: String = row.get(3)?;
        let selections_str: String = row.get(9)?;
        let pnl: f64 = row.get(7)?;

        let time = from_db_time(&time_str).ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(1, format!("time '{time_str}'"), rusqlite::types::Type::Text)
        })?;
        let direction: TradeDirection = dir_str.parse().unwrap_or_else(|_| {
            tracing::warn!(trade = %id, direction = %dir_str, "invalid direction, defaulting to long");
            TradeDirection::Long
        });
        let selections: Selections = serde_json::from_str(&selections_str).unwrap_or_else(|e| {
            tracing::warn!(trade = %id, error = %e, "unreadable selections, treating as empty");
            Selections::new()
        });

        Ok(Trade {
            id,
            time,
            pair: row.get(2)?,
            direction,
            size: row.get(4)?,
            entry: row.get(5)?,
            exit: row.get(6)?,
            pnl,
            // stored outcome is informational only
            outcome: TradeOutcome::from_pnl(pnl),
            strategy_id: row.get(8)?,
            selections,
            reflection: row.get(10)?,
        })
    }

    fn collect(rows: impl Iterator<Item = Result<Trade, rusqlite::Error>>) -> Vec<Trade> {
        rows.filter_map(|r| match r {
            Ok(t) => Some(t),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable trade row");
                None
            }
        })
        .collect()
    }
}

impl TradeRepository for SqliteTradeRepo {
    fn add_trade(&self, trade: &Trade) -> Result<(), DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        conn.execute(
            "INSERT INTO trades (id, time, pair, direction, size, entry, exit, pnl, outcome, strategy_id, selections, reflection)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                trade.id,
                to_db_time(&trade.time),
                trade.pair,
                trade.direction.to_string(),
                trade.size,
                trade.entry,
                trade.exit,
                trade.pnl,
                TradeOutcome::from_pnl(trade.pnl).to_string(),
                trade.strategy_id,
                serde_json::to_string(&trade.selections)?,
                trade.reflection,
            ],
        ).map_err(|e| DomainError::Database(format!("Failed to add trade: {e}")))?;
        Ok(())
    }

    fn update_trade(&self, trade: &Trade) -> Result<(), DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let rows = conn.execute(
            "UPDATE trades SET time = ?1, pair = ?2, direction = ?3, size = ?4, entry = ?5, exit = ?6,
                 pnl = ?7, outcome = ?8, strategy_id = ?9, selections = ?10, reflection = ?11
             WHERE id = ?12",
            params![
                to_db_time(&trade.time),
                trade.pair,
                trade.direction.to_string(),
                trade.size,
                trade.entry,
                trade.exit,
                trade.pnl,
                TradeOutcome::from_pnl(trade.pnl).to_string(),
                trade.strategy_id,
                serde_json::to_string(&trade.selections)?,
                trade.reflection,
                trade.id,
            ],
        ).map_err(|e| DomainError::Database(format!("Failed to update trade: {e}")))?;
        if rows == 0 {
            return Err(DomainError::NotFound(format!("Trade not found: {}", trade.id)));
        }
        Ok(())
    }

    fn delete_trade(&self, id: &str) -> Result<(), DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let rows = conn
            .execute("DELETE FROM trades WHERE id = ?1", params![id])
            .map_err(|e| DomainError::Database(format!("Failed to delete trade: {e}")))?;
        if rows == 0 {
            return Err(DomainError::NotFound(format!("Trade not found: {id}")));
        }
        Ok(())
    }

    fn get_trade(&self, id: &str) -> Result<Option<Trade>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut stmt = conn.prepare(&format!("SELECT {SELECT_COLS} FROM trades WHERE id = ?1"))?;
        let mut rows = stmt.query_map(params![id], Self::row_to_trade)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    fn list_trades(&self, filter: &TradeFilter) -> Result<Vec<Trade>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut sql = format!("SELECT {SELECT_COLS} FROM trades WHERE 1=1");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(strategy_id) = &filter.strategy_id {
            sql.push_str(&format!(" AND strategy_id = ?{}", param_values.len() + 1));
            param_values.push(Box::new(strategy_id.clone()));
        }
        if let Some(since) = &filter.since {
            sql.push_str(&format!(" AND time >= ?{}", param_values.len() + 1));
            param_values.push(Box::new(to_db_time(since)));
        }
        if let Some(until) = &filter.until {
            sql.push_str(&format!(" AND time <= ?{}", param_values.len() + 1));
            param_values.push(Box::new(to_db_time(until)));
        }
        sql.push_str(" ORDER BY time DESC, id ASC");
        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT ?{}", param_values.len() + 1));
            param_values.push(Box::new(limit as i64));
        }

        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_refs.as_slice(), Self::row_to_trade)?;
        Ok(Self::collect(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_time_keeps_sub_millisecond_precision() {
        let t: DateTime<Utc> = "2024-03-04T14:30:00.123456789Z".parse().unwrap();
        let stored = to_db_time(&t);
        assert_eq!(stored, "2024-03-04T14:30:00.123456789Z");
        assert_eq!(from_db_time(&stored), Some(t));
    }

    #[test]
    fn test_db_time_sorts_as_text() {
        let times = [
            "2024-03-04T14:30:00Z",
            "2024-03-04T14:30:00.000001Z",
            "2024-03-04T14:30:00.5Z",
            "2024-03-04T14:30:01Z",
        ];
        let stored: Vec<String> = times
            .iter()
            .map(|s| to_db_time(&s.parse::<DateTime<Utc>>().unwrap()))
            .collect();
        let mut sorted = stored.clone();
        sorted.sort();
        assert_eq!(stored, sorted);
    }
}
