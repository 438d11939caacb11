use crate::domain::error::DomainError;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), DomainError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS strategies (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            starting_equity REAL NOT NULL,
            layers TEXT NOT NULL DEFAULT '{}',
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS trades (
            id TEXT PRIMARY KEY,
            time TEXT NOT NULL,
            pair TEXT NOT NULL,
            direction TEXT NOT NULL,
            size TEXT,
            entry REAL NOT NULL,
            exit REAL NOT NULL,
            pnl REAL NOT NULL,
            outcome TEXT NOT NULL,
            strategy_id TEXT NOT NULL,
            selections TEXT NOT NULL DEFAULT '{}',
            reflection TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_trades_strategy ON trades(strategy_id);
        CREATE INDEX IF NOT EXISTS idx_trades_time ON trades(time);
        CREATE INDEX IF NOT EXISTS idx_strategies_created ON strategies(created_at);
        "
    ).map_err(|e| DomainError::Database(format!("Migration failed: {e}")))
}
