pub mod migrations;
pub mod strategy_repo;
pub mod trade_repo;

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// One connection shared by every repository, so `:memory:` databases see
/// the same tables.
pub type SharedConnection = Arc<Mutex<Connection>>;
