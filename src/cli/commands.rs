use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tradejournal", about = "Trading journal with tag performance analytics")]
pub struct Cli {
    /// SQLite database path
    #[arg(long, global = true, env = "TRADEJOURNAL_DB")]
    pub db: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a strategy (taxonomy) with an instrument category in layer 1
    StrategyCreate {
        name: String,
        #[arg(long, default_value = "10000")]
        starting_equity: f64,
    },
    /// Rename a strategy or change its starting equity
    StrategyEdit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        starting_equity: Option<f64>,
    },
    /// List strategies
    Strategies,
    /// Show one strategy with its layers
    Strategy { id: String },
    /// Delete a strategy and all of its trades
    StrategyDelete { id: String },
    /// Add a category to a strategy layer
    CategoryAdd {
        strategy_id: String,
        /// Layer (layer1..layer4, or identity, logic, risk, reflection)
        layer: String,
        name: String,
        /// Allow several tags per trade
        #[arg(long)]
        multi: bool,
    },
    /// Remove a category (logged trades keep their selections)
    CategoryRemove {
        strategy_id: String,
        category_id: String,
    },
    /// Add a tag to a category
    TagAdd {
        strategy_id: String,
        category_id: String,
        text: String,
        #[arg(long, default_value = "#64748b")]
        color: String,
    },
    /// Remove a tag from a category (logged trades keep it)
    TagRemove {
        strategy_id: String,
        category_id: String,
        text: String,
    },
    /// Switch a category between single and multi select
    CategoryMode {
        strategy_id: String,
        category_id: String,
        /// single or multi
        mode: String,
    },
    /// Log a trade
    TradeAdd {
        /// JSON with time, pair, direction, entry, exit, pnl, strategy_id, selections, size, reflection
        json: String,
    },
    /// Edit a trade
    TradeEdit {
        id: String,
        /// JSON with any subset of the trade-add fields
        json: String,
    },
    /// Delete a trade
    TradeDelete { id: String },
    /// List trades, newest first
    Trades {
        #[arg(long)]
        strategy: Option<String>,
        #[arg(long, default_value = "50")]
        limit: usize,
        /// Start of date range (YYYY-MM-DD or RFC3339)
        #[arg(long)]
        from: Option<String>,
        /// End of date range (YYYY-MM-DD or RFC3339)
        #[arg(long)]
        to: Option<String>,
    },
    /// Per-tag performance with the per-layer leaderboard
    TagStats {
        strategy_id: String,
        /// all, or a layer (layer1..layer4)
        #[arg(long, default_value = "all")]
        layer: String,
    },
    /// Best tag per layer (minimum 2 trades)
    Leaderboard { strategy_id: String },
    /// P&L by day of week (UTC)
    Weekdays { strategy_id: String },
    /// Win rate, profit factor and average risk:reward
    Summary {
        #[arg(long)]
        strategy: Option<String>,
    },
    /// Running equity after each trade
    Equity { strategy_id: String },
    /// Daily P&L for a month (UTC dates)
    Calendar {
        strategy_id: String,
        /// Month as YYYY-MM
        month: String,
    },
    /// Win rate per strategy across the whole journal
    StrategyWinRates,
}
