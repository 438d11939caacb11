use clap::Parser;
use serde::Serialize;
use serde_json::json;
use tradejournal::cli::commands::{Cli, Commands};
use tradejournal::config::JournalConfig;
use tradejournal::domain::entities::trade::{NewTrade, TradeUpdate};
use tradejournal::domain::error::DomainError;
use tradejournal::domain::ports::trade_repository::TradeFilter;
use tradejournal::domain::values::layer::{LayerFilter, LayerKey};
use tradejournal::domain::values::selection_type::SelectionType;
use tradejournal::TradeJournal;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let cli = Cli::parse();
    let mut config = JournalConfig::from_env();
    if let Some(db) = cli.db.clone() {
        config.db_path = db;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let journal = match TradeJournal::from_config(&config) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error opening journal: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(&journal, cli.command) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_command(journal: &TradeJournal, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::StrategyCreate {
            name,
            starting_equity,
        } => {
            let strategy = journal.strategy_create(name, starting_equity)?;
            print_json(&strategy)?;
        }
        Commands::StrategyEdit {
            id,
            name,
            starting_equity,
        } => {
            let strategy = journal.strategy_update(&id, name, starting_equity)?;
            print_json(&strategy)?;
        }
        Commands::Strategies => {
            let listing: Vec<serde_json::Value> = journal
                .strategy_list()?
                .iter()
                .map(|s| {
                    let layers: Vec<serde_json::Value> = LayerKey::ALL
                        .into_iter()
                        .map(|key| {
                            let names: Vec<&str> = s.layer(key).iter().map(|c| c.name.as_str()).collect();
                            json!({ "layer": key, "title": key.title(), "categories": names })
                        })
                        .collect();
                    json!({
                        "id": s.id,
                        "name": s.name,
                        "starting_equity": s.starting_equity,
                        "layers": layers,
                    })
                })
                .collect();
            print_json(&listing)?;
        }
        Commands::Strategy { id } => {
            let strategy = journal
                .strategy_get(&id)?
                .ok_or_else(|| DomainError::NotFound(format!("Strategy not found: {id}")))?;
            print_json(&strategy)?;
        }
        Commands::StrategyDelete { id } => {
            let removed = journal.strategy_delete(&id)?;
            print_json(&json!({ "deleted": id, "trades_removed": removed }))?;
        }
        Commands::CategoryAdd {
            strategy_id,
            layer,
            name,
            multi,
        } => {
            let layer: LayerKey = layer.parse().map_err(DomainError::Parse)?;
            let selection_type = if multi {
                SelectionType::Multi
            } else {
                SelectionType::Single
            };
            let (strategy, category_id) = journal.category_add(&strategy_id, layer, &name, selection_type)?;
            print_json(&strategy.category(&category_id))?;
        }
        Commands::CategoryRemove {
            strategy_id,
            category_id,
        } => {
            journal.category_remove(&strategy_id, &category_id)?;
            print_json(&json!({ "deleted": category_id }))?;
        }
        Commands::CategoryMode {
            strategy_id,
            category_id,
            mode,
        } => {
            let selection_type: SelectionType = mode.parse().map_err(DomainError::Parse)?;
            let strategy = journal.category_set_selection_type(&strategy_id, &category_id, selection_type)?;
            print_json(&strategy.category(&category_id))?;
        }
        Commands::TagAdd {
            strategy_id,
            category_id,
            text,
            color,
        } => {
            let strategy = journal.tag_add(&strategy_id, &category_id, &text, &color)?;
            let category = strategy.category(&category_id);
            print_json(&category)?;
        }
        Commands::TagRemove {
            strategy_id,
            category_id,
            text,
        } => {
            let strategy = journal.tag_remove(&strategy_id, &category_id, &text)?;
            print_json(&strategy.category(&category_id))?;
        }
        Commands::TradeAdd { json } => {
            let input: NewTrade = serde_json::from_str(&json)?;
            let trade = journal.trade_add(input)?;
            print_json(&trade)?;
        }
        Commands::TradeEdit { id, json } => {
            let update: TradeUpdate = serde_json::from_str(&json)?;
            let trade = journal.trade_update(&id, update)?;
            print_json(&trade)?;
        }
        Commands::TradeDelete { id } => {
            journal.trade_delete(&id)?;
            print_json(&json!({ "deleted": id }))?;
        }
        Commands::Trades {
            strategy,
            limit,
            from,
            to,
        } => {
            let filter = TradeFilter {
                strategy_id: strategy,
                since: parse_date(&from, false)?,
                until: parse_date(&to, true)?,
                limit: Some(limit),
            };
            let trades = journal.trade_list(&filter)?;
            print_json(&trades)?;
        }
        Commands::TagStats { strategy_id, layer } => {
            let layer_filter: LayerFilter = layer.parse().map_err(DomainError::Parse)?;
            let report = journal.tag_report(&strategy_id, layer_filter)?;
            print_json(&report)?;
        }
        Commands::Leaderboard { strategy_id } => {
            let report = journal.tag_report(&strategy_id, LayerFilter::All)?;
            print_json(&report.leaderboard)?;
        }
        Commands::Weekdays { strategy_id } => {
            let days = journal.weekdays(&strategy_id)?;
            print_json(&days)?;
        }
        Commands::Summary { strategy } => {
            let summary = journal.summary(strategy.as_deref())?;
            print_json(&summary)?;
        }
        Commands::Equity { strategy_id } => {
            let curve = journal.equity_curve(&strategy_id)?;
            print_json(&curve)?;
        }
        Commands::Calendar { strategy_id, month } => {
            let (year, month) = parse_month(&month)?;
            let days = journal.calendar(&strategy_id, year, month)?;
            print_json(&days)?;
        }
        Commands::StrategyWinRates => {
            let rates = journal.strategy_win_rates()?;
            print_json(&rates)?;
        }
    }
    Ok(())
}

/// Accepts RFC3339 or a bare date. A bare date used as an upper bound
/// covers the whole day.
fn parse_date(
    s: &Option<String>,
    end_of_day: bool,
) -> Result<Option<chrono::DateTime<chrono::Utc>>, DomainError> {
    match s {
        None => Ok(None),
        Some(s) => {
            if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
                return Ok(Some(dt.with_timezone(&chrono::Utc)));
            }
            if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                let time = if end_of_day {
                    date.and_hms_milli_opt(23, 59, 59, 999)
                } else {
                    date.and_hms_opt(0, 0, 0)
                };
                let dt = time.ok_or_else(|| DomainError::Parse(format!("Invalid date: {s}")))?;
                return Ok(Some(dt.and_utc()));
            }
            Err(DomainError::Parse(format!(
                "Invalid date format: {s}. Use YYYY-MM-DD or RFC3339"
            )))
        }
    }
}

fn parse_month(s: &str) -> Result<(i32, u32), DomainError> {
    let (year, month) = s
        .split_once('-')
        .ok_or_else(|| DomainError::Parse(format!("Invalid month: {s}. Use YYYY-MM")))?;
    let year: i32 = year
        .parse()
        .map_err(|_| DomainError::Parse(format!("Invalid year in {s}")))?;
    let month: u32 = month
        .parse()
        .map_err(|_| DomainError::Parse(format!("Invalid month in {s}")))?;
    Ok((year, month))
}
