use crate::domain::error::DomainError;
use crate::domain::values::trade_direction::TradeDirection;
use crate::domain::values::trade_outcome::TradeOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category id -> selected tag texts, in the order they were picked.
pub type Selections = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub time: DateTime<Utc>,
    pub pair: String,
    pub direction: TradeDirection,
    pub size: Option<String>,
    pub entry: f64,
    pub exit: f64,
    pub pnl: f64,
    pub outcome: TradeOutcome,
    pub strategy_id: String,
    #[serde(default)]
    pub selections: Selections,
    pub reflection: Option<String>,
}

/// Fields supplied when logging a new trade. `outcome` is not accepted;
/// it is derived from `pnl`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTrade {
    pub time: DateTime<Utc>,
    pub pair: String,
    pub direction: TradeDirection,
    #[serde(default)]
    pub size: Option<String>,
    pub entry: f64,
    pub exit: f64,
    pub pnl: f64,
    pub strategy_id: String,
    #[serde(default)]
    pub selections: Selections,
    #[serde(default)]
    pub reflection: Option<String>,
}

impl NewTrade {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.pair.trim().is_empty() {
            return Err(DomainError::InvalidInput("pair is required".into()));
        }
        if self.strategy_id.trim().is_empty() {
            return Err(DomainError::InvalidInput("strategy_id is required".into()));
        }
        check_finite("entry", self.entry)?;
        check_finite("exit", self.exit)?;
        check_finite("pnl", self.pnl)
    }
}

/// Partial edit of an existing trade; `None` leaves the field untouched.
/// The optional text fields take `Some(None)` (JSON `null`) to clear them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TradeUpdate {
    pub time: Option<DateTime<Utc>>,
    pub pair: Option<String>,
    pub direction: Option<TradeDirection>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub size: Option<Option<String>>,
    pub entry: Option<f64>,
    pub exit: Option<f64>,
    pub pnl: Option<f64>,
    pub strategy_id: Option<String>,
    pub selections: Option<Selections>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub reflection: Option<Option<String>>,
}

impl Trade {
    pub fn new(input: NewTrade) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            time: input.time,
            pair: input.pair.trim().to_string(),
            direction: input.direction,
            size: input.size,
            entry: input.entry,
            exit: input.exit,
            pnl: input.pnl,
            outcome: TradeOutcome::from_pnl(input.pnl),
            strategy_id: input.strategy_id,
            selections: input.selections,
            reflection: input.reflection,
        }
    }

    /// Applies an edit in place and re-derives the outcome. Nothing is
    /// changed if any supplied field is invalid.
    pub fn apply(&mut self, update: TradeUpdate) -> Result<(), DomainError> {
        if let Some(pair) = &update.pair {
            if pair.trim().is_empty() {
                return Err(DomainError::InvalidInput("pair is required".into()));
            }
        }
        if let Some(strategy_id) = &update.strategy_id {
            if strategy_id.trim().is_empty() {
                return Err(DomainError::InvalidInput("strategy_id is required".into()));
            }
        }
        for (field, value) in [("entry", update.entry), ("exit", update.exit), ("pnl", update.pnl)] {
            if let Some(v) = value {
                check_finite(field, v)?;
            }
        }

        if let Some(pair) = update.pair {
            self.pair = pair.trim().to_string();
        }
        if let Some(entry) = update.entry {
            self.entry = entry;
        }
        if let Some(exit) = update.exit {
            self.exit = exit;
        }
        if let Some(pnl) = update.pnl {
            self.pnl = pnl;
        }
        if let Some(time) = update.time {
            self.time = time;
        }
        if let Some(direction) = update.direction {
            self.direction = direction;
        }
        if let Some(size) = update.size {
            self.size = size;
        }
        if let Some(strategy_id) = update.strategy_id {
            self.strategy_id = strategy_id;
        }
        if let Some(selections) = update.selections {
            self.selections = selections;
        }
        if let Some(reflection) = update.reflection {
            self.reflection = reflection;
        }
        self.refresh_outcome();
        Ok(())
    }

    pub fn refresh_outcome(&mut self) {
        self.outcome = TradeOutcome::from_pnl(self.pnl);
    }

    pub fn is_gain(&self) -> bool {
        self.pnl >= 0.0
    }
}

fn check_finite(field: &str, value: f64) -> Result<(), DomainError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DomainError::InvalidInput(format!("{field} must be a finite number")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_trade(pnl: f64) -> NewTrade {
        NewTrade {
            time: "2024-02-28T14:20:00Z".parse().unwrap(),
            pair: " NQ ".into(),
            direction: TradeDirection::Short,
            size: Some("1.5 Lot".into()),
            entry: 17850.25,
            exit: 17900.50,
            pnl,
            strategy_id: "strat-default-sr".into(),
            selections: Selections::new(),
            reflection: None,
        }
    }

    #[test]
    fn test_new_derives_outcome() {
        let t = Trade::new(new_trade(-450.0));
        assert_eq!(t.outcome, TradeOutcome::Loss);
        assert_eq!(t.pair, "NQ");
        assert!(!t.id.is_empty());

        let flat = Trade::new(new_trade(0.0));
        assert_eq!(flat.outcome, TradeOutcome::Gain);
    }

    #[test]
    fn test_apply_recomputes_outcome() {
        let mut t = Trade::new(new_trade(120.0));
        t.apply(TradeUpdate {
            pnl: Some(-30.0),
            reflection: Some(Some("Moved stop too late".into())),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(t.outcome, TradeOutcome::Loss);
        assert_eq!(t.reflection.as_deref(), Some("Moved stop too late"));
        assert_eq!(t.entry, 17850.25);
    }

    #[test]
    fn test_update_json_clears_optional_fields() {
        let mut t = Trade::new(new_trade(10.0));
        t.reflection = Some("Chased the open".into());

        let untouched: TradeUpdate = serde_json::from_str(r#"{"pnl": 12.0}"#).unwrap();
        assert!(untouched.size.is_none());
        t.apply(untouched).unwrap();
        assert_eq!(t.size.as_deref(), Some("1.5 Lot"));
        assert_eq!(t.reflection.as_deref(), Some("Chased the open"));

        let clear: TradeUpdate =
            serde_json::from_str(r#"{"size": null, "reflection": null}"#).unwrap();
        assert_eq!(clear.size, Some(None));
        t.apply(clear).unwrap();
        assert!(t.size.is_none());
        assert!(t.reflection.is_none());

        let set: TradeUpdate = serde_json::from_str(r#"{"size": "2 Lot"}"#).unwrap();
        t.apply(set).unwrap();
        assert_eq!(t.size.as_deref(), Some("2 Lot"));
    }

    #[test]
    fn test_apply_rejects_non_finite() {
        let mut t = Trade::new(new_trade(10.0));
        let err = t
            .apply(TradeUpdate {
                pair: Some("ES".into()),
                pnl: Some(f64::NAN),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert_eq!(t.pnl, 10.0);
        assert_eq!(t.pair, "NQ");
    }

    #[test]
    fn test_validate() {
        assert!(new_trade(1.0).validate().is_ok());

        let mut missing_pair = new_trade(1.0);
        missing_pair.pair = "  ".into();
        assert!(missing_pair.validate().is_err());

        let mut inf = new_trade(1.0);
        inf.entry = f64::INFINITY;
        assert!(inf.validate().is_err());
    }

    #[test]
    fn test_deserialize_ignores_stale_outcome_field() {
        let json = r#"{
            "time": "2024-02-27T09:45:00Z",
            "pair": "ES",
            "direction": "LONG",
            "entry": 5000.0,
            "exit": 5010.0,
            "pnl": 500.0,
            "strategy_id": "strat-default-sr",
            "selections": {"cat-instrument": ["ES"]},
            "outcome": "loss"
        }"#;
        let input: NewTrade = serde_json::from_str(json).unwrap();
        let t = Trade::new(input);
        assert_eq!(t.outcome, TradeOutcome::Gain);
        assert_eq!(t.selections["cat-instrument"], vec!["ES".to_string()]);
    }
}
