use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result of a closed trade. Always derived from the sign of the P&L;
/// a flat trade (`pnl == 0`) counts as a gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeOutcome {
    Gain,
    Loss,
}

impl TradeOutcome {
    pub fn from_pnl(pnl: f64) -> Self {
        if pnl >= 0.0 {
            TradeOutcome::Gain
        } else {
            TradeOutcome::Loss
        }
    }

    pub fn is_gain(&self) -> bool {
        matches!(self, TradeOutcome::Gain)
    }
}

impl fmt::Display for TradeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeOutcome::Gain => write!(f, "gain"),
            TradeOutcome::Loss => write!(f, "loss"),
        }
    }
}

impl FromStr for TradeOutcome {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gain" | "win" => Ok(TradeOutcome::Gain),
            "loss" => Ok(TradeOutcome::Loss),
            _ => Err(format!("Unknown trade outcome: {s}")),
        }
    }
}
