use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How many tags a category is meant to record per trade.
/// `Single` is advisory; stored selections are not truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionType {
    #[default]
    Single,
    Multi,
}

impl fmt::Display for SelectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionType::Single => write!(f, "single"),
            SelectionType::Multi => write!(f, "multi"),
        }
    }
}

impl FromStr for SelectionType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" => Ok(SelectionType::Single),
            "multi" | "multiple" => Ok(SelectionType::Multi),
            _ => Err(format!("Unknown selection type: {s}")),
        }
    }
}
