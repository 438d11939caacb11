use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeDirection {
    Long,
    Short,
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeDirection::Long => write!(f, "long"),
            TradeDirection::Short => write!(f, "short"),
        }
    }
}

impl FromStr for TradeDirection {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "long" | "buy" => Ok(TradeDirection::Long),
            "short" | "sell" => Ok(TradeDirection::Short),
            _ => Err(format!("Unknown trade direction: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("LONG".parse::<TradeDirection>().unwrap(), TradeDirection::Long);
        assert_eq!("Short".parse::<TradeDirection>().unwrap(), TradeDirection::Short);
        assert!("sideways".parse::<TradeDirection>().is_err());
    }

    #[test]
    fn test_serde_uses_uppercase() {
        let json = serde_json::to_string(&TradeDirection::Short).unwrap();
        assert_eq!(json, "\"SHORT\"");
        let back: TradeDirection = serde_json::from_str("\"LONG\"").unwrap();
        assert_eq!(back, TradeDirection::Long);
    }
}
