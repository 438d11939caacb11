use std::env;

pub const DEFAULT_DB_PATH: &str = "./tradejournal.db";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct JournalConfig {
    pub db_path: String,
    pub log_level: String,
    /// Create the built-in template strategy on an empty database.
    pub seed_default: bool,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            seed_default: true,
        }
    }
}

impl JournalConfig {
    /// Reads `TRADEJOURNAL_*` variables, after loading a `.env` file if one
    /// is present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            db_path: lookup("TRADEJOURNAL_DB").unwrap_or(defaults.db_path),
            log_level: lookup("TRADEJOURNAL_LOG").unwrap_or(defaults.log_level),
            seed_default: lookup("TRADEJOURNAL_SEED_DEFAULT")
                .map(|v| parse_bool(&v))
                .unwrap_or(defaults.seed_default),
        }
    }
}

fn parse_bool(v: &str) -> bool {
    !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let cfg = JournalConfig::from_lookup(|_| None);
        assert_eq!(cfg, JournalConfig::default());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TRADEJOURNAL_DB", "/tmp/j.db"),
            ("TRADEJOURNAL_LOG", "debug"),
            ("TRADEJOURNAL_SEED_DEFAULT", "off"),
        ]
        .into_iter()
        .collect();
        let cfg = JournalConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.db_path, "/tmp/j.db");
        assert_eq!(cfg.log_level, "debug");
        assert!(!cfg.seed_default);
    }
}
