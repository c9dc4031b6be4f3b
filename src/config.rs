use anyhow::{Context, Result};

use crate::shortcode::{CodeStrategy, TIMESTAMP_DIGITS};

/// Which `MappingStore` implementation the process should build at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `sqlite` (default) or `memory`
    pub store_backend: StoreBackend,

    /// SQLite connection string, e.g. "sqlite:./linkmap.db"
    pub database_url: String,

    /// Name of the table holding the URL mappings
    pub mapping_table: String,

    /// Host to bind the HTTP server to, e.g. "0.0.0.0"
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// How new short codes are produced
    pub code_strategy: CodeStrategy,

    /// Length of generated short codes
    pub code_length: usize,

    /// How many fresh codes to try when an insert collides
    pub code_attempts: u32,
}

impl AppConfig {
    /// Load configuration from environment variables (populated by dotenvy before this is called).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. `from_env` is the
    /// production entry point; tests pass a map.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let store_backend = match get("STORE_BACKEND").as_deref().map(str::trim) {
            None | Some("") | Some("sqlite") => StoreBackend::Sqlite,
            Some("memory") => StoreBackend::Memory,
            Some(other) => anyhow::bail!("STORE_BACKEND must be 'sqlite' or 'memory', got '{other}'"),
        };

        let mapping_table = get("MAPPING_TABLE")
            .unwrap_or_else(|| "url_mappings".into())
            .trim()
            .to_owned();
        if !is_valid_table_name(&mapping_table) {
            anyhow::bail!(
                "MAPPING_TABLE must be a non-empty identifier of letters, digits and '_', got '{mapping_table}'"
            );
        }

        let port = get("PORT")
            .unwrap_or_else(|| "3000".into())
            .parse::<u16>()
            .context("PORT must be a valid port number (1–65535)")?;

        let code_strategy = get("SHORT_CODE_STRATEGY")
            .unwrap_or_else(|| "random".into())
            .parse::<CodeStrategy>()?;

        let code_length = get("SHORT_CODE_LENGTH")
            .unwrap_or_else(|| "8".into())
            .parse::<usize>()
            .context("SHORT_CODE_LENGTH must be a positive integer")?;
        if !(4..=32).contains(&code_length) {
            anyhow::bail!("SHORT_CODE_LENGTH must be between 4 and 32, got {code_length}");
        }
        if code_strategy == CodeStrategy::Timestamp && code_length > TIMESTAMP_DIGITS {
            anyhow::bail!(
                "SHORT_CODE_LENGTH must be at most {TIMESTAMP_DIGITS} with the timestamp strategy, got {code_length}"
            );
        }

        let code_attempts = get("SHORT_CODE_ATTEMPTS")
            .unwrap_or_else(|| "5".into())
            .parse::<u32>()
            .context("SHORT_CODE_ATTEMPTS must be a positive integer")?;
        if code_attempts == 0 {
            anyhow::bail!("SHORT_CODE_ATTEMPTS must be at least 1");
        }

        Ok(Self {
            store_backend,
            database_url: get("DATABASE_URL").unwrap_or_else(|| "sqlite:./linkmap.db".into()),
            mapping_table,
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            code_strategy,
            code_length,
            code_attempts,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The table name is spliced into SQL, so only plain identifiers are allowed.
pub fn is_valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.store_backend, StoreBackend::Sqlite);
        assert_eq!(config.database_url, "sqlite:./linkmap.db");
        assert_eq!(config.mapping_table, "url_mappings");
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.code_strategy, CodeStrategy::Random);
        assert_eq!(config.code_length, 8);
        assert_eq!(config.code_attempts, 5);
    }

    #[test]
    fn overrides() {
        let config = load(&[
            ("STORE_BACKEND", "memory"),
            ("MAPPING_TABLE", "links_v2"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("SHORT_CODE_STRATEGY", "timestamp"),
            ("SHORT_CODE_LENGTH", "10"),
            ("SHORT_CODE_ATTEMPTS", "2"),
        ])
        .unwrap();
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.mapping_table, "links_v2");
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.code_strategy, CodeStrategy::Timestamp);
        assert_eq!(config.code_length, 10);
        assert_eq!(config.code_attempts, 2);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(load(&[("MAPPING_TABLE", "")]).is_err());
        assert!(load(&[("MAPPING_TABLE", "urls; DROP TABLE x")]).is_err());
        assert!(load(&[("PORT", "70000")]).is_err());
        assert!(load(&[("STORE_BACKEND", "dynamo")]).is_err());
        assert!(load(&[("SHORT_CODE_STRATEGY", "uuid")]).is_err());
        assert!(load(&[("SHORT_CODE_LENGTH", "2")]).is_err());
        assert!(load(&[("SHORT_CODE_ATTEMPTS", "0")]).is_err());
    }

    #[test]
    fn timestamp_strategy_caps_code_length() {
        let at_cap = load(&[("SHORT_CODE_STRATEGY", "timestamp"), ("SHORT_CODE_LENGTH", "19")]);
        assert_eq!(at_cap.unwrap().code_length, 19);

        assert!(load(&[("SHORT_CODE_STRATEGY", "timestamp"), ("SHORT_CODE_LENGTH", "20")]).is_err());
        assert!(load(&[("SHORT_CODE_STRATEGY", "random"), ("SHORT_CODE_LENGTH", "32")]).is_ok());
    }

    #[test]
    fn table_names() {
        assert!(is_valid_table_name("url_mappings"));
        assert!(is_valid_table_name("_t1"));
        assert!(!is_valid_table_name("1t"));
        assert!(!is_valid_table_name("a-b"));
        assert!(!is_valid_table_name(""));
    }
}
