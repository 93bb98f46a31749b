use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub leaderboards_path: String,
    /// When set, rows come from this HTTP upstream instead of the local store.
    pub feed_url: Option<String>,
    pub feed_timeout: Duration,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = parse_or_default::<u16>(&env_map, "PORT", 8080, "must be a valid u16")?;

        let database_path = required(&env_map, "DATABASE_PATH")?;
        let leaderboards_path = required(&env_map, "LEADERBOARDS_PATH")?;

        let feed_url = env_map
            .get("FEED_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let feed_timeout_ms = parse_or_default::<u64>(
            &env_map,
            "FEED_TIMEOUT_MS",
            5000,
            "must be a positive number of milliseconds",
        )?;
        if feed_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "FEED_TIMEOUT_MS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let default_page_size =
            parse_or_default::<u32>(&env_map, "DEFAULT_PAGE_SIZE", 50, "must be a valid u32")?;
        let max_page_size =
            parse_or_default::<u32>(&env_map, "MAX_PAGE_SIZE", 200, "must be a valid u32")?;

        if default_page_size == 0 {
            return Err(ConfigError::InvalidValue(
                "DEFAULT_PAGE_SIZE".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        if max_page_size < default_page_size {
            return Err(ConfigError::InvalidValue(
                "MAX_PAGE_SIZE".to_string(),
                format!("must be >= DEFAULT_PAGE_SIZE ({})", default_page_size),
            ));
        }

        Ok(Config {
            port,
            database_path,
            leaderboards_path,
            feed_url,
            feed_timeout: Duration::from_millis(feed_timeout_ms),
            default_page_size,
            max_page_size,
        })
    }
}

fn required(env_map: &HashMap<String, String>, key: &str) -> Result<String, ConfigError> {
    env_map
        .get(key)
        .cloned()
        .ok_or_else(|| ConfigError::MissingEnv(key.to_string()))
}

fn parse_or_default<T: std::str::FromStr>(
    env_map: &HashMap<String, String>,
    key: &str,
    default: T,
    hint: &str,
) -> Result<T, ConfigError> {
    match env_map.get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue(key.to_string(), hint.to_string())),
    }
}
