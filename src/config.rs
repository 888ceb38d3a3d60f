use std::env;
use std::str::FromStr;
use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Minutes searched on either side of the requested time.
    pub search_window_min: u32,
    /// Spacing of the search grid in minutes.
    pub search_step_min: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let config = Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://availability.db?mode=rwc".to_string()),
            port: parse_var("PORT", 3000)?,
            search_window_min: parse_var("SEARCH_WINDOW_MINUTES", 60)?,
            search_step_min: parse_var("SEARCH_STEP_MINUTES", 30)?,
        };

        if config.search_step_min == 0 || config.search_step_min > 1440 {
            return Err(AppError::Config("SEARCH_STEP_MINUTES must be between 1 and 1440".into()));
        }

        Ok(config)
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse()
            .map_err(|_| AppError::Config(format!("{} must be a number, got '{}'", key, raw))),
        Err(_) => Ok(default),
    }
}
