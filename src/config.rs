use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use dotenvy::dotenv;
use strum_macros::{AsRefStr, EnumString};

use crate::checkin::cooldown::MAX_COOLDOWN_MINUTES;
use crate::checkin::{CooldownPolicy, CooldownSettings};

/// Where admitted check-ins are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreBackend {
    Mysql,
    /// Process-local, lost on restart. For local runs without a database.
    Memory,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub store_backend: StoreBackend,
    /// Required when `store_backend` is `mysql`.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub server_addr: String,
    pub api_prefix: String,
    pub log_dir: String,

    // Rate limiting
    pub rate_check_in_per_min: u32,
    pub rate_lookup_per_min: u32,

    // Admission rules
    pub cooldown_minutes: i64,
    pub cooldown_policy: CooldownPolicy,
    pub student_lock_idle_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).with_context(|| format!("{key} must be set"));

        let config = Self {
            server_addr: required("SERVER_ADDR")?,
            store_backend: parse_or(&lookup, "STORE_BACKEND", StoreBackend::Mysql)?,
            database_url: lookup("DATABASE_URL"),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            api_prefix: lookup("API_PREFIX").unwrap_or_else(|| "/api".to_string()),
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),

            rate_check_in_per_min: parse_or(&lookup, "RATE_CHECK_IN_PER_MIN", 120)?,
            rate_lookup_per_min: parse_or(&lookup, "RATE_LOOKUP_PER_MIN", 600)?,

            cooldown_minutes: parse_or(&lookup, "COOLDOWN_MINUTES", 5)?, // default 5 min
            cooldown_policy: parse_or(&lookup, "COOLDOWN_POLICY", CooldownPolicy::Nearest)?,
            student_lock_idle_secs: parse_or(&lookup, "STUDENT_LOCK_IDLE_SECS", 600)?,
        };

        if config.store_backend == StoreBackend::Mysql && config.database_url.is_none() {
            return Err(anyhow!("DATABASE_URL must be set"));
        }

        if !(0..=MAX_COOLDOWN_MINUTES).contains(&config.cooldown_minutes) {
            return Err(anyhow!(
                "COOLDOWN_MINUTES must be between 0 and {MAX_COOLDOWN_MINUTES}"
            ));
        }

        Ok(config)
    }

    pub fn cooldown(&self) -> CooldownSettings {
        CooldownSettings::new(self.cooldown_minutes, self.cooldown_policy)
    }

    pub fn student_lock_idle(&self) -> Duration {
        Duration::from_secs(self.student_lock_idle_secs)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("invalid {key}={raw:?}: {e}")),
        None => Ok(default),
    }
}
