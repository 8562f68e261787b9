use std::env;
use std::str::FromStr;

use crate::errors::{Result, ServiceError};

const DEFAULT_KNOWN_MODES: &str = "10sec,30sec,60sec";

fn parse_var<T>(name: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|e| ServiceError::Internal(format!("Invalid {}: {}", name, e)))
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
}

impl RedisConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "redis" => Ok(StoreBackend::Redis),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub timeout_ms: u64,
    pub max_submit_retries: u32,
    pub lane_timeout_ms: u64,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            backend: parse_var("STORE_BACKEND", "redis")?,
            timeout_ms: parse_var("STORE_TIMEOUT_MS", "2000")?,
            max_submit_retries: parse_var("SUBMIT_MAX_RETRIES", "8")?,
            lane_timeout_ms: parse_var("SUBMIT_LANE_TIMEOUT_MS", "5000")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub known_modes: Vec<String>,
}

impl ServiceConfig {
    pub fn from_env(default_port: u16) -> Result<Self> {
        let known_modes = parse_mode_list(
            &env::var("KNOWN_MODES").unwrap_or_else(|_| DEFAULT_KNOWN_MODES.to_string()),
        );

        if known_modes.is_empty() {
            return Err(ServiceError::Internal(
                "KNOWN_MODES must name at least one mode".to_string(),
            ));
        }

        Ok(Self {
            port: parse_var("HTTP_PORT", &default_port.to_string())?,
            metrics_port: parse_var("METRICS_PORT", "9094")?,
            known_modes,
        })
    }
}

fn parse_mode_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}
