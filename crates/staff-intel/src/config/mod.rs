use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::workflows::staffing::ranking::RankingPolicyError;
use crate::workflows::staffing::scoring::ScoringConfigError;
use crate::workflows::staffing::{
    BalancePolicy, BalancePolicyError, EmergencyPolicy, EmergencyPolicyError, RankingPolicy,
    ScoringConfig,
};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub staffing: StaffingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            staffing: StaffingConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Named defaults, weights, and thresholds for the scoring engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaffingConfig {
    pub scoring: ScoringConfig,
    pub ranking: RankingPolicy,
    pub balance: BalancePolicy,
    pub emergency: EmergencyPolicy,
}

impl StaffingConfig {
    /// Defaults with `STAFFING_*` environment overrides applied, then validated.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(hours) = env_number::<f64>("STAFFING_WEEKLY_TARGET_HOURS")? {
            config.ranking.weekly_target_hours = hours;
            config.balance.target_hours = hours;
        }
        if let Some(threshold) = env_number::<u8>("STAFFING_RECOMMEND_THRESHOLD")? {
            config.ranking.recommend_threshold = threshold;
        }
        if let Some(tolerance) = env_number::<f64>("STAFFING_BALANCE_TOLERANCE_HOURS")? {
            config.balance.tolerance_hours = tolerance;
        }
        if let Some(radius) = env_number::<f64>("STAFFING_PROXIMITY_RADIUS_KM")? {
            config.emergency.proximity_radius_km = radius;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring.validate()?;
        self.ranking.validate()?;
        self.balance.validate()?;
        self.emergency.validate()?;
        Ok(())
    }
}

fn env_number<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
        _ => Ok(None),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
    Scoring(ScoringConfigError),
    Ranking(RankingPolicyError),
    Balance(BalancePolicyError),
    Emergency(EmergencyPolicyError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be numeric (got '{value}')")
            }
            ConfigError::Scoring(err) => write!(f, "invalid scoring configuration: {err}"),
            ConfigError::Ranking(err) => write!(f, "invalid ranking policy: {err}"),
            ConfigError::Balance(err) => write!(f, "invalid hour balance policy: {err}"),
            ConfigError::Emergency(err) => write!(f, "invalid emergency fill policy: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::Scoring(err) => Some(err),
            ConfigError::Ranking(err) => Some(err),
            ConfigError::Balance(err) => Some(err),
            ConfigError::Emergency(err) => Some(err),
        }
    }
}

impl From<ScoringConfigError> for ConfigError {
    fn from(value: ScoringConfigError) -> Self {
        Self::Scoring(value)
    }
}

impl From<RankingPolicyError> for ConfigError {
    fn from(value: RankingPolicyError) -> Self {
        Self::Ranking(value)
    }
}

impl From<BalancePolicyError> for ConfigError {
    fn from(value: BalancePolicyError) -> Self {
        Self::Balance(value)
    }
}

impl From<EmergencyPolicyError> for ConfigError {
    fn from(value: EmergencyPolicyError) -> Self {
        Self::Emergency(value)
    }
}
