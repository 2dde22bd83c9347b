use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::evaluations::scoring::ScoringPolicy;

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
    pub store: StoreConfig,
    pub scoring: ScoringPolicy,
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

        let seed_demo_roster = match env::var("APP_SEED_DEMO") {
            Ok(raw) => parse_flag("APP_SEED_DEMO", &raw)?,
            Err(_) => true,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            store: StoreConfig { seed_demo_roster },
            scoring: load_scoring_policy()?,
        })
    }
}

fn load_scoring_policy() -> Result<ScoringPolicy, ConfigError> {
    let mut policy = ScoringPolicy::default();

    if let Ok(raw) = env::var("SCORING_EFFICIENCY_CAP") {
        policy.efficiency_cap = parse_positive("SCORING_EFFICIENCY_CAP", &raw)?;
    }
    if let Ok(raw) = env::var("SCORING_GOOD_THRESHOLD") {
        policy.good_threshold = parse_positive("SCORING_GOOD_THRESHOLD", &raw)?;
    }
    if let Ok(raw) = env::var("SCORING_BAND_BREAKPOINTS") {
        policy.band_breakpoints = parse_breakpoints(&raw)?;
    }

    Ok(policy)
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
        }),
    }
}

fn parse_positive(key: &'static str, raw: &str) -> Result<f64, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
        .ok_or_else(|| ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
        })
}

fn parse_breakpoints(raw: &str) -> Result<[f64; 4], ConfigError> {
    let invalid = || ConfigError::InvalidBreakpoints(raw.to_string());

    let values = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid())?;

    let breakpoints: [f64; 4] = values.try_into().map_err(|_| invalid())?;
    let descending = breakpoints.windows(2).all(|pair| pair[0] > pair[1]);
    if !descending || breakpoints.iter().any(|value| !value.is_finite()) {
        return Err(invalid());
    }

    Ok(breakpoints)
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

/// What the in-memory store is loaded with at startup.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Load the demo roster next to the rubric criteria.
    pub seed_demo_roster: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidValue { key: &'static str, value: String },
    InvalidBreakpoints(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "{key} has an invalid value '{value}'")
            }
            ConfigError::InvalidBreakpoints(value) => write!(
                f,
                "SCORING_BAND_BREAKPOINTS must be four strictly descending numbers, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidValue { .. }
            | ConfigError::InvalidBreakpoints(_) => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::evaluations::scoring::DEFAULT_GOOD_THRESHOLD;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    /// Held by every test in the crate that reads or writes process env vars.
    pub(crate) fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_SEED_DEMO",
            "SCORING_EFFICIENCY_CAP",
            "SCORING_GOOD_THRESHOLD",
            "SCORING_BAND_BREAKPOINTS",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.store.seed_demo_roster);
        assert_eq!(config.scoring, ScoringPolicy::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn scoring_policy_overrides_apply() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCORING_EFFICIENCY_CAP", "150");
        env::set_var("SCORING_BAND_BREAKPOINTS", "95, 80, 60, 40");
        env::set_var("APP_SEED_DEMO", "off");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.scoring.efficiency_cap, 150.0);
        assert_eq!(config.scoring.good_threshold, DEFAULT_GOOD_THRESHOLD);
        assert_eq!(config.scoring.band_breakpoints, [95.0, 80.0, 60.0, 40.0]);
        assert!(!config.store.seed_demo_roster);
        reset_env();
    }

    #[test]
    fn rejects_unordered_breakpoints() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCORING_BAND_BREAKPOINTS", "50,75,90,30");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidBreakpoints(_))
        ));
        env::set_var("SCORING_BAND_BREAKPOINTS", "90,75,50");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidBreakpoints(_))
        ));
        reset_env();
    }

    #[test]
    fn rejects_non_positive_cap() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCORING_EFFICIENCY_CAP", "-5");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidValue {
                key: "SCORING_EFFICIENCY_CAP",
                ..
            })
        ));
        reset_env();
    }
}
