use std::env;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub bind_address: String,
    pub simulated_latency_ms: u64,
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            simulated_latency_ms: 0,
            seed_demo_data: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| {
                    warn!("BIND_ADDRESS not set, using default");
                    defaults.bind_address.clone()
                }),
            simulated_latency_ms: parse_var("SIMULATED_LATENCY_MS", defaults.simulated_latency_ms),
            seed_demo_data: parse_var("SEED_DEMO_DATA", defaults.seed_demo_data),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - bearer tokens cannot be verified");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt_secret.is_empty()
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

fn parse_var<T: std::str::FromStr + std::fmt::Debug>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using default {:?}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}
