//! API configuration.

use anyhow::bail;

/// Secret used when `ADMIN_JWT_SECRET` is unset outside production.
pub const DEV_ADMIN_JWT_SECRET: &str = "census-dev-secret-change-me";

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Rate limit requests per second, per client IP
    pub rate_limit_rps: u32,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    /// HMAC secret for admin bearer tokens
    pub admin_jwt_secret: String,
    /// Mount point of the participant routes
    pub participants_base_path: String,
    /// Seed the store with the example participant
    pub seed_example_participant: bool,
    /// Expose Prometheus metrics at /metrics
    pub metrics_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            rate_limit_rps: 10,
            max_body_size: 1024 * 1024, // 1MB
            environment: "development".to_string(),
            admin_jwt_secret: DEV_ADMIN_JWT_SECRET.to_string(),
            participants_base_path: "/participants".to_string(),
            seed_example_participant: true,
            metrics_enabled: true,
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: env_parse("API_PORT").unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            rate_limit_rps: env_parse("RATE_LIMIT_RPS").unwrap_or(defaults.rate_limit_rps),
            max_body_size: env_parse("MAX_BODY_SIZE").unwrap_or(defaults.max_body_size),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            admin_jwt_secret: std::env::var("ADMIN_JWT_SECRET")
                .unwrap_or(defaults.admin_jwt_secret),
            participants_base_path: std::env::var("PARTICIPANTS_BASE_PATH")
                .map(|p| normalize_base_path(&p))
                .unwrap_or(defaults.participants_base_path),
            seed_example_participant: env_flag("SEED_EXAMPLE_PARTICIPANT")
                .unwrap_or(defaults.seed_example_participant),
            metrics_enabled: env_flag("METRICS_ENABLED").unwrap_or(defaults.metrics_enabled),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }

    /// Reject settings that are unsafe to serve with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.admin_jwt_secret.is_empty() {
            bail!("ADMIN_JWT_SECRET must not be empty");
        }
        if self.is_production() && self.admin_jwt_secret == DEV_ADMIN_JWT_SECRET {
            bail!("ADMIN_JWT_SECRET must be set in production");
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

fn env_flag(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
}

/// `""`, `"/"` and `"participants/"` become `"/"`, `"/"` and `"/participants"`.
fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", trimmed)
    }
}
