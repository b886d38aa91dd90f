use std::env;

use auth::AuthenticatorSettings;
use auth::HashingCost;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub hashing: HashingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime as a duration string, e.g. "24h" or "1h30m"
    #[serde(default = "default_expiry")]
    pub expiry: String,
}

fn default_expiry() -> String {
    "24h".to_string()
}

impl JwtConfig {
    /// Parsed token lifetime.
    pub fn ttl(&self) -> Result<Duration, ConfigError> {
        parse_duration(&self.expiry)
            .map_err(|e| ConfigError::Message(format!("jwt.expiry: {}", e)))
    }
}

/// Argon2 work factor. Missing fields fall back to Argon2 defaults.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        let cost = HashingCost::default();
        Self {
            memory_kib: cost.memory_kib,
            iterations: cost.iterations,
            parallelism: cost.parallelism,
        }
    }
}

impl From<&HashingConfig> for HashingCost {
    fn from(config: &HashingConfig) -> Self {
        HashingCost {
            memory_kib: config.memory_kib,
            iterations: config.iterations,
            parallelism: config.parallelism,
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // No prefix: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }

    /// Settings for the shared authenticator.
    ///
    /// # Errors
    /// * Empty signing secret or unparsable token lifetime
    pub fn authenticator_settings(&self) -> Result<AuthenticatorSettings, ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret must be set (JWT__SECRET)".to_string(),
            ));
        }

        Ok(AuthenticatorSettings {
            jwt_secret: self.jwt.secret.as_bytes().to_vec(),
            token_ttl: self.jwt.ttl()?,
            hashing_cost: HashingCost::from(&self.hashing),
        })
    }
}

/// Parse a duration such as `24h`, `90m`, `1h30m` or `3600s`.
///
/// Units are `h`, `m` and `s`; each number must carry a unit. The total
/// must be positive.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut total_seconds: i64 = 0;
    let mut digits = String::new();

    for c in input.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        if digits.is_empty() {
            return Err(format!("expected a number before '{}' in '{}'", c, input));
        }
        let value: i64 = digits
            .parse()
            .map_err(|_| format!("number too large in '{}'", input))?;
        digits.clear();

        let unit_seconds = match c {
            'h' => 3600,
            'm' => 60,
            's' => 1,
            other => return Err(format!("unknown unit '{}' in '{}'", other, input)),
        };

        total_seconds = value
            .checked_mul(unit_seconds)
            .and_then(|seconds| total_seconds.checked_add(seconds))
            .ok_or_else(|| format!("duration too large: '{}'", input))?;
    }

    if !digits.is_empty() {
        return Err(format!("missing unit after '{}' in '{}'", digits, input));
    }
    if total_seconds == 0 {
        return Err("duration must be positive".to_string());
    }

    Duration::try_seconds(total_seconds).ok_or_else(|| format!("duration too large: '{}'", input))
}
