// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables such as `WARDEN__AUTH__SECRET` or
//! `WARDEN__RATE_LIMIT__MAX_REQUESTS`.
use crate::auth::password::{PasswordRequirements, DEFAULT_HASH_LOG_N};
use crate::auth::SigningSecret;
use anyhow::{bail, Context, Result};
use chrono::Duration;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "WARDEN";

/// Default config file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config/default.toml";

/// Shortest accepted signing secret, in bytes
pub const MIN_SECRET_LENGTH: usize = 32;

/// Longest accepted token lifetime (ten years)
pub const MAX_TOKEN_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Longest accepted rate-limit window (one day)
pub const MAX_WINDOW_SECS: u64 = 24 * 60 * 60;

/// Whole seconds as a signed duration, saturating at `Duration::MAX`
fn seconds(secs: u64) -> Duration {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub auth: AuthSettings,
    /// Gate in front of the protected API surface
    pub rate_limit: RateLimitSettings,
    /// Gate in front of register/login/refresh
    pub auth_rate_limit: RateLimitSettings,
    pub password: PasswordSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Answer CORS preflights for any origin
    pub cors_allow_any_origin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Root directory of the flat-file user store
    pub path: PathBuf,
}

/// Token signing and lifetimes
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Symmetric signing secret; must be supplied by the deployment
    pub secret: String,
    /// Lifetime of access tokens minted by the generic path (refresh exchange)
    pub access_ttl_secs: u64,
    /// Lifetime of access tokens handed out at login and registration
    pub session_access_ttl_secs: u64,
    pub refresh_ttl_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    pub window_secs: u64,
    pub max_requests: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordSettings {
    #[serde(flatten)]
    pub requirements: PasswordRequirements,
    /// scrypt cost, `N = 2^hash_log_n`
    pub hash_log_n: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, overridden by `RUST_LOG` when set
    pub level: String,
    pub format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            storage: StorageSettings::default(),
            auth: AuthSettings::default(),
            rate_limit: RateLimitSettings::default(),
            auth_rate_limit: RateLimitSettings::auth_default(),
            password: PasswordSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_allow_any_origin: false,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data"),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            secret: String::new(),
            access_ttl_secs: 15 * 60,
            session_access_ttl_secs: 30 * 60,
            refresh_ttl_secs: 7 * 24 * 60 * 60,
        }
    }
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("secret", &"[REDACTED]")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("session_access_ttl_secs", &self.session_access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .finish()
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            window_secs: 60,
            max_requests: 30,
        }
    }
}

impl RateLimitSettings {
    pub fn window(&self) -> Duration {
        seconds(self.window_secs)
    }

    /// Stricter defaults for the credential entry points
    pub fn auth_default() -> Self {
        Self {
            window_secs: 60,
            max_requests: 10,
        }
    }
}

impl Default for PasswordSettings {
    fn default() -> Self {
        Self {
            requirements: PasswordRequirements::default(),
            hash_log_n: DEFAULT_HASH_LOG_N,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl AuthSettings {
    pub fn signing_secret(&self) -> SigningSecret {
        SigningSecret::from(self.secret.as_str())
    }

    pub fn access_ttl(&self) -> Duration {
        seconds(self.access_ttl_secs)
    }

    pub fn session_access_ttl(&self) -> Duration {
        seconds(self.session_access_ttl_secs)
    }

    pub fn refresh_ttl(&self) -> Duration {
        seconds(self.refresh_ttl_secs)
    }
}

impl Settings {
    /// Load from `config/default.toml` (if present) and `WARDEN__*` variables
    pub fn load() -> Result<Self> {
        Self::load_with(Path::new(DEFAULT_CONFIG_FILE), ENV_PREFIX)
    }

    /// Load from an explicit file path plus `WARDEN__*` variables
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(path.as_ref(), ENV_PREFIX)
    }

    /// Load from `path` (optional on disk) and variables under `env_prefix`
    pub fn load_with(path: &Path, env_prefix: &str) -> Result<Self> {
        let settings: Settings = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?
            .try_deserialize()
            .context("invalid configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.auth.secret.len() < MIN_SECRET_LENGTH {
            bail!("auth.secret must be at least {MIN_SECRET_LENGTH} bytes");
        }
        if self.auth.access_ttl_secs == 0
            || self.auth.session_access_ttl_secs == 0
            || self.auth.refresh_ttl_secs == 0
        {
            bail!("token lifetimes must be greater than zero");
        }
        if self.auth.access_ttl_secs > MAX_TOKEN_TTL_SECS
            || self.auth.session_access_ttl_secs > MAX_TOKEN_TTL_SECS
            || self.auth.refresh_ttl_secs > MAX_TOKEN_TTL_SECS
        {
            bail!("token lifetimes must be at most {MAX_TOKEN_TTL_SECS} seconds");
        }
        for (name, limit) in [
            ("rate_limit", &self.rate_limit),
            ("auth_rate_limit", &self.auth_rate_limit),
        ] {
            if limit.window_secs == 0 || limit.max_requests == 0 {
                bail!("{name}.window_secs and {name}.max_requests must be greater than zero");
            }
            if limit.window_secs > MAX_WINDOW_SECS {
                bail!("{name}.window_secs must be at most {MAX_WINDOW_SECS}");
            }
        }
        let requirements = &self.password.requirements;
        if requirements.min_length == 0 || requirements.min_length > requirements.max_length {
            bail!("password.min_length must be between 1 and password.max_length");
        }
        if !(1..=20).contains(&self.password.hash_log_n) {
            bail!("password.hash_log_n must be between 1 and 20");
        }
        match self.logging.level.parse::<tracing_subscriber::EnvFilter>() {
            Ok(_) => {},
            Err(e) => bail!("logging.level is not a valid filter: {e}"),
        }
        Ok(())
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| {
                format!(
                    "invalid bind address {}:{}",
                    self.server.host, self.server.port
                )
            })
    }
}
