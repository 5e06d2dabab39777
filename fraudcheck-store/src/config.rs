//! Configuration management.
//!
//! Courier credentials come from a JSON file, environment variables, or
//! both (environment wins). A courier section that is present must be
//! complete; an absent section means the courier is not queried.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use fraudcheck_core::CourierKind;
use fraudcheck_fetch::{
    CredentialCache, FetchContext, FetchContextBuilder, FetchSettings, InMemoryCredentialCache,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::credential_store::FileCredentialCache;
use crate::error::StoreError;
use crate::persistence::{default_config_path, default_credentials_path};

/// Environment variable for the Steadfast login email.
pub const ENV_STEADFAST_USER: &str = "STEADFAST_USER";
/// Environment variable for the Steadfast password.
pub const ENV_STEADFAST_PASSWORD: &str = "STEADFAST_PASSWORD";
/// Environment variable for the Pathao username.
pub const ENV_PATHAO_USER: &str = "PATHAO_USER";
/// Environment variable for the Pathao password.
pub const ENV_PATHAO_PASSWORD: &str = "PATHAO_PASSWORD";
/// Environment variable for the RedX login phone.
pub const ENV_REDX_PHONE: &str = "REDX_PHONE";
/// Environment variable for the RedX password.
pub const ENV_REDX_PASSWORD: &str = "REDX_PASSWORD";
/// Environment variable overriding the HTTP request timeout (seconds).
pub const ENV_HTTP_TIMEOUT: &str = "FRAUDCHECK_HTTP_TIMEOUT_SECS";
/// Environment variable overriding the credential TTL (minutes).
pub const ENV_CACHE_TTL: &str = "FRAUDCHECK_CACHE_TTL_MINUTES";

// ============================================================================
// Courier Credentials
// ============================================================================

/// Steadfast web login.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteadfastConfig {
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Login password.
    #[serde(default)]
    pub password: String,
    /// Site root override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Pathao merchant API login.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathaoConfig {
    /// Merchant username (email).
    #[serde(default)]
    pub username: String,
    /// Merchant password.
    #[serde(default)]
    pub password: String,
    /// API root override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// RedX merchant login.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedxConfig {
    /// Merchant phone number.
    #[serde(default)]
    pub phone: String,
    /// Merchant password.
    #[serde(default)]
    pub password: String,
    /// Login API root override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    /// Stats API root override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

macro_rules! redacted_debug {
    ($ty:ident, $user:ident) => {
        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($ty))
                    .field(stringify!($user), &self.$user)
                    .field("password", &"[REDACTED]")
                    .finish_non_exhaustive()
            }
        }
    };
}

redacted_debug!(SteadfastConfig, email);
redacted_debug!(PathaoConfig, username);
redacted_debug!(RedxConfig, phone);

/// Per-courier sections. `None` means not configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouriersConfig {
    /// Steadfast.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steadfast: Option<SteadfastConfig>,
    /// Pathao.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pathao: Option<PathaoConfig>,
    /// RedX.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redx: Option<RedxConfig>,
}

// ============================================================================
// HTTP & Cache Settings
// ============================================================================

/// Network timeouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Total timeout of one request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Connect timeout of one request, in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Deadline of one courier lookup, in seconds.
    #[serde(default = "default_courier_timeout_secs")]
    pub courier_timeout_secs: u64,
}

/// Where credentials are cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process memory; lost on exit.
    #[default]
    Memory,
    /// JSON file shared by every process of the user.
    File,
}

/// Credential cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Credential lifetime, in minutes.
    #[serde(default = "default_ttl_minutes")]
    pub credential_ttl_minutes: u64,
    /// Backend.
    #[serde(default)]
    pub backend: CacheBackend,
    /// File location for the file backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_courier_timeout_secs() -> u64 {
    45
}

fn default_ttl_minutes() -> u64 {
    50
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            courier_timeout_secs: default_courier_timeout_secs(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            credential_ttl_minutes: default_ttl_minutes(),
            backend: CacheBackend::Memory,
            path: None,
        }
    }
}

// ============================================================================
// Config
// ============================================================================

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Courier credentials.
    #[serde(default)]
    pub couriers: CouriersConfig,
    /// Network timeouts.
    #[serde(default)]
    pub http: HttpConfig,
    /// Credential cache.
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        default_config_path()
    }

    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, StoreError> {
        Self::load_from(&Self::default_path())
    }

    /// Loads configuration from a specific path.
    ///
    /// A missing file yields the defaults. Nothing is validated here.
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Builds configuration from process environment variables only.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_lookup(lookup);
        config
    }

    /// Overlays process environment variables onto this configuration.
    #[must_use]
    pub fn with_env(mut self) -> Self {
        self.apply_lookup(|name| std::env::var(name).ok());
        self
    }

    /// Overlays variables from `lookup`. Blank values count as unset.
    ///
    /// Setting any variable of a courier creates its section, so a partial
    /// set of variables is reported by [`Config::validate`].
    pub fn apply_lookup<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let (user, password) = (var(ENV_STEADFAST_USER), var(ENV_STEADFAST_PASSWORD));
        if user.is_some() || password.is_some() {
            let section = self.couriers.steadfast.get_or_insert_with(Default::default);
            overlay(&mut section.email, user);
            overlay(&mut section.password, password);
        }

        let (user, password) = (var(ENV_PATHAO_USER), var(ENV_PATHAO_PASSWORD));
        if user.is_some() || password.is_some() {
            let section = self.couriers.pathao.get_or_insert_with(Default::default);
            overlay(&mut section.username, user);
            overlay(&mut section.password, password);
        }

        let (phone, password) = (var(ENV_REDX_PHONE), var(ENV_REDX_PASSWORD));
        if phone.is_some() || password.is_some() {
            let section = self.couriers.redx.get_or_insert_with(Default::default);
            overlay(&mut section.phone, phone);
            overlay(&mut section.password, password);
        }

        // Unparseable numbers are kept as zero so validation rejects them.
        if let Some(secs) = var(ENV_HTTP_TIMEOUT) {
            self.http.timeout_secs = secs.trim().parse().unwrap_or(0);
        }
        if let Some(minutes) = var(ENV_CACHE_TTL) {
            self.cache.credential_ttl_minutes = minutes.trim().parse().unwrap_or(0);
        }
    }

    /// Checks that the configuration can be used to build a checker.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] naming every missing key, when no
    /// courier is configured, or when a timeout or TTL is zero.
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut missing = Vec::new();

        if let Some(ref s) = self.couriers.steadfast {
            require(&mut missing, "steadfast.email", &s.email);
            require(&mut missing, "steadfast.password", &s.password);
        }
        if let Some(ref p) = self.couriers.pathao {
            require(&mut missing, "pathao.username", &p.username);
            require(&mut missing, "pathao.password", &p.password);
        }
        if let Some(ref r) = self.couriers.redx {
            require(&mut missing, "redx.phone", &r.phone);
            require(&mut missing, "redx.password", &r.password);
        }

        if !missing.is_empty() {
            return Err(StoreError::Config(format!(
                "missing required keys: {}",
                missing.join(", ")
            )));
        }
        if self.configured_couriers().is_empty() {
            return Err(StoreError::Config("no courier configured".to_string()));
        }

        let zero = [
            ("http.timeout_secs", self.http.timeout_secs),
            ("http.connect_timeout_secs", self.http.connect_timeout_secs),
            ("http.courier_timeout_secs", self.http.courier_timeout_secs),
            ("cache.credential_ttl_minutes", self.cache.credential_ttl_minutes),
        ]
        .into_iter()
        .filter(|(_, v)| *v == 0)
        .map(|(k, _)| k)
        .collect::<Vec<_>>();
        if !zero.is_empty() {
            return Err(StoreError::Config(format!(
                "values must be positive: {}",
                zero.join(", ")
            )));
        }

        Ok(())
    }

    /// Couriers with a section, in report order.
    pub fn configured_couriers(&self) -> Vec<CourierKind> {
        let c = &self.couriers;
        CourierKind::all()
            .iter()
            .copied()
            .filter(|kind| match kind {
                CourierKind::Steadfast => c.steadfast.is_some(),
                CourierKind::Pathao => c.pathao.is_some(),
                CourierKind::Redx => c.redx.is_some(),
            })
            .collect()
    }

    /// Fetch settings derived from the timeouts and TTL.
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            request_timeout: Duration::from_secs(self.http.timeout_secs),
            connect_timeout: Duration::from_secs(self.http.connect_timeout_secs),
            courier_timeout: Duration::from_secs(self.http.courier_timeout_secs),
            credential_ttl: Duration::from_secs(self.cache.credential_ttl_minutes.saturating_mul(60)),
        }
    }

    /// Builds the credential cache selected by `cache.backend`.
    pub fn credential_cache(&self) -> Arc<dyn CredentialCache> {
        match self.cache.backend {
            CacheBackend::Memory => Arc::new(InMemoryCredentialCache::new()),
            CacheBackend::File => {
                let path = self
                    .cache
                    .path
                    .clone()
                    .unwrap_or_else(default_credentials_path);
                Arc::new(FileCredentialCache::new(path))
            }
        }
    }

    /// Validates the configuration and returns a context builder carrying
    /// its settings and credential cache.
    ///
    /// The caller may still set a transport or a domain allowlist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the configuration is invalid.
    pub fn context_builder(&self) -> Result<FetchContextBuilder, StoreError> {
        self.validate()?;
        Ok(FetchContext::builder()
            .settings(self.fetch_settings())
            .credentials(self.credential_cache()))
    }
}

fn overlay(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

fn require(missing: &mut Vec<&'static str>, key: &'static str, value: &str) {
    if value.trim().is_empty() {
        missing.push(key);
    }
}

// ============================================================================
// Tests
// ============================================================================
