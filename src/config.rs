//! # Session configuration.
//!
//! Provides [`Config`], the constructor-time settings of a [`Session`](crate::Session).
//! Values are read once and never re-validated afterwards.
//!
//! Config is used in two ways:
//! 1. **Explicitly**: `Config::default()` and field assignment
//! 2. **From the environment**: [`Config::from_env`] overlays `SERMAS_*` variables
//!
//! ## Environment
//! | Variable                   | Field              | Default                 |
//! |----------------------------|--------------------|-------------------------|
//! | `SERMAS_BASE_URL`          | `base_url`         | `http://localhost:8080` |
//! | `SERMAS_CLIENT_ID`         | `client_id`        | `sermas-client`         |
//! | `SERMAS_CLIENT_SECRET`     | `client_secret`    | empty                   |
//! | `SERMAS_APP_ID`            | `app_id`           | `sermas-app`            |
//! | `SERMAS_RETRY_INTERVAL_MS` | `retry.interval`   | `1000`                  |
//!
//! Unset and empty variables both fall back to the default. A retry interval
//! must be a positive number of milliseconds.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use sermas_link::{Config, RetryPolicy};
//!
//! let mut cfg = Config::default();
//! cfg.app_id = "demo-app".into();
//! cfg.retry = RetryPolicy::fixed(Duration::from_millis(500));
//!
//! assert_eq!(cfg.base_url, "http://localhost:8080");
//! assert_eq!(cfg.retry.interval, Duration::from_millis(500));
//! ```

use std::time::Duration;

use crate::error::ConfigError;
use crate::policies::{FetchMode, RetryPolicy};

/// Default platform API root.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
/// Default client id used for the credential bootstrap.
pub const DEFAULT_CLIENT_ID: &str = "sermas-client";
/// Default client secret (empty: platforms running without auth accept it).
pub const DEFAULT_CLIENT_SECRET: &str = "";
/// Default application id for the descriptor and app-scoped calls.
pub const DEFAULT_APP_ID: &str = "sermas-app";

/// Configuration of a session.
///
/// ## Field semantics
/// - `base_url`, `client_id`, `client_secret`, `app_id`: identify the platform and the app
/// - `retry`: delay between bootstrap attempts (fixed, unbounded)
/// - `bus_capacity`: local bus ring buffer size (min 1; clamped by Bus)
/// - `descriptor_fetch`: concurrent cache-miss behaviour
/// - `prefetch_descriptor`: fetch the app descriptor once, best-effort, on start
#[derive(Clone, Debug)]
pub struct Config {
    /// Platform API root.
    pub base_url: String,
    /// Client id handed to the credential bootstrap.
    pub client_id: String,
    /// Client secret handed to the credential bootstrap.
    pub client_secret: String,
    /// Application id keying the descriptor and app-scoped calls.
    pub app_id: String,
    /// Retry policy of the credential bootstrap.
    pub retry: RetryPolicy,
    /// Capacity of the local broadcast bus.
    ///
    /// Listeners lagging more than `bus_capacity` events skip the oldest ones.
    pub bus_capacity: usize,
    /// How concurrent descriptor cache misses are coordinated.
    pub descriptor_fetch: FetchMode,
    /// Whether [`Session::start`](crate::Session::start) triggers an eager descriptor fetch.
    pub prefetch_descriptor: bool,
}

impl Config {
    /// Builds a config from `SERMAS_*` process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    ///
    /// Used by [`Config::from_env`]; handy in tests to avoid touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();

        if let Some(v) = var("SERMAS_BASE_URL") {
            cfg.base_url = v;
        }
        if let Some(v) = var("SERMAS_CLIENT_ID") {
            cfg.client_id = v;
        }
        if let Some(v) = var("SERMAS_CLIENT_SECRET") {
            cfg.client_secret = v;
        }
        if let Some(v) = var("SERMAS_APP_ID") {
            cfg.app_id = v;
        }
        if let Some(v) = var("SERMAS_RETRY_INTERVAL_MS") {
            let ms = v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: "SERMAS_RETRY_INTERVAL_MS",
                    value: v.clone(),
                })?;
            cfg.retry = RetryPolicy::fixed(Duration::from_millis(ms));
        }
        Ok(cfg)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - platform at `http://localhost:8080`, client `sermas-client`, app `sermas-app`
    /// - `retry = 1000ms` fixed
    /// - `bus_capacity = 1024`
    /// - `descriptor_fetch = Uncoordinated`
    /// - `prefetch_descriptor = true`
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            client_secret: DEFAULT_CLIENT_SECRET.to_string(),
            app_id: DEFAULT_APP_ID.to_string(),
            retry: RetryPolicy::default(),
            bus_capacity: 1024,
            descriptor_fetch: FetchMode::default(),
            prefetch_descriptor: true,
        }
    }
}
