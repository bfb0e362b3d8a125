//! Credential resolution and runtime settings.
//!
//! The credential is resolved exactly once, when a client is built:
//! an explicit value wins, otherwise the [`API_KEY_ENV`] variable is read.
//! Every lookup has a `*_with` twin taking a lookup closure so callers (and
//! tests) can resolve against something other than the process environment.

use std::fmt;
use std::str::FromStr;

use tracing::{error, info};

use crate::error::{DashError, Result};

/// Environment variable holding the Alpha Vantage API key.
pub const API_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";

/// Environment variable holding the log level.
pub const LOG_LEVEL_ENV: &str = "LOGGING_LEVEL";

/// Where to get an API key.
pub const API_KEY_HELP: &str = "visit https://www.alphavantage.co/support/#api-key to generate an api key, \
     then pass it explicitly or set ALPHA_VANTAGE_API_KEY";

/// Opaque API token sent with every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a token, rejecting blank values.
    ///
    /// # Errors
    /// Returns [`DashError::Configuration`] if `token` is empty or whitespace.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(DashError::Configuration(format!(
                "missing credential: {API_KEY_HELP}"
            )));
        }
        Ok(Self(token))
    }

    /// Resolves the credential from `explicit`, else from the `env_key`
    /// environment variable.
    ///
    /// # Errors
    /// Returns [`DashError::Configuration`] if neither yields a non-empty value.
    pub fn resolve(explicit: Option<&str>, env_key: &str) -> Result<Self> {
        Self::resolve_with(explicit, env_key, |key| std::env::var(key).ok())
    }

    /// Like [`Credential::resolve`] with a custom variable lookup.
    ///
    /// # Errors
    /// Returns [`DashError::Configuration`] if neither yields a non-empty value.
    pub fn resolve_with<F>(explicit: Option<&str>, env_key: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = explicit.filter(|t| !t.trim().is_empty()) {
            return Self::new(token);
        }

        info!("API key not supplied, looking for {env_key} in the environment");
        match lookup(env_key).filter(|t| !t.trim().is_empty()) {
            Some(token) => {
                info!("{env_key} found in the environment");
                Self::new(token)
            }
            None => {
                error!("{env_key} not set");
                Err(DashError::Configuration(format!(
                    "missing credential: {API_KEY_HELP}"
                )))
            }
        }
    }

    /// Returns the raw token. Only the transport should need this.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// Verbosity accepted in [`LOG_LEVEL_ENV`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LogLevel {
    /// Everything, including request traces.
    #[default]
    Debug,
    /// Progress messages.
    Info,
    /// Recoverable problems.
    Warning,
    /// Failures.
    Error,
    /// Failures; kept for compatibility with the usual level names.
    Critical,
}

impl LogLevel {
    /// All levels, most verbose first.
    pub const ALL: [Self; 5] = [
        Self::Debug,
        Self::Info,
        Self::Warning,
        Self::Error,
        Self::Critical,
    ];

    /// Canonical uppercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    /// Directive understood by `tracing` filters.
    #[must_use]
    pub const fn as_directive(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error | Self::Critical => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DashError::InvalidParameter(format!("invalid logging level: {s}")))
    }
}

/// Settings read from the environment.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// API key, if present in the environment.
    pub api_key: Option<String>,
    /// Effective log level.
    pub log_level: LogLevel,
    /// Raw log level value that was rejected, if any.
    ///
    /// Logging is usually not set up yet when settings are read, so the
    /// warning is left for the caller to emit.
    pub rejected_log_level: Option<String>,
}

impl Settings {
    /// Reads settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through a custom variable lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty());
        let (log_level, rejected_log_level) = match lookup(LOG_LEVEL_ENV) {
            None => (LogLevel::default(), None),
            Some(raw) => match raw.parse() {
                Ok(level) => (level, None),
                Err(_) => (LogLevel::default(), Some(raw)),
            },
        };

        Self {
            api_key,
            log_level,
            rejected_log_level,
        }
    }

    /// Resolves the credential, preferring `explicit` over the environment
    /// value captured in these settings.
    ///
    /// # Errors
    /// Returns [`DashError::Configuration`] if no key is available.
    pub fn credential(&self, explicit: Option<&str>) -> Result<Credential> {
        Credential::resolve_with(explicit, API_KEY_ENV, |_| self.api_key.clone())
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("log_level", &self.log_level)
            .field("rejected_log_level", &self.rejected_log_level)
            .finish()
    }
}
