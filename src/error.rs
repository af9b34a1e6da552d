//! Error types used at the platform boundary and by configuration loading.
//!
//! This module defines:
//!
//! - [`PlatformError`]: failures reported by the remote platform client.
//! - [`ConfigError`]: invalid values found while reading configuration.
//! - [`UnknownChannel`]: a channel name that is not one of the five bus channels.
//!
//! None of these escape the public accessors of [`Session`](crate::Session):
//! they are logged and turned into absent results there. They are public so that
//! [`Platform`](crate::Platform) implementations can classify their failures.

use thiserror::Error;

/// # Errors produced by the remote platform client.
///
/// Record lookups treat `NotFound` as an expected outcome and stay silent;
/// every other kind is logged.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The requested resource does not exist on the platform.
    #[error("not found: {resource}")]
    NotFound {
        /// Identifier of the missing resource.
        resource: String,
    },

    /// Credentials were rejected or the token is missing/expired.
    #[error("unauthorized: {reason}")]
    Unauthorized {
        /// Reason reported by the platform.
        reason: String,
    },

    /// The platform answered but refused the request.
    #[error("request rejected (status {status}): {reason}")]
    Rejected {
        /// HTTP-like status code returned by the platform.
        status: u16,
        /// Reason reported by the platform.
        reason: String,
    },

    /// The request never got a usable answer (connection, timeout, decoding).
    #[error("transport error: {error}")]
    Transport {
        /// The underlying error message.
        error: String,
    },
}

impl PlatformError {
    /// Shorthand for [`PlatformError::NotFound`].
    pub fn not_found(resource: impl Into<String>) -> Self {
        PlatformError::NotFound {
            resource: resource.into(),
        }
    }

    /// Shorthand for [`PlatformError::Transport`].
    pub fn transport(error: impl Into<String>) -> Self {
        PlatformError::Transport {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use sermas_link::PlatformError;
    ///
    /// let err = PlatformError::not_found("record-1");
    /// assert_eq!(err.as_label(), "platform_not_found");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PlatformError::NotFound { .. } => "platform_not_found",
            PlatformError::Unauthorized { .. } => "platform_unauthorized",
            PlatformError::Rejected { .. } => "platform_rejected",
            PlatformError::Transport { .. } => "platform_transport",
        }
    }

    /// Whether this failure means "the thing does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(self, PlatformError::NotFound { .. })
    }
}

/// # Errors produced while reading configuration.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Name of the offending variable.
        key: &'static str,
        /// The raw value that failed to parse.
        value: String,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::InvalidValue { .. } => "config_invalid_value",
        }
    }
}

/// A string did not name any of the local bus channels.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown channel: {0:?}")]
pub struct UnknownChannel(pub String);
