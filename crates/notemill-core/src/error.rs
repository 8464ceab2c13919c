//! Error types and handling for notemill-core operations.
//!
//! All public functions in notemill-core return [`Result<T>`] with a single
//! [`Error`] enum. Errors carry their source chain and expose a coarse
//! category plus a recoverability hint for retry logic.
//!
//! Page-scoped failures (a page or its children could not be fetched, or a
//! record was malformed) are expected during a sync and are handled by
//! skipping that page; only total fetcher unavailability aborts a run.

use thiserror::Error;

/// The main error type for notemill-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers reading and writing snapshot files, creating data
    /// directories, and similar filesystem work.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network operation failed.
    ///
    /// Covers HTTP requests against the Notion API. The underlying
    /// `reqwest::Error` is preserved for connection detail.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A remote record was malformed.
    ///
    /// A page or block payload was missing an expected field (e.g. a page
    /// without a usable title property). Treated the same as a fetch
    /// failure: the enclosing page is skipped.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// Snapshot storage operation failed.
    ///
    /// Covers problems beyond basic file I/O, such as unresolvable data
    /// directories or inconsistent snapshot state.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization or deserialization failed.
    ///
    /// Covers JSON/TOML conversion failures, including corrupt snapshot
    /// lines.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error for uncategorized failures.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check if the error might be recoverable through retry logic.
    ///
    /// Returns `true` for failures that are typically temporary: network
    /// timeouts, connection failures, and interrupted I/O. Malformed
    /// records and configuration problems are permanent.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a static string identifier.
    ///
    /// Useful for grouping errors in logs or metrics.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::MalformedRecord(_) => "malformed_record",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not_found",
            Self::Serialization(_) => "serialization",
            Self::Other(_) => "other",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn display_includes_message() {
        let errors = vec![
            Error::MalformedRecord("page missing title".into()),
            Error::Storage("disk full".into()),
            Error::Config("missing field".into()),
            Error::NotFound("snapshot".into()),
            Error::Serialization("bad line".into()),
        ];

        for error in errors {
            let rendered = error.to_string();
            assert!(!rendered.is_empty());
            match error {
                Error::MalformedRecord(msg) => {
                    assert!(rendered.contains("Malformed record"));
                    assert!(rendered.contains(&msg));
                },
                Error::Storage(msg) => {
                    assert!(rendered.contains("Storage error"));
                    assert!(rendered.contains(&msg));
                },
                Error::Config(msg) => {
                    assert!(rendered.contains("Configuration error"));
                    assert!(rendered.contains(&msg));
                },
                Error::NotFound(msg) => {
                    assert!(rendered.contains("Not found"));
                    assert!(rendered.contains(&msg));
                },
                Error::Serialization(msg) => {
                    assert!(rendered.contains("Serialization error"));
                    assert!(rendered.contains(&msg));
                },
                _ => {},
            }
        }
    }

    #[test]
    fn categories_match_variants() {
        let cases = vec![
            (Error::Io(io::Error::other("x")), "io"),
            (Error::MalformedRecord("x".into()), "malformed_record"),
            (Error::Storage("x".into()), "storage"),
            (Error::Config("x".into()), "config"),
            (Error::NotFound("x".into()), "not_found"),
            (Error::Serialization("x".into()), "serialization"),
            (Error::Other("x".into()), "other"),
        ];

        for (error, expected) in cases {
            assert_eq!(error.category(), expected);
        }
    }

    #[test]
    fn recoverability() {
        assert!(Error::Io(io::Error::new(io::ErrorKind::TimedOut, "t")).is_recoverable());
        assert!(Error::Io(io::Error::new(io::ErrorKind::Interrupted, "i")).is_recoverable());

        assert!(!Error::Io(io::Error::new(io::ErrorKind::NotFound, "n")).is_recoverable());
        assert!(!Error::MalformedRecord("bad".into()).is_recoverable());
        assert!(!Error::Config("bad".into()).is_recoverable());
        assert!(!Error::Serialization("bad".into()).is_recoverable());
    }

    #[test]
    fn io_source_chain_is_preserved() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error: Error = io_error.into();

        let source = std::error::Error::source(&error).unwrap();
        assert!(source.to_string().contains("access denied"));
    }

    #[test]
    fn serde_json_errors_become_serialization() {
        let bad = serde_json::from_str::<serde_json::Value>("{nope");
        let error: Error = bad.unwrap_err().into();
        assert_eq!(error.category(), "serialization");
    }
}
