//! Unified error types for sca-fingerprint.
//!
//! Every error in this crate is recoverable at the level of a single
//! library: a failed fingerprint means fewer hashes for that library, never
//! an aborted scan. The kinds below keep enough structure for callers to
//! decide which fallback applies.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sca-fingerprint operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FingerprintError {
    /// Content fingerprint could not be produced for the given source
    #[error("Content fingerprint failed: {context}")]
    Content {
        context: String,
        #[source]
        source: ContentErrorKind,
    },

    /// An identity scheme rejected the library metadata
    #[error("Identity hash {scheme} not computed: {source}")]
    Identity {
        scheme: String,
        #[source]
        source: IdentityErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Size-bound violations of the content fingerprint engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentErrorKind {
    #[error("source is too large for super hash calculation: {size} bytes (max: {max})")]
    TooLarge { size: u64, max: u64 },

    #[error("source is too small for super hash calculation: {size} bytes (min: {min})")]
    TooSmall { size: u64, min: u64 },

    #[error("source is too small for msb and lsb hashes: {size} bytes (min: {min})")]
    TooSmallForPartial { size: u64, min: u64 },
}

/// Identity scheme validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IdentityErrorKind {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for sca-fingerprint operations
pub type Result<T> = std::result::Result<T, FingerprintError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl FingerprintError {
    /// Create a content fingerprint error with context
    pub fn content(context: impl Into<String>, source: ContentErrorKind) -> Self {
        Self::Content {
            context: context.into(),
            source,
        }
    }

    /// Create an identity error for a scheme missing one of its fields
    pub fn missing_field(scheme: impl Into<String>, field: &'static str) -> Self {
        Self::Identity {
            scheme: scheme.into(),
            source: IdentityErrorKind::MissingField { field },
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// The size-bound kind, if this is a content fingerprint error.
    #[must_use]
    pub const fn content_kind(&self) -> Option<&ContentErrorKind> {
        match self {
            Self::Content { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for FingerprintError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for FingerprintError {
    fn from(err: serde_json::Error) -> Self {
        Self::Validation(format!("invalid JSON: {err}"))
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to the error's existing context,
/// creating a chain that shows the path through the code.
///
/// # Example
///
/// ```ignore
/// use sca_fingerprint::error::ErrorContext;
///
/// let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (lazy evaluation).
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<FingerprintError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: FingerprintError, new_ctx: &str) -> FingerprintError {
    match err {
        FingerprintError::Content {
            context: existing,
            source,
        } => FingerprintError::Content {
            context: chain_context(new_ctx, &existing),
            source,
        },
        FingerprintError::Io {
            path,
            message,
            source,
        } => FingerprintError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        FingerprintError::Config(msg) => FingerprintError::Config(chain_context(new_ctx, &msg)),
        FingerprintError::Validation(msg) => {
            FingerprintError::Validation(chain_context(new_ctx, &msg))
        }
        // scheme name is the whole context of an identity error
        identity @ FingerprintError::Identity { .. } => identity,
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FingerprintError::content(
            "post.js",
            ContentErrorKind::TooSmall { size: 12, min: 512 },
        );
        let display = err.to_string();
        assert!(display.contains("post.js"), "{display}");

        let err = FingerprintError::missing_field("GAVT", "group");
        let display = err.to_string();
        assert!(display.contains("GAVT"), "{display}");
        assert!(
            std::error::Error::source(&err)
                .is_some_and(|s| s.to_string().contains("group"))
        );
    }

    #[test]
    fn test_error_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = FingerprintError::io("/path/to/lib.jar", io_err);

        assert!(err.to_string().contains("/path/to/lib.jar"));
    }

    #[test]
    fn test_content_kind() {
        let err = FingerprintError::content(
            "x",
            ContentErrorKind::TooLarge { size: 3, max: 2 },
        );
        assert_eq!(
            err.content_kind(),
            Some(&ContentErrorKind::TooLarge { size: 3, max: 2 })
        );
        assert!(FingerprintError::validation("v").content_kind().is_none());
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(FingerprintError::content(
                "base",
                ContentErrorKind::TooSmall { size: 1, min: 512 },
            ))
        }

        fn middle() -> Result<()> {
            inner().context("middle layer")
        }

        fn outer() -> Result<()> {
            middle().context("outer layer")
        }

        match outer() {
            Err(FingerprintError::Content { context, .. }) => {
                assert_eq!(context, "outer layer: middle layer: base");
            }
            other => panic!("Expected Content error, got {other:?}"),
        }
    }

    #[test]
    fn test_identity_error_keeps_scheme() {
        let err: Result<()> = Err(FingerprintError::missing_field("ACT", "commit"));
        match err.context("ignored") {
            Err(FingerprintError::Identity { scheme, .. }) => assert_eq!(scheme, "ACT"),
            other => panic!("Expected Identity error, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(FingerprintError::validation("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
    }
}
