//! Central error types for TwitCoop.
//!
//! All errors implement `Serialize` so IPC commands can hand them to the
//! webview unchanged.

use serde::Serialize;
use thiserror::Error;

/// Main error type for shell operations.
#[derive(Error, Debug)]
pub enum ShellError {
    /// Tauri runtime or window operation failed
    #[error("Tauri error: {0}")]
    Tauri(#[from] tauri::Error),

    /// Settings store could not be opened, read or flushed
    #[error("Settings store error: {0}")]
    Store(String),

    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL could not be parsed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Script evaluation or navigation inside the page failed
    #[error("Page error: {0}")]
    Page(String),

    /// Window not found by label
    #[error("Window not found: {label}")]
    WindowNotFound { label: String },

    /// Lock poisoned (mutex/rwlock)
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Serialize for ShellError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<tauri_plugin_store::Error> for ShellError {
    fn from(err: tauri_plugin_store::Error) -> Self {
        ShellError::Store(err.to_string())
    }
}

/// Helper trait for converting mutex lock errors to ShellError.
pub trait LockResultExt<T> {
    /// Convert a poisoned lock error to ShellError with context.
    fn map_lock_err(self, context: &str) -> Result<T, ShellError>;
}

impl<T> LockResultExt<T> for Result<T, std::sync::PoisonError<T>> {
    fn map_lock_err(self, context: &str) -> Result<T, ShellError> {
        self.map_err(|_| ShellError::LockPoisoned {
            context: context.to_string(),
        })
    }
}

/// Extension trait for adding context to Results.
///
/// # Example
/// ```ignore
/// use crate::error::{ResultExt, ShellResult};
///
/// fn open_log() -> ShellResult<std::fs::File> {
///     std::fs::File::open("twitcoop.log").context("failed to open log file")
/// }
/// ```
pub trait ResultExt<T> {
    /// Add context to an error, converting it to ShellError::Other.
    fn context(self, msg: &str) -> ShellResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn context(self, msg: &str) -> ShellResult<T> {
        self.map_err(|e| ShellError::Other(format!("{}: {}", msg, e)))
    }
}

/// Extension trait for adding context to Option types.
pub trait OptionExt<T> {
    /// Convert None to ShellError::Other with the given message.
    fn context(self, msg: &str) -> ShellResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn context(self, msg: &str) -> ShellResult<T> {
        self.ok_or_else(|| ShellError::Other(msg.to_string()))
    }
}

/// Type alias for Results using ShellError.
pub type ShellResult<T> = Result<T, ShellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ShellError::Page("eval rejected".to_string());
        assert_eq!(err.to_string(), "Page error: eval rejected");
    }

    #[test]
    fn test_error_serialization() {
        let err = ShellError::WindowNotFound {
            label: "main".to_string(),
        };
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Window not found: main\"");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ShellError = io_err.into();
        assert!(matches!(err, ShellError::Io(_)));
    }

    #[test]
    fn test_from_url_error() {
        let err: ShellError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, ShellError::Url(_)));
    }

    #[test]
    fn test_lock_poisoning_recovery() {
        use std::sync::Mutex;

        let mutex = Mutex::new(42);

        let _ = std::panic::catch_unwind(|| {
            let _guard = mutex.lock().unwrap();
            panic!("intentional panic to poison mutex");
        });
        assert!(mutex.lock().is_err());

        let result = mutex.lock().map_lock_err("test_mutex");
        if let Err(ShellError::LockPoisoned { context }) = result {
            assert_eq!(context, "test_mutex");
        } else {
            panic!("expected LockPoisoned");
        }
    }

    #[test]
    fn test_result_ext_context() {
        let result: Result<(), &str> = Err("original error");
        let msg = result.context("operation failed").unwrap_err().to_string();

        assert!(msg.contains("operation failed"));
        assert!(msg.contains("original error"));
    }

    #[test]
    fn test_option_ext_context() {
        let opt: Option<i32> = None;
        let result = opt.context("value was missing");

        assert!(result.unwrap_err().to_string().contains("value was missing"));
        assert_eq!(Some(7).context("unused").unwrap(), 7);
    }
}
