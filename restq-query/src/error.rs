//! Error types for collection queries with actionable messages.
//!
//! Every failure surfaced by this crate is a [`QueryError`] carrying an
//! [`ErrorCode`] for programmatic handling, optional context, and
//! suggestions for fixing the problem.
//!
//! # Error Codes
//!
//! Error codes follow a pattern: R{category}{number}
//! - 1xxx: Builder errors (invalid filter, unsupported operation)
//! - 2xxx: Pagination errors
//! - 3xxx: Transport errors (anything the client capability reports)
//! - 6xxx: Data errors (serialization)
//! - 7xxx: Configuration errors
//!
//! ```rust
//! use restq_query::{ErrorCode, QueryError};
//!
//! let err = QueryError::not_implemented("update");
//! assert_eq!(err.code, ErrorCode::NotImplemented);
//! assert!(err.to_string().contains("update"));
//! ```

use std::fmt;
use thiserror::Error;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Builder errors (1xxx)
    /// Invalid filter or where clause (R1001).
    InvalidFilter = 1001,
    /// Operation exists in the API but is not supported (R1002).
    NotImplemented = 1002,

    // Pagination errors (2xxx)
    /// Requested page is outside the fetched result set (R2001).
    PageOutOfRange = 2001,
    /// Cursor has no fetch to wait on (R2002).
    CursorNotReady = 2002,

    // Transport errors (3xxx)
    /// The client capability failed to complete the request (R3001).
    Transport = 3001,
    /// The request did not complete in time (R3002).
    RequestTimeout = 3002,
    /// The endpoint answered with a non-success status (R3003).
    HttpStatus = 3003,

    // Data errors (6xxx)
    /// Serialization error (R6001).
    SerializationError = 6001,
    /// Deserialization error (R6002).
    DeserializationError = 6002,

    // Configuration errors (7xxx)
    /// Invalid configuration (R7001).
    InvalidConfiguration = 7001,
    /// Missing configuration (R7002).
    MissingConfiguration = 7002,
}

impl ErrorCode {
    /// Get the error code string (e.g., "R1001").
    pub fn code(&self) -> String {
        format!("R{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidFilter => "Invalid filter condition",
            Self::NotImplemented => "Operation not implemented",
            Self::PageOutOfRange => "Page out of range",
            Self::CursorNotReady => "Cursor not ready",
            Self::Transport => "Transport failure",
            Self::RequestTimeout => "Request timeout",
            Self::HttpStatus => "Unsuccessful HTTP status",
            Self::SerializationError => "Serialization error",
            Self::DeserializationError => "Deserialization error",
            Self::InvalidConfiguration => "Invalid configuration",
            Self::MissingConfiguration => "Missing configuration",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Suggestion for fixing an error.
#[derive(Debug, Clone)]
pub struct Suggestion {
    /// The suggestion text.
    pub text: String,
    /// Optional code example.
    pub code: Option<String>,
}

impl Suggestion {
    /// Create a new suggestion.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            code: None,
        }
    }

    /// Add a code example.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Additional context for an error.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation that was being performed.
    pub operation: Option<String>,
    /// The collection involved.
    pub collection: Option<String>,
    /// The request path (if available).
    pub path: Option<String>,
    /// Suggestions for fixing the error.
    pub suggestions: Vec<Suggestion>,
    /// Help text.
    pub help: Option<String>,
}

/// Errors that can occur during query operations.
#[derive(Error, Debug)]
pub struct QueryError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// Additional context.
    pub context: ErrorContext,
    /// The source error (if any).
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl QueryError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add context about the operation.
    pub fn with_context(mut self, operation: impl Into<String>) -> Self {
        self.context.operation = Some(operation.into());
        self
    }

    /// Add a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context.suggestions.push(Suggestion::new(suggestion));
        self
    }

    /// Add a code suggestion.
    pub fn with_code_suggestion(mut self, text: impl Into<String>, code: impl Into<String>) -> Self {
        self.context.suggestions.push(Suggestion::new(text).with_code(code));
        self
    }

    /// Add help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.context.help = Some(help.into());
        self
    }

    /// Set the collection.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.context.collection = Some(collection.into());
        self
    }

    /// Set the request path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.context.path = Some(path.into());
        self
    }

    /// Set the source error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // ============== Constructor Functions ==============

    /// Create an error for an operation that is part of the API but unsupported.
    pub fn not_implemented(operation: impl Into<String>) -> Self {
        let operation = operation.into();
        Self::new(
            ErrorCode::NotImplemented,
            format!("`{}` is not implemented for collections", operation),
        )
        .with_context(&operation)
        .with_code_suggestion(
            "Create a new record instead",
            "collection.create(&data).await",
        )
    }

    /// Create an invalid filter error.
    pub fn invalid_filter(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFilter, message)
            .with_suggestion("Pass a JSON object mapping field names to values or [operation, value] pairs")
    }

    /// Create a page out of range error.
    pub fn page_out_of_range(page: u32, last_page: u32) -> Self {
        Self::new(
            ErrorCode::PageOutOfRange,
            format!("Page {} is outside the available range 1..={}", page, last_page),
        )
        .with_suggestion("Check has_next() / has_previous() before moving the cursor")
    }

    /// Create an error for a cursor with nothing to wait on.
    pub fn cursor_not_ready() -> Self {
        Self::new(ErrorCode::CursorNotReady, "Pagination cursor has no page and no pending fetch")
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Transport, message)
    }

    /// Create a request timeout error.
    pub fn timeout(duration_ms: u64) -> Self {
        Self::new(
            ErrorCode::RequestTimeout,
            format!("Request timed out after {}ms", duration_ms),
        )
        .with_suggestion("Increase the client timeout")
    }

    /// Create an unsuccessful status error.
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let mut err = Self::new(
            ErrorCode::HttpStatus,
            format!("Endpoint responded with status {}", status),
        );
        if !body.is_empty() {
            err = err.with_help(body);
        }
        err
    }

    /// Create a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::SerializationError,
            format!("Failed to serialize payload: {}", message.into()),
        )
    }

    /// Create a deserialization error.
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::DeserializationError,
            format!("Failed to deserialize response: {}", message.into()),
        )
        .with_suggestion("Check that the endpoint returns the expected JSON shape")
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidConfiguration, message)
    }

    /// Create a missing configuration error.
    pub fn missing_configuration(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(
            ErrorCode::MissingConfiguration,
            format!("Missing configuration value `{}`", key),
        )
        .with_suggestion(format!("Set the {} environment variable", key))
    }

    // ============== Error Checks ==============

    /// Check if this is the fail-fast error of an unsupported operation.
    pub fn is_not_implemented(&self) -> bool {
        self.code == ErrorCode::NotImplemented
    }

    /// Check if this error came from the client capability.
    pub fn is_transport(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::Transport | ErrorCode::RequestTimeout | ErrorCode::HttpStatus
        )
    }

    /// Check if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::RequestTimeout
    }

    /// Check if this is a page out of range error.
    pub fn is_page_out_of_range(&self) -> bool {
        self.code == ErrorCode::PageOutOfRange
    }

    // ============== Display Functions ==============

    /// Display the full error with all context and suggestions.
    pub fn display_full(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Error [{}]: {}\n", self.code.code(), self.message));

        if let Some(ref op) = self.context.operation {
            output.push_str(&format!("  → While: {}\n", op));
        }
        if let Some(ref collection) = self.context.collection {
            output.push_str(&format!("  → Collection: {}\n", collection));
        }
        if let Some(ref path) = self.context.path {
            output.push_str(&format!("  → Path: {}\n", path));
        }

        if !self.context.suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for (i, suggestion) in self.context.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion.text));
                if let Some(ref code) = suggestion.code {
                    output.push_str(&format!("     ```\n     {}\n     ```\n", code.replace('\n', "\n     ")));
                }
            }
        }

        if let Some(ref help) = self.context.help {
            output.push_str(&format!("\nHelp: {}\n", help));
        }

        output
    }
}
