//! Error handling for publishing and CLI operations
//!
//! Conversion itself is fail-soft and reports problems as warnings; the
//! error type here covers the operations that can genuinely fail: reading
//! files, loading configuration, and talking to the Canvas API.

use std::fmt;

/// Publishing error type
#[derive(Debug)]
pub enum PublishError {
    /// Configuration missing or malformed
    Config { message: String },
    /// Invalid input to an API operation
    InvalidInput { message: String },
    /// A due date expression could not be understood
    DueDate { input: String, message: String },
    /// The Canvas API rejected the request
    Http { status: u16, body: String },
    /// Transport-level failure reaching the API
    Network { message: String },
    /// IO error (for file operations)
    Io { message: String },
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::Config { message } => {
                write!(f, "Configuration error: {}", message)
            }
            PublishError::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)
            }
            PublishError::DueDate { input, message } => {
                write!(f, "Could not parse due date '{}': {}", input, message)
            }
            PublishError::Http { status, body } => {
                write!(f, "Canvas API returned HTTP {}: {}", status, body)
            }
            PublishError::Network { message } => {
                write!(f, "Network error: {}", message)
            }
            PublishError::Io { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for PublishError {}

impl From<std::io::Error> for PublishError {
    fn from(err: std::io::Error) -> Self {
        PublishError::Io {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for PublishError {
    fn from(err: reqwest::Error) -> Self {
        PublishError::Network {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PublishError {
    fn from(err: serde_json::Error) -> Self {
        PublishError::Config {
            message: err.to_string(),
        }
    }
}

// Convenience constructors
impl PublishError {
    pub fn config(message: impl Into<String>) -> Self {
        PublishError::Config {
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        PublishError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn due_date(input: impl Into<String>, message: impl Into<String>) -> Self {
        PublishError::DueDate {
            input: input.into(),
            message: message.into(),
        }
    }

    pub fn http(status: u16, body: impl Into<String>) -> Self {
        PublishError::Http {
            status,
            body: body.into(),
        }
    }
}

/// Result type for publishing operations
pub type PublishResult<T> = Result<T, PublishError>;

// =============================================================================
// Unified CLI Diagnostic System
// =============================================================================

/// Severity level for CLI diagnostics (determines coloring and behavior).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    /// Critical errors (red) - e.g., unreadable input, API failure
    Error,
    /// Warnings (yellow) - e.g., unterminated math, unbalanced lists
    Warning,
    /// Informational (cyan) - e.g., unsupported constructs passed through
    Info,
}

/// Unified diagnostic type for CLI output.
///
/// Conversion warnings and publishing errors are both funneled through this
/// type so the CLI layer prints them uniformly.
#[derive(Debug, Clone)]
pub struct CliDiagnostic {
    /// Severity level (for coloring and strict mode)
    pub severity: DiagnosticSeverity,
    /// Warning kind as string (e.g., "unterminated math")
    pub kind: String,
    /// Human-readable message
    pub message: String,
    /// Location context (e.g., "\\tabular", "offset 42")
    pub location: Option<String>,
}

impl CliDiagnostic {
    /// Create a new diagnostic.
    pub fn new(
        severity: DiagnosticSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            kind: kind.into(),
            message: message.into(),
            location: None,
        }
    }

    /// Add location context.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Get ANSI color code for this diagnostic's severity.
    pub fn color_code(&self) -> &'static str {
        match self.severity {
            DiagnosticSeverity::Error => "\x1b[31m",   // red
            DiagnosticSeverity::Warning => "\x1b[33m", // yellow
            DiagnosticSeverity::Info => "\x1b[36m",    // cyan
        }
    }
}

impl fmt::Display for CliDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref loc) = self.location {
            write!(f, "[{}] {}: {}", self.kind, loc, self.message)
        } else {
            write!(f, "[{}] {}", self.kind, self.message)
        }
    }
}
