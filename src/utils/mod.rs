//! Shared utilities

pub mod error;

pub use error::{CliDiagnostic, DiagnosticSeverity, PublishError, PublishResult};
