//! LaTeX to Canvas HTML converter
//!
//! This module implements the homework conversion engine. A document is
//! processed in four stages: math spans are lifted out and replaced with
//! placeholder tokens, the residual text is translated construct by
//! construct, each span is resolved to an equation image element, and the
//! assembler stitches the pieces back together in source order.

pub mod context;
pub mod image;
pub mod math;
mod assemble;
mod equation;
mod markup;
mod utils;

pub use context::{ConversionState, HtmlConverter, HtmlOptions, ListContext, ListKind};
pub use image::ImageReference;
pub use math::{ExtractedMath, MathSpan};

// =============================================================================
// Warning System
// =============================================================================

/// Kind of warning generated during conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A math delimiter was never closed; the remainder is kept as plain text
    UnterminatedMath,
    /// A math span was empty after trimming and no image was emitted
    EmptyMath,
    /// A list environment was closed without a matching open (or vice versa)
    UnbalancedEnvironment,
    /// A command or environment outside the supported subset was passed through
    UnsupportedConstruct,
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningKind::UnterminatedMath => write!(f, "unterminated math"),
            WarningKind::EmptyMath => write!(f, "empty math"),
            WarningKind::UnbalancedEnvironment => write!(f, "unbalanced environment"),
            WarningKind::UnsupportedConstruct => write!(f, "unsupported construct"),
        }
    }
}

/// A warning generated during LaTeX to HTML conversion
#[derive(Debug, Clone)]
pub struct ConversionWarning {
    /// The kind of warning
    pub kind: WarningKind,
    /// Human-readable message
    pub message: String,
    /// Location context (e.g., "\\tabular" or "offset 42")
    pub location: Option<String>,
}

impl ConversionWarning {
    /// Create a new warning
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        ConversionWarning {
            kind,
            message: message.into(),
            location: None,
        }
    }

    /// Add location context to the warning
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Create an unterminated-delimiter warning
    pub fn unterminated(delimiter: &str, offset: usize) -> Self {
        ConversionWarning::new(
            WarningKind::UnterminatedMath,
            format!(
                "No closing delimiter for '{}'; remainder kept as plain text",
                delimiter
            ),
        )
        .with_location(format!("offset {}", offset))
    }

    /// Create an empty math span warning
    pub fn empty_math(offset: usize) -> Self {
        ConversionWarning::new(
            WarningKind::EmptyMath,
            "Math span is empty after trimming; no equation image emitted",
        )
        .with_location(format!("offset {}", offset))
    }

    /// Create an unbalanced environment warning
    pub fn unbalanced(message: impl Into<String>) -> Self {
        ConversionWarning::new(WarningKind::UnbalancedEnvironment, message)
    }

    /// Create an unsupported construct warning
    pub fn unsupported_construct(name: &str) -> Self {
        ConversionWarning::new(
            WarningKind::UnsupportedConstruct,
            format!("Unsupported construct '{}' passed through unchanged", name),
        )
        .with_location(name.to_string())
    }
}

impl std::fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref loc) = self.location {
            write!(f, "[{}] {}: {}", self.kind, loc, self.message)
        } else {
            write!(f, "[{}] {}", self.kind, self.message)
        }
    }
}

impl From<ConversionWarning> for crate::utils::error::CliDiagnostic {
    fn from(warning: ConversionWarning) -> Self {
        use crate::utils::error::{CliDiagnostic, DiagnosticSeverity};

        let severity = match warning.kind {
            WarningKind::UnterminatedMath
            | WarningKind::EmptyMath
            | WarningKind::UnbalancedEnvironment => DiagnosticSeverity::Warning,
            WarningKind::UnsupportedConstruct => DiagnosticSeverity::Info,
        };

        let mut diag = CliDiagnostic::new(severity, warning.kind.to_string(), warning.message);
        if let Some(loc) = warning.location {
            diag = diag.with_location(loc);
        }
        diag
    }
}

/// Result of conversion with diagnostics
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// The converted HTML
    pub html: String,
    /// Warnings generated during conversion
    pub warnings: Vec<ConversionWarning>,
}

impl ConversionResult {
    /// Create a new result with no warnings
    pub fn ok(html: String) -> Self {
        ConversionResult {
            html,
            warnings: Vec::new(),
        }
    }

    /// Create a result with warnings
    pub fn with_warnings(html: String, warnings: Vec<ConversionWarning>) -> Self {
        ConversionResult { html, warnings }
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get warnings as formatted strings
    pub fn format_warnings(&self) -> Vec<String> {
        self.warnings.iter().map(|w| w.to_string()).collect()
    }
}

/// Convert a LaTeX homework document to Canvas HTML
pub fn latex_to_canvas_html(input: &str) -> String {
    let mut converter = HtmlConverter::new();
    converter.convert_document(input)
}

/// Convert with explicit options (equation endpoint, page shell)
pub fn latex_to_canvas_html_with_options(input: &str, options: HtmlOptions) -> String {
    let mut converter = HtmlConverter::with_options(options);
    converter.convert_document(input)
}

/// Convert LaTeX to Canvas HTML with full diagnostics
///
/// Returns both the converted HTML and any warnings generated during
/// conversion. This is the recommended function for applications that need
/// to report conversion issues.
///
/// # Example
///
/// ```
/// use tex2canvas::latex_to_canvas_html_with_diagnostics;
///
/// let result = latex_to_canvas_html_with_diagnostics(
///     r"\documentclass{article}\begin{document}Hello\end{document}",
/// );
/// println!("HTML: {}", result.html);
/// for warning in result.warnings {
///     eprintln!("Warning: {}", warning);
/// }
/// ```
pub fn latex_to_canvas_html_with_diagnostics(input: &str) -> ConversionResult {
    let mut converter = HtmlConverter::new();
    converter.convert_document_with_diagnostics(input)
}
