//! Core state and structures for LaTeX to HTML conversion
//!
//! This module contains the main converter struct and the per-call
//! conversion state. There is no process-wide state: every conversion owns
//! its own `ConversionState`, so callers may convert documents in parallel.

use std::collections::HashSet;

use super::assemble::assemble_document;
use super::equation::equation_image;
use super::markup::translate_body;
use super::math::extract_math_spans;
use super::utils::{extract_body, extract_metadata};
use super::{ConversionResult, ConversionWarning};

// =============================================================================
// Conversion Options
// =============================================================================

/// Options for LaTeX to Canvas HTML conversion
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Base URL of the equation rendering service. The percent-encoded
    /// LaTeX source is appended to this value.
    /// Default: `/equation_images/` (Canvas built-in renderer)
    pub equation_base_url: String,

    /// Wrap the converted body in a standalone HTML page with styles.
    /// Disable when the output is pasted directly into a rich-text editor.
    /// Default: true
    pub page_shell: bool,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            equation_base_url: "/equation_images/".to_string(),
            page_shell: true,
        }
    }
}

impl HtmlOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create options that emit only the body fragment (for LMS paste)
    pub fn body_only() -> Self {
        Self {
            page_shell: false,
            ..Self::default()
        }
    }
}

// =============================================================================
// List tracking
// =============================================================================

/// Which HTML list a LaTeX list environment maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    /// HTML tag name for this list kind
    pub fn tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }

    /// LaTeX environment name for this list kind
    pub fn env_name(self) -> &'static str {
        match self {
            ListKind::Unordered => "itemize",
            ListKind::Ordered => "enumerate",
        }
    }
}

/// One open list environment. The stack depth equals the current HTML list
/// nesting depth; the stack must be empty at document end.
#[derive(Debug, Clone)]
pub struct ListContext {
    pub kind: ListKind,
    /// Whether an `<li>` is currently open at this level
    pub item_open: bool,
}

impl ListContext {
    pub fn new(kind: ListKind) -> Self {
        ListContext {
            kind,
            item_open: false,
        }
    }
}

// =============================================================================
// Conversion state
// =============================================================================

/// Conversion state maintained during a single document conversion
#[derive(Debug, Default)]
pub struct ConversionState {
    /// Stack of open list environments
    pub list_stack: Vec<ListContext>,
    /// Alt text supplied by a `% alt:` comment, waiting for the next image
    pub pending_alt: Option<String>,
    /// Counter for untitled subsections ("Part N"), reset at each `\section`
    pub subsection_counter: u32,
    /// Document metadata captured from the preamble
    pub title: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    /// Collected warnings, in document order
    pub warnings: Vec<ConversionWarning>,
    /// Constructs already warned about (one warning per distinct construct)
    warned_constructs: HashSet<String>,
    /// Conversion options
    pub options: HtmlOptions,
}

impl ConversionState {
    /// Create state with the given options
    pub fn with_options(options: HtmlOptions) -> Self {
        ConversionState {
            options,
            ..Default::default()
        }
    }

    /// Record a warning
    pub fn warn(&mut self, warning: ConversionWarning) {
        self.warnings.push(warning);
    }

    /// Record an unsupported-construct warning, at most once per construct
    pub fn warn_once(&mut self, construct: &str) {
        if self.warned_constructs.insert(construct.to_string()) {
            self.warnings
                .push(ConversionWarning::unsupported_construct(construct));
        }
    }

    /// Open a list environment
    pub fn push_list(&mut self, kind: ListKind) {
        self.list_stack.push(ListContext::new(kind));
    }

    /// Close the innermost list environment
    pub fn pop_list(&mut self) -> Option<ListContext> {
        self.list_stack.pop()
    }

    /// Current list nesting depth
    pub fn list_depth(&self) -> usize {
        self.list_stack.len()
    }
}

// =============================================================================
// Converter
// =============================================================================

/// The LaTeX to Canvas HTML converter
#[derive(Debug, Default)]
pub struct HtmlConverter {
    pub state: ConversionState,
}

impl HtmlConverter {
    /// Create a converter with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a converter with explicit options
    pub fn with_options(options: HtmlOptions) -> Self {
        HtmlConverter {
            state: ConversionState::with_options(options),
        }
    }

    /// Convert a full LaTeX document, discarding diagnostics
    pub fn convert_document(&mut self, input: &str) -> String {
        self.convert_document_with_diagnostics(input).html
    }

    /// Convert a full LaTeX document, returning HTML plus warnings
    pub fn convert_document_with_diagnostics(&mut self, input: &str) -> ConversionResult {
        self.state = ConversionState::with_options(self.state.options.clone());

        let (title, author, date) = extract_metadata(input);
        self.state.title = title;
        self.state.author = author;
        self.state.date = date;

        let body = extract_body(input);
        let extracted = extract_math_spans(&mut self.state, body);
        let translated = translate_body(&mut self.state, &extracted.residual);

        let images: Vec<Option<String>> = extracted
            .spans
            .iter()
            .map(|span| equation_image(&mut self.state, span))
            .collect();

        let html = assemble_document(&self.state, &translated, &extracted.tokens, &images);
        ConversionResult::with_warnings(html, std::mem::take(&mut self.state.warnings))
    }
}
