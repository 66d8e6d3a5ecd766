//! tex2canvas - Convert LaTeX homework into Canvas-ready HTML
//!
//! The converter lifts math out of the document, renders it as Canvas
//! equation images, translates the structural subset used in homework
//! (sections, lists, images, basic text markup), and reassembles the result
//! as a paste-ready HTML page. Conversion never fails: anything outside the
//! supported subset passes through verbatim with a warning.
//!
//! The [`canvas`] module adds the outer layer: publishing the converted
//! document as a Canvas assignment, including natural-language due dates.
//!
//! # Quick start
//!
//! ```
//! use tex2canvas::latex_to_canvas_html_with_diagnostics;
//!
//! let result = latex_to_canvas_html_with_diagnostics(
//!     r"\begin{document}The energy is $E = mc^2$.\end{document}",
//! );
//! assert!(result.html.contains("equation_image"));
//! ```

pub mod canvas;
pub mod core;
pub mod utils;

pub use crate::core::latex2html::{
    latex_to_canvas_html, latex_to_canvas_html_with_diagnostics, latex_to_canvas_html_with_options,
    ConversionResult, ConversionWarning, HtmlConverter, HtmlOptions, WarningKind,
};
