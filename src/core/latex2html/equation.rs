//! Equation image construction
//!
//! Canvas expects equation images rather than MathJax scripts. The resolver
//! only builds the element string; no network call is made and the
//! rendering endpoint comes from `HtmlOptions`, never from here.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use super::context::ConversionState;
use super::math::MathSpan;
use super::utils::escape_html;
use super::ConversionWarning;

/// Build the equation image element for one math span.
///
/// The raw LaTeX source is preserved in the `title`, `alt`, and
/// `data-equation-content` attributes so a reader can recover it by hand if
/// the rendering service is unavailable. Returns `None` (with a warning)
/// when the span is empty after trimming.
pub fn equation_image(state: &mut ConversionState, span: &MathSpan) -> Option<String> {
    let latex = span.source.trim();
    if latex.is_empty() {
        state.warn(ConversionWarning::empty_math(span.start));
        return None;
    }

    let encoded = utf8_percent_encode(latex, NON_ALPHANUMERIC).to_string();
    let escaped = escape_html(latex);
    let class = if span.display {
        "equation_image equation_image--display"
    } else {
        "equation_image"
    };

    let img = format!(
        "<img class=\"{class}\" title=\"{escaped}\" \
         src=\"{base}{encoded}?scale=1\" \
         alt=\"LaTeX: {escaped}\" data-equation-content=\"{escaped}\" \
         data-ignore-a11y-check=\"\" />",
        base = state.options.equation_base_url,
    );

    if span.display {
        Some(format!("<p>{}</p>", img))
    } else {
        Some(img)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::latex2html::HtmlOptions;

    fn span(source: &str, display: bool) -> MathSpan {
        MathSpan {
            source: source.to_string(),
            display,
            start: 0,
            end: source.len(),
        }
    }

    #[test]
    fn test_inline_image_carries_source() {
        let mut state = ConversionState::default();
        let html = equation_image(&mut state, &span("x^2", false)).unwrap();
        assert!(html.contains("class=\"equation_image\""));
        assert!(html.contains("data-equation-content=\"x^2\""));
        assert!(html.contains("/equation_images/x%5E2?scale=1"));
        assert!(!html.starts_with("<p>"));
    }

    #[test]
    fn test_display_image_is_block_and_classed() {
        let mut state = ConversionState::default();
        let html = equation_image(&mut state, &span("\\frac{a}{b}", true)).unwrap();
        assert!(html.starts_with("<p><img"));
        assert!(html.contains("equation_image--display"));
    }

    #[test]
    fn test_base_url_is_configurable() {
        let mut state = ConversionState::with_options(HtmlOptions {
            equation_base_url: "https://render.example/eq/".to_string(),
            page_shell: true,
        });
        let html = equation_image(&mut state, &span("x", false)).unwrap();
        assert!(html.contains("src=\"https://render.example/eq/x?scale=1\""));
    }

    #[test]
    fn test_empty_span_warns_and_skips() {
        let mut state = ConversionState::default();
        assert!(equation_image(&mut state, &span("  ", true)).is_none());
        assert_eq!(state.warnings.len(), 1);
    }

    #[test]
    fn test_latex_is_html_escaped_in_attributes() {
        let mut state = ConversionState::default();
        let html = equation_image(&mut state, &span("a < b", false)).unwrap();
        assert!(html.contains("title=\"a &lt; b\""));
    }
}
