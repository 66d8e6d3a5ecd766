//! Integration tests for full document conversion

use pretty_assertions::assert_eq;
use tex2canvas::{
    latex_to_canvas_html, latex_to_canvas_html_with_diagnostics,
    latex_to_canvas_html_with_options, HtmlOptions, WarningKind,
};

fn body_only(input: &str) -> String {
    latex_to_canvas_html_with_options(input, HtmlOptions::body_only())
}

fn document(body: &str) -> String {
    format!(
        "\\documentclass{{article}}\n\\begin{{document}}\n{}\n\\end{{document}}\n",
        body
    )
}

// ============================================================================
// Math conversion
// ============================================================================

mod math {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_inline_span_becomes_an_image() {
        let html = body_only(&document("First $a$ then $b$ then $c$."));
        assert_eq!(html.matches("class=\"equation_image\"").count(), 3);
        assert!(!html.contains('$'));
    }

    #[test]
    fn test_display_math_is_a_block() {
        let html = body_only(&document("Before.\n\n$$x^2 + y^2 = r^2$$\n\nAfter."));
        assert!(html.contains("<p><img class=\"equation_image equation_image--display\""));
        assert!(html.contains("<p>Before.</p>"));
        assert!(html.contains("<p>After.</p>"));
    }

    #[test]
    fn test_equation_src_is_percent_encoded() {
        let html = body_only(&document("$x^2$"));
        assert!(html.contains("/equation_images/x%5E2?scale=1"));
    }

    #[test]
    fn test_eqnarray_produces_one_image_per_row() {
        let html = body_only(&document(
            "\\begin{eqnarray}\nx &=& 1 \\\\\ny &=& 2\n\\end{eqnarray}",
        ));
        assert_eq!(html.matches("equation_image--display").count(), 2);
        // alignment markers are stripped from the rendered source
        assert!(html.contains("data-equation-content=\"x = 1\""));
        assert!(html.contains("data-equation-content=\"y = 2\""));
    }

    #[test]
    fn test_align_is_one_image_with_markers() {
        let html = body_only(&document(
            "\\begin{align}\nx &= 1 \\\\\ny &= 2\n\\end{align}",
        ));
        assert_eq!(html.matches("class=\"equation_image").count(), 1);
        assert!(html.contains("%5Cbegin%7Balign%7D"));
    }

    #[test]
    fn test_align_surrounded_by_text() {
        let html = body_only(&document(
            "Before text.\n\\begin{align}\nx &= 1\n\\end{align}\nAfter text.",
        ));
        assert!(html.contains("Before text"));
        assert!(html.contains("After text"));
        assert!(html.contains("equation_image"));
    }

    #[test]
    fn test_commented_out_dollar_does_not_swallow_text() {
        let html = body_only(&document("% TODO check the $5 fee\nWe pay $3$ for it."));
        assert!(html.contains("We pay"));
        assert!(html.contains("for it."));
        assert_eq!(html.matches("class=\"equation_image\"").count(), 1);
        assert!(html.contains("data-equation-content=\"3\""));
    }

    #[test]
    fn test_math_inside_comment_is_dropped_with_the_comment() {
        let result =
            latex_to_canvas_html_with_diagnostics(&document("% note: $x^2$\nplain text"));
        assert!(result.html.contains("plain text"));
        assert!(!result.html.contains("class=\"equation_image"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_escaped_dollar_stays_text() {
        let html = body_only(&document(r"The price is \$5."));
        assert!(!html.contains("equation_image"));
        assert!(html.contains(r"\$5"));
    }

    #[test]
    fn test_unterminated_math_keeps_source_and_warns() {
        let result =
            latex_to_canvas_html_with_diagnostics(&document("broken $x^2 + 1 and more text"));
        assert!(result.html.contains("$x^2 + 1"));
        assert!(result
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::UnterminatedMath));
        // conversion still finishes
        assert!(result.html.contains("more text"));
    }

    #[test]
    fn test_empty_math_span_warns_and_is_dropped() {
        let result = latex_to_canvas_html_with_diagnostics(&document("text $$  $$ more"));
        assert!(!result.html.contains("class=\"equation_image"));
        assert!(result
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::EmptyMath));
    }
}

// ============================================================================
// Structure: sections and lists
// ============================================================================

mod structure {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_section_hierarchy() {
        let html = body_only(&document(
            "\\section{Problems}\n\\subsection{Setup}\n\\subsubsection{Details}",
        ));
        assert!(html.contains("<h3>Problems</h3>"));
        assert!(html.contains("<h4>Setup</h4>"));
        assert!(html.contains("<h5>Details</h5>"));
    }

    #[test]
    fn test_untitled_subsections_are_numbered_per_section() {
        let html = body_only(&document(
            "\\section{A}\n\\subsection{}\n\\subsection{}\n\\section{B}\n\\subsection{}",
        ));
        assert_eq!(html.matches("<h4>Part 1</h4>").count(), 2);
        assert_eq!(html.matches("<h4>Part 2</h4>").count(), 1);
    }

    #[test]
    fn test_nested_lists_stay_balanced() {
        let depth = 4;
        let mut body = String::new();
        for _ in 0..depth {
            body.push_str("\\begin{itemize}\n\\item level\n");
        }
        for _ in 0..depth {
            body.push_str("\\end{itemize}\n");
        }
        let result = latex_to_canvas_html_with_diagnostics(&document(&body));
        assert_eq!(result.html.matches("<ul>").count(), depth);
        assert_eq!(result.html.matches("</ul>").count(), depth);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_items_with_math() {
        let html = body_only(&document(
            "\\begin{enumerate}\n\\item Solve $x + 1 = 2$.\n\\item Prove $e > 2$.\n\\end{enumerate}",
        ));
        assert!(html.contains("<ol>"));
        assert_eq!(html.matches("<li>").count(), 2);
        assert_eq!(html.matches("class=\"equation_image\"").count(), 2);
    }

    #[test]
    fn test_unbalanced_end_warns_but_output_continues() {
        let result = latex_to_canvas_html_with_diagnostics(&document(
            "before\n\\end{itemize}\nafter",
        ));
        assert!(result.html.contains("before"));
        assert!(result.html.contains("after"));
        assert!(result
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::UnbalancedEnvironment));
    }

    #[test]
    fn test_unclosed_list_is_closed_at_end() {
        let result =
            latex_to_canvas_html_with_diagnostics(&document("\\begin{itemize}\n\\item a"));
        assert!(result.html.contains("</ul>"));
        assert!(result
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::UnbalancedEnvironment));
    }
}

// ============================================================================
// Images and alt text
// ============================================================================

mod images {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bracket_alt_beats_comment_alt() {
        let html = body_only(&document(
            "% alt: From the comment\n\\includegraphics[alt={From the option}]{fig.png}",
        ));
        assert!(html.contains("alt=\"From the option\""));
        assert!(!html.contains("From the comment"));
    }

    #[test]
    fn test_comment_alt_is_used_when_no_option() {
        let html = body_only(&document(
            "% alt: A free body diagram\n\\includegraphics[width=3in]{fbd.png}",
        ));
        assert!(html.contains("alt=\"A free body diagram\""));
    }

    #[test]
    fn test_filename_fallback_alt() {
        let html = body_only(&document("\\includegraphics{figures/diagram.png}"));
        assert!(html.contains("alt=\"Image: diagram.png\""));
    }

    #[test]
    fn test_image_is_a_block() {
        let html = body_only(&document("text\n\n\\includegraphics{x.png}\n\nmore"));
        assert!(html.contains("<img src=\"x.png\""));
        assert!(!html.contains("<p><img src=\"x.png\""));
    }
}

// ============================================================================
// Document shape
// ============================================================================

mod documents {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_conversion_is_deterministic() {
        let input = document(
            "\\section{HW}\n$a + b$\n\n\\begin{itemize}\n\\item one\n\\end{itemize}",
        );
        assert_eq!(latex_to_canvas_html(&input), latex_to_canvas_html(&input));
    }

    #[test]
    fn test_page_shell_by_default() {
        let html = latex_to_canvas_html(&document("hello"));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<p>hello</p>"));
    }

    #[test]
    fn test_body_only_option_omits_shell() {
        let html = body_only(&document("hello"));
        assert!(!html.contains("<!DOCTYPE html>"));
        assert_eq!(html, "<p>hello</p>");
    }

    #[test]
    fn test_maketitle_uses_preamble_metadata() {
        let input = "\\documentclass{article}\n\\title{Homework 3}\n\\author{A. Student}\n\
                     \\begin{document}\n\\maketitle\nBody text.\n\\end{document}\n";
        let html = latex_to_canvas_html(input);
        assert!(html.contains("<h2>Homework 3</h2>"));
        assert!(html.contains("<p><em>A. Student</em></p>"));
        assert!(html.contains("<title>Homework 3</title>"));
    }

    #[test]
    fn test_fragment_without_document_markers_converts() {
        let html = body_only("Just a fragment with $x$.");
        assert!(html.contains("equation_image"));
        assert!(html.contains("Just a fragment"));
    }

    #[test]
    fn test_preamble_does_not_leak_into_output() {
        let html = body_only(&document("body"));
        assert!(!html.contains("documentclass"));
        assert_eq!(html, "<p>body</p>");
    }

    #[test]
    fn test_double_backslash_is_a_line_break() {
        let html = body_only(&document("line one \\\\\nline two"));
        assert!(html.contains("<br>"));
    }

    #[test]
    fn test_custom_equation_endpoint() {
        let options = HtmlOptions {
            equation_base_url: "https://render.example/png/".to_string(),
            page_shell: false,
        };
        let html = latex_to_canvas_html_with_options(&document("$x$"), options);
        assert!(html.contains("src=\"https://render.example/png/x?scale=1\""));
    }
}

// ============================================================================
// Warnings
// ============================================================================

mod warnings {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unsupported_command_warns_once() {
        let result = latex_to_canvas_html_with_diagnostics(&document(
            "\\noindent a\n\n\\noindent b\n\n\\vspace{1em}",
        ));
        let unsupported: Vec<_> = result
            .warnings
            .iter()
            .filter(|w| w.kind == WarningKind::UnsupportedConstruct)
            .collect();
        assert_eq!(unsupported.len(), 2);
    }

    #[test]
    fn test_clean_document_has_no_warnings() {
        let result = latex_to_canvas_html_with_diagnostics(&document(
            "\\section{One}\nText with $math$.\n\n\\begin{itemize}\n\\item ok\n\\end{itemize}",
        ));
        assert!(result.warnings.is_empty(), "{:?}", result.format_warnings());
    }

    #[test]
    fn test_warnings_format_with_kind_and_location() {
        let result = latex_to_canvas_html_with_diagnostics(&document("$x"));
        let formatted = result.format_warnings();
        assert_eq!(formatted.len(), 1);
        assert!(formatted[0].contains("unterminated math"));
        assert!(formatted[0].contains("offset"));
    }
}
