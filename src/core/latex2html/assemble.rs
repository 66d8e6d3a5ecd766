//! Final document assembly
//!
//! Takes the translated lines, groups them into blocks on blank lines,
//! substitutes equation images back in place of their placeholder tokens,
//! wraps plain text blocks in paragraphs, and optionally adds the page
//! shell.

use super::context::ConversionState;
use super::utils::escape_html;

/// Prefixes that mark a block as already-formed HTML, exempt from
/// paragraph wrapping.
const BLOCK_PREFIXES: [&str; 10] = [
    "<h", "<img", "<ul", "<ol", "<li", "</ol", "</ul", "<div", "<blockquote", "<p",
];

/// Stitch the translated lines and resolved equation images into the final
/// HTML document.
pub fn assemble_document(
    state: &ConversionState,
    lines: &[String],
    tokens: &[String],
    images: &[Option<String>],
) -> String {
    let mut parts = Vec::new();

    for block in blocks(lines) {
        let raw = block.join("\n");
        let substituted = substitute_tokens(&raw, tokens, images);
        let trimmed = substituted.trim();
        if trimmed.is_empty() {
            continue;
        }
        if is_block_element(trimmed) {
            parts.push(trimmed.to_string());
        } else {
            // Double backslash is a line break in ordinary text only, and
            // it is replaced before equation substitution so LaTeX inside
            // img attributes is untouched.
            let text = substitute_tokens(&raw.replace("\\\\", "<br>"), tokens, images);
            parts.push(format!("<p>{}</p>", text.trim()));
        }
    }

    let body = parts.join("\n");
    if state.options.page_shell {
        page_shell(state.title.as_deref(), &body)
    } else {
        body
    }
}

fn substitute_tokens(text: &str, tokens: &[String], images: &[Option<String>]) -> String {
    let mut out = text.to_string();
    for (token, image) in tokens.iter().zip(images) {
        if out.contains(token.as_str()) {
            out = out.replace(token.as_str(), image.as_deref().unwrap_or(""));
        }
    }
    out
}

/// Group lines into blocks separated by blank lines.
fn blocks(lines: &[String]) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.clone());
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn is_block_element(text: &str) -> bool {
    BLOCK_PREFIXES.iter().any(|prefix| text.starts_with(prefix))
}

/// Wrap the body in a standalone page. Canvas renders equation images
/// directly, so the shell carries only typography, no script includes.
fn page_shell(title: Option<&str>, body: &str) -> String {
    let title = escape_html(title.unwrap_or("Homework"));
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <style>\n\
         body {{ font-family: Georgia, serif; max-width: 50em; margin: 2em auto; line-height: 1.5; }}\n\
         img.equation_image {{ vertical-align: middle; }}\n\
         </style>\n\
         </head>\n\
         <body>\n\
         {body}\n\
         </body>\n\
         </html>\n"
    )
}
