//! Math span extraction
//!
//! A single left-to-right scan lifts every math region out of the document
//! text, leaving a unique placeholder token at its position. Delimiter
//! matching is non-nested: the first closing delimiter of the same kind
//! terminates a span. An unterminated delimiter produces a warning and the
//! remainder of the document is kept as ordinary text.

use super::context::ConversionState;
use super::ConversionWarning;

/// A region of math markup lifted out of the document text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathSpan {
    /// Raw LaTeX between the delimiters
    pub source: String,
    /// Display mode (own line) vs inline
    pub display: bool,
    /// Byte offset of the span start in the document body
    pub start: usize,
    /// Byte offset one past the span end in the document body
    pub end: usize,
}

/// Result of one extraction pass
#[derive(Debug, Clone, Default)]
pub struct ExtractedMath {
    /// Document text with each math span replaced by a placeholder token
    pub residual: String,
    /// Extracted spans in left-to-right document order
    pub spans: Vec<MathSpan>,
    /// Placeholder token for each span, index-aligned with `spans`
    pub tokens: Vec<String>,
}

/// Display environments lifted whole into a single span. For all but
/// `equation` the `\begin`/`\end` markers stay in the span source; the
/// Canvas renderer understands them.
const DISPLAY_ENVIRONMENTS: [(&str, bool); 6] = [
    ("equation*", false),
    ("equation", false),
    ("align*", true),
    ("align", true),
    ("cases", true),
    ("array", true),
];

/// Pick a placeholder prefix guaranteed absent from the input.
fn placeholder_prefix(text: &str) -> String {
    let mut prefix = String::from("@@EQN@");
    while text.contains(&prefix) {
        prefix.push('@');
    }
    prefix
}

/// Find `delim` in `haystack`, skipping backslash-escaped characters. The
/// delimiter check runs before escape handling so delimiters that start
/// with a backslash (`\]`) are still found.
fn find_delim(haystack: &str, delim: &str) -> Option<usize> {
    let mut skip_next = false;
    for (idx, ch) in haystack.char_indices() {
        if skip_next {
            skip_next = false;
            continue;
        }
        if haystack[idx..].starts_with(delim) {
            return Some(idx);
        }
        if ch == '\\' {
            skip_next = true;
        }
    }
    None
}

/// Scan the document body and lift out all math regions.
pub fn extract_math_spans(state: &mut ConversionState, text: &str) -> ExtractedMath {
    let prefix = placeholder_prefix(text);
    let mut out = ExtractedMath::default();
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];

        // Unescaped % starts a comment; copy it through to end of line so
        // commented-out delimiters stay inert. Escaped \% never reaches
        // this branch (the escape copy below consumes both chars).
        if rest.starts_with('%') {
            match rest.find('\n') {
                Some(nl) => {
                    out.residual.push_str(&rest[..nl]);
                    i += nl;
                }
                None => {
                    out.residual.push_str(rest);
                    i = text.len();
                }
            }
            continue;
        }

        // eqnarray blocks split into one display span per row
        if rest.starts_with("\\begin{eqnarray}") || rest.starts_with("\\begin{eqnarray*}") {
            let starred = rest.starts_with("\\begin{eqnarray*}");
            let open = if starred {
                "\\begin{eqnarray*}"
            } else {
                "\\begin{eqnarray}"
            };
            let close = if starred {
                "\\end{eqnarray*}"
            } else {
                "\\end{eqnarray}"
            };
            match rest[open.len()..].find(close) {
                Some(rel) => {
                    let body_start = i + open.len();
                    let body = &text[body_start..body_start + rel];
                    push_eqnarray_rows(&prefix, &mut out, body, body_start);
                    i = body_start + rel + close.len();
                }
                None => {
                    state.warn(ConversionWarning::unterminated(open, i));
                    out.residual.push_str(rest);
                    i = text.len();
                }
            }
            continue;
        }

        // Other display environments become one span each
        if let Some((env, keep_markers)) = match_display_environment(rest) {
            let open = format!("\\begin{{{}}}", env);
            let close = format!("\\end{{{}}}", env);
            match rest[open.len()..].find(close.as_str()) {
                Some(rel) => {
                    let total = open.len() + rel + close.len();
                    let source = if keep_markers {
                        rest[..total].trim().to_string()
                    } else {
                        rest[open.len()..open.len() + rel].trim().to_string()
                    };
                    let token = format!("{}{}@@", prefix, out.spans.len());
                    push_block_token(&mut out.residual, &token);
                    out.spans.push(MathSpan {
                        source,
                        display: true,
                        start: i,
                        end: i + total,
                    });
                    out.tokens.push(token);
                    i += total;
                }
                None => {
                    state.warn(ConversionWarning::unterminated(&open, i));
                    out.residual.push_str(rest);
                    i = text.len();
                }
            }
            continue;
        }

        // $$...$$ display math (checked before single $)
        if rest.starts_with("$$") {
            match find_delim(&rest[2..], "$$") {
                Some(rel) => {
                    let source = &rest[2..2 + rel];
                    push_span(&prefix, &mut out, source, true, i, i + rel + 4);
                    i += rel + 4;
                }
                None => {
                    state.warn(ConversionWarning::unterminated("$$", i));
                    out.residual.push_str(rest);
                    i = text.len();
                }
            }
            continue;
        }

        // \[...\] display math
        if rest.starts_with("\\[") {
            match find_delim(&rest[2..], "\\]") {
                Some(rel) => {
                    let source = &rest[2..2 + rel];
                    push_span(&prefix, &mut out, source, true, i, i + rel + 4);
                    i += rel + 4;
                }
                None => {
                    state.warn(ConversionWarning::unterminated("\\[", i));
                    out.residual.push_str(rest);
                    i = text.len();
                }
            }
            continue;
        }

        // Any other escape (including \$) is not a delimiter; copy it whole
        if rest.starts_with('\\') {
            out.residual.push('\\');
            i += 1;
            if let Some(ch) = text[i..].chars().next() {
                out.residual.push(ch);
                i += ch.len_utf8();
            }
            continue;
        }

        // $...$ inline math
        if rest.starts_with('$') {
            match find_delim(&rest[1..], "$") {
                Some(rel) => {
                    let source = &rest[1..1 + rel];
                    push_span(&prefix, &mut out, source, false, i, i + rel + 2);
                    i += rel + 2;
                }
                None => {
                    state.warn(ConversionWarning::unterminated("$", i));
                    out.residual.push_str(rest);
                    i = text.len();
                }
            }
            continue;
        }

        let ch = rest.chars().next().expect("non-empty rest");
        out.residual.push(ch);
        i += ch.len_utf8();
    }

    out
}

fn match_display_environment(rest: &str) -> Option<(&'static str, bool)> {
    let name = rest.strip_prefix("\\begin{")?;
    DISPLAY_ENVIRONMENTS
        .iter()
        .copied()
        .find(|(env, _)| name.strip_prefix(env).is_some_and(|after| after.starts_with('}')))
}

fn push_span(
    prefix: &str,
    out: &mut ExtractedMath,
    source: &str,
    display: bool,
    start: usize,
    end: usize,
) {
    let token = format!("{}{}@@", prefix, out.spans.len());
    out.residual.push_str(&token);
    out.spans.push(MathSpan {
        source: source.to_string(),
        display,
        start,
        end,
    });
    out.tokens.push(token);
}

/// Split an eqnarray body on its `\\` row separators; each row becomes an
/// independent display span with alignment markers stripped.
fn push_eqnarray_rows(prefix: &str, out: &mut ExtractedMath, body: &str, body_start: usize) {
    let mut offset = 0;
    for row in body.split("\\\\") {
        let row_start = body_start + offset;
        let row_end = row_start + row.len();
        offset += row.len() + 2;

        let cleaned = row.replace('&', "");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            continue;
        }

        let token = format!("{}{}@@", prefix, out.spans.len());
        push_block_token(&mut out.residual, &token);
        out.spans.push(MathSpan {
            source: cleaned.to_string(),
            display: true,
            start: row_start,
            end: row_end.min(body_start + body.len()),
        });
        out.tokens.push(token);
    }
}

/// Append a token on its own paragraph so the assembler renders it as a
/// block.
fn push_block_token(residual: &mut String, token: &str) {
    if !residual.is_empty() && !residual.ends_with("\n\n") {
        if residual.ends_with('\n') {
            residual.push('\n');
        } else {
            residual.push_str("\n\n");
        }
    }
    residual.push_str(token);
    residual.push_str("\n\n");
}
