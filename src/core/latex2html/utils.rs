//! Small text helpers shared across the converter

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TITLE: Regex = Regex::new(r"(?s)\\title\{(.+?)\}").unwrap();
    static ref AUTHOR: Regex = Regex::new(r"(?s)\\author\{(.+?)\}").unwrap();
    static ref DATE: Regex = Regex::new(r"(?s)\\date\{(.+?)\}").unwrap();
}

/// Split a LaTeX line into code and comment, ignoring escaped percent signs.
pub fn split_unescaped_percent(line: &str) -> (&str, Option<&str>) {
    let mut skip_next = false;
    for (idx, ch) in line.char_indices() {
        if skip_next {
            skip_next = false;
            continue;
        }
        match ch {
            '\\' => skip_next = true,
            '%' => return (&line[..idx], Some(&line[idx + 1..])),
            _ => {}
        }
    }
    (line, None)
}

/// Remove a single pair of surrounding braces if present.
pub fn strip_braces(s: &str) -> &str {
    let s = s.trim();
    if let Some(inner) = s.strip_prefix('{').and_then(|rest| rest.strip_suffix('}')) {
        inner.trim()
    } else {
        s
    }
}

/// Escape text for HTML element and attribute contexts.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Pull title/author/date from the preamble for the title block.
pub fn extract_metadata(text: &str) -> (Option<String>, Option<String>, Option<String>) {
    let capture = |re: &Regex| {
        re.captures(text)
            .map(|caps| caps[1].trim().to_string())
            .filter(|s| !s.is_empty())
    };
    (capture(&TITLE), capture(&AUTHOR), capture(&DATE))
}

/// Extract content inside `\begin{document}...\end{document}`.
///
/// Documents without an explicit body (fragments) are converted whole.
pub fn extract_body(text: &str) -> &str {
    const BEGIN: &str = "\\begin{document}";
    const END: &str = "\\end{document}";
    match (text.find(BEGIN), text.rfind(END)) {
        (Some(b), Some(e)) if b + BEGIN.len() <= e => &text[b + BEGIN.len()..e],
        _ => text,
    }
}
