//! Environment translation for LaTeX to HTML conversion
//!
//! A single-pass, line-oriented state machine over the residual (math
//! placeholder substituted) text. Recognized constructs are rewritten to
//! HTML; everything else passes through verbatim with one warning per
//! distinct construct. Source order is preserved exactly.

use lazy_static::lazy_static;
use phf::phf_set;
use regex::{Captures, Regex};

use super::context::{ConversionState, ListKind};
use super::image::ImageReference;
use super::utils::{escape_html, split_unescaped_percent};
use super::ConversionWarning;

lazy_static! {
    static ref BEGIN_LIST: Regex =
        Regex::new(r"^\s*\\begin\{(itemize|enumerate)\}(?:\[[^\]]*\])?\s*$").unwrap();
    static ref END_LIST: Regex = Regex::new(r"^\s*\\end\{(itemize|enumerate)\}\s*$").unwrap();
    static ref ITEM_LINE: Regex = Regex::new(r"^\s*\\item\b\s*").unwrap();
    static ref LIST_TOKEN: Regex =
        Regex::new(r"\\(begin|end)\{(itemize|enumerate)\}(?:\[[^\]]*\])?").unwrap();
    static ref SECTION: Regex = Regex::new(r"\\section\*?\{([^}]*)\}").unwrap();
    static ref SUBSECTION: Regex = Regex::new(r"\\subsection\*?\{([^}]*)\}").unwrap();
    static ref SUBSUBSECTION: Regex = Regex::new(r"\\subsubsection\*?\{([^}]*)\}").unwrap();
    static ref EMPH: Regex = Regex::new(r"\\emph\{([^}]*)\}").unwrap();
    static ref TEXTBF: Regex = Regex::new(r"\\textbf\{([^}]*)\}").unwrap();
    static ref BF_GROUP: Regex = Regex::new(r"\{\\bf\s+([^}]*)\}").unwrap();
    static ref INCLUDEGRAPHICS: Regex =
        Regex::new(r"\\includegraphics(?:\[([^\]]*)\])?\{([^}]*)\}").unwrap();
    static ref MINIPAGE: Regex =
        Regex::new(r"\\begin\{minipage\}(?:\[[^\]]*\])?(?:\{[^}]*\})?|\\end\{minipage\}").unwrap();
    static ref ENV_TOKEN: Regex = Regex::new(r"\\(?:begin|end)\{([A-Za-z]+\*?)\}").unwrap();
    static ref COMMAND: Regex = Regex::new(r"\\([A-Za-z]+)").unwrap();
    static ref ALT_COMMENT: Regex = Regex::new(r"(?i)\balt\s*:\s*(.+)").unwrap();
}

/// Environments the translator understands. Anything else warns once and
/// passes through verbatim.
static KNOWN_ENVIRONMENTS: phf::Set<&'static str> = phf_set! {
    "itemize",
    "enumerate",
    "minipage",
    "document",
    "eqnarray",
};

/// Commands the translator understands (or deliberately ignores).
static KNOWN_COMMANDS: phf::Set<&'static str> = phf_set! {
    "section",
    "subsection",
    "subsubsection",
    "begin",
    "end",
    "item",
    "includegraphics",
    "maketitle",
    "emph",
    "textbf",
    "bf",
    "title",
    "author",
    "date",
    "documentclass",
    "usepackage",
};

/// Translate the residual document body line by line.
pub fn translate_body(state: &mut ConversionState, residual: &str) -> Vec<String> {
    let mut out = Vec::new();

    for raw_line in residual.lines() {
        let (code, comment) = split_unescaped_percent(raw_line);

        // Alt text may be supplied in a comment preceding an image.
        let mut alt_set_here = false;
        if let Some(comment) = comment {
            if let Some(caps) = ALT_COMMENT.captures(comment) {
                state.pending_alt = Some(caps[1].trim().to_string());
                alt_set_here = true;
            }
        }

        let line = code.trim_end();
        if line.trim().is_empty() {
            // Blank lines inside a list do not break paragraphs
            if state.list_stack.is_empty() {
                out.push(String::new());
            }
            continue;
        }

        translate_line(state, line, &mut out);

        // A comment alt only survives until the next non-blank code line
        if !alt_set_here {
            state.pending_alt = None;
        }
    }

    // Unbalanced environments: warn and close whatever is still open
    while let Some(ctx) = state.pop_list() {
        state.warn(ConversionWarning::unbalanced(format!(
            "\\begin{{{}}} left open at end of document",
            ctx.kind.env_name()
        )));
        if ctx.item_open {
            out.push("</li>".to_string());
        }
        out.push(format!("</{}>", ctx.kind.tag()));
    }

    out
}

fn translate_line(state: &mut ConversionState, line: &str, out: &mut Vec<String>) {
    if let Some(caps) = BEGIN_LIST.captures(line) {
        let kind = list_kind(&caps[1]);
        out.push(format!("<{}>", kind.tag()));
        state.push_list(kind);
        return;
    }

    if let Some(caps) = END_LIST.captures(line) {
        let kind = list_kind(&caps[1]);
        out.extend(close_list(state, kind));
        return;
    }

    if let Some(m) = ITEM_LINE.find(line) {
        translate_item(state, &line[m.end()..], out);
        return;
    }

    if line.trim() == "\\maketitle" {
        emit_title_block(state, out);
        return;
    }

    let translated = translate_text_line(state, line);
    if !translated.trim().is_empty() {
        out.push(translated);
    }
}

fn translate_item(state: &mut ConversionState, text: &str, out: &mut Vec<String>) {
    if state.list_stack.is_empty() {
        state.warn(ConversionWarning::unbalanced(
            "\\item outside any list environment",
        ));
        out.push(format!("\\item {}", text.trim()).trim_end().to_string());
        return;
    }

    let close_previous = state
        .list_stack
        .last()
        .map(|ctx| ctx.item_open)
        .unwrap_or(false);
    if close_previous {
        out.push("</li>".to_string());
    }
    if let Some(top) = state.list_stack.last_mut() {
        top.item_open = true;
    }

    let text = text.trim();
    if text.is_empty() {
        out.push("<li>".to_string());
    } else {
        let inner = translate_text_line(state, text);
        out.push(format!("<li>{}", inner));
    }
}

/// Close the innermost list, warning on mismatch or underflow. Returns the
/// closing tags to emit (best-effort recovery: close whatever is open).
fn close_list(state: &mut ConversionState, kind: ListKind) -> Vec<String> {
    let mut out = Vec::new();
    match state.pop_list() {
        Some(ctx) => {
            if ctx.kind != kind {
                state.warn(ConversionWarning::unbalanced(format!(
                    "\\end{{{}}} closes an open {} environment",
                    kind.env_name(),
                    ctx.kind.env_name()
                )));
            }
            if ctx.item_open {
                out.push("</li>".to_string());
            }
            out.push(format!("</{}>", ctx.kind.tag()));
        }
        None => {
            state.warn(ConversionWarning::unbalanced(format!(
                "\\end{{{}}} without a matching \\begin",
                kind.env_name()
            )));
        }
    }
    out
}

fn translate_text_line(state: &mut ConversionState, line: &str) -> String {
    let mut line = line.to_string();

    if SECTION.is_match(&line) {
        state.subsection_counter = 0;
    }
    line = SECTION.replace_all(&line, "<h3>$1</h3>").into_owned();
    line = SUBSECTION
        .replace_all(&line, |caps: &Captures| {
            let content = caps[1].trim().to_string();
            if content.is_empty() {
                state.subsection_counter += 1;
                format!("<h4>Part {}</h4>", state.subsection_counter)
            } else {
                format!("<h4>{}</h4>", content)
            }
        })
        .into_owned();
    line = SUBSUBSECTION.replace_all(&line, "<h5>$1</h5>").into_owned();

    line = EMPH.replace_all(&line, "<em>$1</em>").into_owned();
    line = TEXTBF.replace_all(&line, "<strong>$1</strong>").into_owned();
    line = BF_GROUP
        .replace_all(&line, "<strong>$1</strong>")
        .into_owned();

    line = rewrite_inline_list_tokens(state, &line);

    if line.contains("\\includegraphics") {
        let pending = state.pending_alt.take();
        line = INCLUDEGRAPHICS
            .replace_all(&line, |caps: &Captures| {
                ImageReference::new(caps.get(1).map(|m| m.as_str()), &caps[2], pending.as_deref())
                    .to_html()
            })
            .into_owned();
    }

    // Layout-only container: drop the markers, keep the content in place
    line = MINIPAGE.replace_all(&line, "").into_owned();

    warn_unknown_constructs(state, &line);

    line.trim_end().to_string()
}

/// Handle list begin/end tokens that share a line with other content, so
/// the stack stays balanced no matter how the source is formatted.
fn rewrite_inline_list_tokens(state: &mut ConversionState, line: &str) -> String {
    if !LIST_TOKEN.is_match(line) {
        return line.to_string();
    }
    let mut out = String::new();
    let mut last = 0;
    for caps in LIST_TOKEN.captures_iter(line) {
        let m = caps.get(0).expect("whole match");
        out.push_str(&line[last..m.start()]);
        let kind = list_kind(&caps[2]);
        if &caps[1] == "begin" {
            state.push_list(kind);
            out.push_str(&format!("<{}>", kind.tag()));
        } else {
            out.push_str(&close_list(state, kind).join(""));
        }
        last = m.end();
    }
    out.push_str(&line[last..]);
    out
}

fn warn_unknown_constructs(state: &mut ConversionState, line: &str) {
    for caps in ENV_TOKEN.captures_iter(line) {
        let name = caps[1].trim_end_matches('*').to_string();
        if !KNOWN_ENVIRONMENTS.contains(name.as_str()) {
            state.warn_once(&format!("\\begin{{{}}}", name));
        }
    }
    for caps in COMMAND.captures_iter(line) {
        let name = caps[1].to_string();
        if !KNOWN_COMMANDS.contains(name.as_str()) {
            state.warn_once(&format!("\\{}", name));
        }
    }
}

fn emit_title_block(state: &mut ConversionState, out: &mut Vec<String>) {
    // \maketitle without a captured \title is dropped silently
    let Some(title) = state.title.clone() else {
        return;
    };
    out.push(format!("<h2>{}</h2>", escape_html(&title)));
    if let Some(author) = &state.author {
        out.push(format!("<p><em>{}</em></p>", escape_html(author)));
    }
    if let Some(date) = &state.date {
        out.push(format!("<p><em>{}</em></p>", escape_html(date)));
    }
    out.push(String::new());
}

fn list_kind(env: &str) -> ListKind {
    if env == "itemize" {
        ListKind::Unordered
    } else {
        ListKind::Ordered
    }
}
