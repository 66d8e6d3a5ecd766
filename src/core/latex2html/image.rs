//! `\includegraphics` references and alt-text resolution

use indexmap::IndexMap;

use super::utils::{escape_html, strip_braces};

/// Option keys that carry alt text, in resolution priority order. The order
/// here is fixed so resolution never depends on map iteration order.
const ALT_KEYS: [&str; 3] = ["alt", "alttext", "description"];

/// One image inclusion with its resolved alt text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub path: String,
    pub alt_text: String,
    /// Key/value pairs from the optional bracket argument, in source order
    pub options: IndexMap<String, String>,
}

impl ImageReference {
    /// Build a reference from a raw `\includegraphics` invocation.
    ///
    /// `pending_alt` is alt text supplied by a `% alt:` comment on the
    /// preceding line; it loses to an explicit bracket option.
    pub fn new(options_src: Option<&str>, path: &str, pending_alt: Option<&str>) -> Self {
        let options = parse_options(options_src.unwrap_or(""));
        let alt_text = resolve_alt_text(&options, pending_alt, path);
        ImageReference {
            path: path.trim().to_string(),
            alt_text,
            options,
        }
    }

    /// Render as an HTML image element
    pub fn to_html(&self) -> String {
        format!(
            "<img src=\"{}\" alt=\"{}\">",
            escape_html(&self.path),
            escape_html(&self.alt_text)
        )
    }
}

/// Split a LaTeX option list like `width=0.5\textwidth, alt={a, b}` on
/// top-level commas only.
pub fn split_options(opts: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for ch in opts.chars() {
        match ch {
            '{' => {
                depth += 1;
                current.push(ch);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

/// Parse a bracket option list into an ordered key/value map. Keys are
/// lowercased; flag options keep an empty value.
pub fn parse_options(opts: &str) -> IndexMap<String, String> {
    let mut map = IndexMap::new();
    for part in split_options(opts) {
        match part.split_once('=') {
            Some((key, value)) => {
                map.insert(key.trim().to_lowercase(), value.trim().to_string());
            }
            None => {
                if !part.is_empty() {
                    map.insert(part.to_lowercase(), String::new());
                }
            }
        }
    }
    map
}

/// Resolve alt text by fixed priority: explicit bracket option, preceding
/// `% alt:` comment, filename-derived default. Never fails.
pub fn resolve_alt_text(
    options: &IndexMap<String, String>,
    pending_alt: Option<&str>,
    path: &str,
) -> String {
    for key in ALT_KEYS {
        if let Some(value) = options.get(key) {
            let stripped = strip_braces(value);
            if !stripped.is_empty() {
                return stripped.to_string();
            }
        }
    }
    if let Some(pending) = pending_alt {
        let trimmed = pending.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    format!("Image: {}", file_name(path))
}

fn file_name(path: &str) -> &str {
    let trimmed = path.trim();
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_options_respects_braces() {
        let parts = split_options("width=0.5\\textwidth, alt={a, b}, draft");
        assert_eq!(parts, vec!["width=0.5\\textwidth", "alt={a, b}", "draft"]);
    }

    #[test]
    fn test_explicit_alt_wins_over_comment() {
        let reference =
            ImageReference::new(Some("alt={A circuit}"), "circuit.png", Some("From comment"));
        assert_eq!(reference.alt_text, "A circuit");
    }

    #[test]
    fn test_alttext_key_is_recognized() {
        let reference = ImageReference::new(Some("alttext=Graph of f"), "f.png", None);
        assert_eq!(reference.alt_text, "Graph of f");
    }

    #[test]
    fn test_comment_alt_wins_over_fallback() {
        let reference = ImageReference::new(Some("width=3in"), "plot.png", Some("A plot"));
        assert_eq!(reference.alt_text, "A plot");
    }

    #[test]
    fn test_filename_fallback() {
        let reference = ImageReference::new(None, "figures/diagram.png", None);
        assert_eq!(reference.alt_text, "Image: diagram.png");
    }

    #[test]
    fn test_alt_priority_ignores_option_order() {
        // description before alt in source order; alt still wins
        let reference = ImageReference::new(Some("description=second, alt=first"), "x.png", None);
        assert_eq!(reference.alt_text, "first");
    }

    #[test]
    fn test_to_html_escapes() {
        let reference = ImageReference::new(Some("alt={a<b}"), "x.png", None);
        assert_eq!(reference.to_html(), "<img src=\"x.png\" alt=\"a&lt;b\">");
    }
}
