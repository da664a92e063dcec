//! Keyword strategy: rules from free-text lines mentioning routing terms

use indexmap::IndexMap;
use scraper::{ElementRef, Html};

/// Lines containing any of these (case-insensitively) are treated as rules
pub const ROUTING_KEYWORDS: [&str; 5] = ["route", "escalate", "team", "scope", "responsibility"];

/// Elements that start and end a line of visible text
const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "br",
    "dd",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "tr",
    "ul",
];

/// Elements whose content is never visible
const HIDDEN_ELEMENTS: &[&str] = &["head", "noscript", "script", "style", "template"];

/// Extract rules from keyword-bearing lines
///
/// A matching line with exactly one `:` becomes `key: value` (both trimmed).
/// Any other matching line becomes a key with an empty value.
pub fn extract_keyword_lines(document: &Html) -> IndexMap<String, String> {
    let mut entries = IndexMap::new();

    for line in visible_lines(document) {
        if !mentions_routing_keyword(&line) {
            continue;
        }

        let parts: Vec<&str> = line.split(':').collect();
        if let [key, value] = parts.as_slice() {
            entries.insert(key.trim().to_string(), value.trim().to_string());
        } else {
            entries.insert(line.trim().to_string(), String::new());
        }
    }

    entries
}

/// Case-insensitive substring test against [`ROUTING_KEYWORDS`]
pub fn mentions_routing_keyword(line: &str) -> bool {
    let lowered = line.to_lowercase();
    ROUTING_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

/// Plain text of the document split on block boundaries and line breaks
///
/// Blank lines are dropped; lines are returned untrimmed.
pub fn visible_lines(document: &Html) -> Vec<String> {
    let mut text = String::new();
    push_visible_text(document.root_element(), &mut text);

    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

fn push_visible_text(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    if HIDDEN_ELEMENTS.contains(&name) {
        return;
    }

    let is_block = BLOCK_ELEMENTS.contains(&name);
    if is_block {
        out.push('\n');
    }

    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            push_visible_text(child_element, out);
        }
    }

    if is_block {
        out.push('\n');
    }
}
