//! Allow-list HTML sanitizer for display-ready record text.
//!
//! Record fields are rendered directly by downstream consumers, so any markup
//! a model sneaks into a value is reduced here to a small allow-list of
//! structural tags. Disallowed tags are removed (their inner text kept),
//! `script` and `style` elements are dropped along with their contents, and
//! attributes are filtered down to `class` plus `href`/`title` on links.

use serde_json::Value;

/// Tags preserved by [`sanitize`].
const ALLOWED_TAGS: &[&str] = &[
    "a", "b", "br", "em", "h1", "h2", "h3", "i", "li", "ol", "p", "strong", "ul",
];

/// Attributes preserved on any allowed tag.
const GLOBAL_ATTRIBUTES: &[&str] = &["class"];

/// Attributes additionally preserved on `<a>`.
const LINK_ATTRIBUTES: &[&str] = &["href", "title"];

/// Elements whose entire contents are dropped, not just the tags.
const DROP_CONTENT_TAGS: &[&str] = &["script", "style"];

#[derive(Debug)]
struct Tag {
    name: String,
    closing: bool,
    self_closing: bool,
    attributes: Vec<(String, String)>,
    /// Index just past the `>`.
    end: usize,
}

/// Strips all markup from `text` except the allow-listed structural tags.
///
/// Always succeeds; input that is not markup at all passes through unchanged
/// apart from stray `<` characters, which are entity-escaped.
#[must_use]
pub fn sanitize(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '<' {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        if starts_with_at(&chars, i, "<!--") {
            i = skip_past(&chars, i + 4, "-->");
            continue;
        }
        match parse_tag(&chars, i) {
            Some(tag) => {
                i = tag.end;
                let name = tag.name.as_str();
                if DROP_CONTENT_TAGS.contains(&name) {
                    if !tag.closing && !tag.self_closing {
                        i = skip_element(&chars, i, name);
                    }
                } else if ALLOWED_TAGS.contains(&name) {
                    emit_tag(&mut out, &tag);
                }
                // Anything else: tag removed, surrounding text kept.
            }
            None => {
                out.push_str("&lt;");
                i += 1;
            }
        }
    }
    out
}

/// Coerces any JSON value to text, then sanitizes it.
///
/// Non-string values are rendered as compact JSON before sanitization, so a
/// caller holding an arbitrary decoded value never needs to special-case the
/// type.
#[must_use]
pub fn sanitize_value(value: &Value) -> String {
    match value {
        Value::String(s) => sanitize(s),
        other => sanitize(&other.to_string()),
    }
}

fn starts_with_at(chars: &[char], at: usize, needle: &str) -> bool {
    needle
        .chars()
        .enumerate()
        .all(|(offset, c)| chars.get(at + offset) == Some(&c))
}

/// Advances past the first occurrence of `needle` at or after `from`.
fn skip_past(chars: &[char], from: usize, needle: &str) -> usize {
    let mut i = from;
    while i < chars.len() {
        if starts_with_at(chars, i, needle) {
            return i + needle.chars().count();
        }
        i += 1;
    }
    chars.len()
}

/// Advances past the closing tag of `name`, swallowing the element body.
fn skip_element(chars: &[char], from: usize, name: &str) -> usize {
    let close = format!("</{name}");
    let mut i = from;
    while i < chars.len() {
        let lowered: String = chars[i..]
            .iter()
            .take(close.chars().count())
            .flat_map(|c| c.to_lowercase())
            .collect();
        if lowered == close {
            let mut j = i;
            while j < chars.len() && chars[j] != '>' {
                j += 1;
            }
            return (j + 1).min(chars.len());
        }
        i += 1;
    }
    chars.len()
}

/// Parses a tag starting at `<`; `None` when the text is not a tag at all.
fn parse_tag(chars: &[char], start: usize) -> Option<Tag> {
    let mut i = start + 1;
    let closing = chars.get(i) == Some(&'/');
    if closing {
        i += 1;
    }

    let mut name = String::new();
    while let Some(&c) = chars.get(i) {
        if c.is_ascii_alphanumeric() {
            name.extend(c.to_lowercase());
            i += 1;
        } else {
            break;
        }
    }
    if name.is_empty() {
        return None;
    }

    let mut attributes = Vec::new();
    let mut self_closing = false;
    loop {
        while chars.get(i).is_some_and(|c| c.is_whitespace()) {
            i += 1;
        }
        match chars.get(i) {
            None => return None, // ran off the end before `>`: not a tag
            Some('>') => {
                return Some(Tag {
                    name,
                    closing,
                    self_closing,
                    attributes,
                    end: i + 1,
                });
            }
            Some('/') => {
                self_closing = true;
                i += 1;
            }
            Some(_) => {
                let (attr, next) = parse_attribute(chars, i);
                i = next;
                if let Some(attr) = attr {
                    attributes.push(attr);
                }
            }
        }
    }
}

fn parse_attribute(chars: &[char], start: usize) -> (Option<(String, String)>, usize) {
    let mut i = start;
    let mut name = String::new();
    while let Some(&c) = chars.get(i) {
        if c.is_whitespace() || matches!(c, '=' | '>' | '/') {
            break;
        }
        name.extend(c.to_lowercase());
        i += 1;
    }
    if name.is_empty() {
        // Unparseable junk; step over one character to keep making progress.
        return (None, i + 1);
    }
    while chars.get(i).is_some_and(|c| c.is_whitespace()) {
        i += 1;
    }
    if chars.get(i) != Some(&'=') {
        return (Some((name, String::new())), i);
    }
    i += 1;
    while chars.get(i).is_some_and(|c| c.is_whitespace()) {
        i += 1;
    }
    let mut value = String::new();
    if let Some(&quote) = chars.get(i).filter(|&&c| c == '"' || c == '\'') {
        i += 1;
        while let Some(&c) = chars.get(i) {
            i += 1;
            if c == quote {
                break;
            }
            value.push(c);
        }
    } else {
        while let Some(&c) = chars.get(i) {
            if c.is_whitespace() || matches!(c, '>' | '/') {
                break;
            }
            value.push(c);
            i += 1;
        }
    }
    (Some((name, value)), i)
}

fn emit_tag(out: &mut String, tag: &Tag) {
    out.push('<');
    if tag.closing {
        out.push('/');
        out.push_str(&tag.name);
        out.push('>');
        return;
    }
    out.push_str(&tag.name);
    for (name, value) in &tag.attributes {
        let allowed = GLOBAL_ATTRIBUTES.contains(&name.as_str())
            || (tag.name == "a" && LINK_ATTRIBUTES.contains(&name.as_str()));
        if allowed {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&value.replace('"', "&quot;"));
            out.push('"');
        }
    }
    if tag.self_closing {
        out.push('/');
    }
    out.push('>');
}
