//! Tolerant repair of near-JSON text.
//!
//! Model output is usually *almost* JSON: single-quoted strings, unquoted
//! keys, trailing commas, smart quotes pasted from a chat UI, Python literals,
//! or text cut off mid-value. This pass rewrites such text into strict JSON
//! without changing its intended content. It is a re-serializer, not a
//! validator; the caller confirms the result with a strict parse.

use std::fmt::Write as _;

/// Rewrites near-JSON text into strict JSON text.
///
/// The scan starts at the first `{` or `[` and stops once that value closes,
/// so prose before or after the value is discarded. Input with no structural
/// opener at all is returned trimmed, for the caller's strict parse to judge.
#[must_use]
pub fn repair_json(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let Some(start) = chars.iter().position(|&c| c == '{' || c == '[') else {
        return input.trim().to_string();
    };

    let mut repairer = Repairer {
        out: String::with_capacity(input.len()),
        stack: Vec::new(),
    };
    let mut i = start;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '{' | '[' => {
                repairer.open(c);
                i += 1;
            }
            '}' | ']' => {
                i += 1;
                repairer.close();
                if repairer.stack.is_empty() {
                    break; // first top-level value complete; trailing prose ignored
                }
            }
            ',' => {
                i += 1;
                repairer.comma();
            }
            ':' | '=' => {
                i += 1;
                repairer.colon();
            }
            '"' | '\'' | '\u{201c}' | '\u{201d}' | '\u{2018}' | '\u{2019}' => {
                i = repairer.copy_string(&chars, i);
            }
            '/' if chars.get(i + 1) == Some(&'/') => i = skip_line(&chars, i),
            '/' if chars.get(i + 1) == Some(&'*') => i = skip_block_comment(&chars, i),
            '#' => i = skip_line(&chars, i),
            c if c.is_whitespace() => i += 1,
            '-' | '+' | '.' => i = repairer.copy_number(&chars, i),
            c if c.is_ascii_digit() => i = repairer.copy_number(&chars, i),
            c if is_word_char(c) => i = repairer.copy_word(&chars, i),
            _ => i += 1, // junk between tokens
        }
    }

    // Truncated input: close whatever is still open.
    while !repairer.stack.is_empty() {
        repairer.close();
    }
    repairer.out
}

/// One open `{` or `[` scope.
#[derive(Debug, Clone, Copy)]
struct Scope {
    closer: char,
    /// Whether the member currently being emitted has seen its `:` yet.
    /// Meaningless for arrays.
    member_has_colon: bool,
}

#[derive(Debug)]
struct Repairer {
    out: String,
    stack: Vec<Scope>,
}

impl Repairer {
    fn last_char(&self) -> Option<char> {
        self.out.chars().last()
    }

    fn reset_member(&mut self) {
        if let Some(scope) = self.stack.last_mut() {
            scope.member_has_colon = false;
        }
    }

    /// Inserts the comma a model forgot between two values or members.
    fn separate(&mut self) {
        let ends_value = matches!(
            self.last_char(),
            Some(c) if c == '"' || c == '}' || c == ']' || c == '.' || c.is_ascii_alphanumeric()
        );
        if ends_value {
            self.out.push(',');
            self.reset_member();
        }
    }

    fn open(&mut self, c: char) {
        self.separate();
        self.out.push(c);
        self.stack.push(Scope {
            closer: if c == '{' { '}' } else { ']' },
            member_has_colon: false,
        });
    }

    fn close(&mut self) {
        self.finish_member();
        if let Some(scope) = self.stack.pop() {
            self.out.push(scope.closer);
        }
    }

    fn comma(&mut self) {
        match self.last_char() {
            // Nothing to separate yet; the comma is noise.
            None | Some('{' | '[' | ',') => {}
            // `"a": ,` - the value went missing.
            Some(':') => {
                self.out.push_str("null,");
                self.reset_member();
            }
            _ => {
                self.out.push(',');
                self.reset_member();
            }
        }
    }

    fn colon(&mut self) {
        if self.last_char() != Some(':') {
            self.out.push(':');
            if let Some(scope) = self.stack.last_mut() {
                scope.member_has_colon = true;
            }
        }
    }

    /// Settles the member in flight before a scope closes: trailing commas
    /// go, a dangling `:` gets `null`, a lone key gets `:null`.
    fn finish_member(&mut self) {
        while self.last_char() == Some(',') {
            self.out.pop();
        }
        if self.last_char() == Some(':') {
            self.out.push_str("null");
            return;
        }
        let in_object = self.stack.last().is_some_and(|s| s.closer == '}');
        let lone_key = in_object
            && !self.stack.last().is_some_and(|s| s.member_has_colon)
            && self.last_char() == Some('"');
        if lone_key {
            self.out.push_str(":null");
        }
    }

    /// Copies a quoted string, normalizing the quote style to `"` and
    /// escaping anything JSON requires escaped. Returns the next index.
    fn copy_string(&mut self, chars: &[char], start: usize) -> usize {
        let opener = chars[start];
        // Apostrophes and smart quotes legitimately appear inside prose, so
        // they only close the string at a structural boundary.
        let lenient = opener != '"';
        self.separate();
        self.out.push('"');
        let mut i = start + 1;
        while i < chars.len() {
            let c = chars[i];
            if c == '\\' {
                i = self.copy_escape(chars, i);
                continue;
            }
            if closes(opener, c) && (!lenient || at_boundary(chars, i + 1)) {
                self.out.push('"');
                return i + 1;
            }
            self.push_string_char(c);
            i += 1;
        }
        self.out.push('"'); // truncated mid-string
        chars.len()
    }

    /// Copies one backslash escape, fixing invalid ones. Returns the next index.
    fn copy_escape(&mut self, chars: &[char], at: usize) -> usize {
        match chars.get(at + 1) {
            Some(&next) if matches!(next, '"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't') => {
                self.out.push('\\');
                self.out.push(next);
                at + 2
            }
            Some('u') => {
                let hex: String = chars.iter().skip(at + 2).take(4).collect();
                if hex.chars().count() == 4 && hex.chars().all(|h| h.is_ascii_hexdigit()) {
                    self.out.push_str("\\u");
                    self.out.push_str(&hex);
                    at + 6
                } else {
                    self.out.push_str("\\\\u");
                    at + 2
                }
            }
            Some(&next) => {
                // `\'` and friends: the escape is bogus, the character is not.
                self.push_string_char(next);
                at + 2
            }
            None => chars.len(), // truncated at a backslash
        }
    }

    fn push_string_char(&mut self, c: char) {
        match c {
            '"' => self.out.push_str("\\\""),
            '\\' => self.out.push_str("\\\\"),
            '\n' => self.out.push_str("\\n"),
            '\r' => self.out.push_str("\\r"),
            '\t' => self.out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(self.out, "\\u{:04x}", c as u32);
            }
            c => self.out.push(c),
        }
    }

    /// Copies a numeric token, normalizing forms JSON rejects (`+1`, `.5`,
    /// `007`). A token that cannot be read as a number is emitted as a
    /// quoted string. Returns the next index.
    fn copy_number(&mut self, chars: &[char], start: usize) -> usize {
        let mut i = start;
        let mut token = String::new();
        while let Some(&c) = chars.get(i) {
            if c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E') {
                token.push(c);
                i += 1;
            } else {
                break;
            }
        }
        let cleaned = token.trim_start_matches('+');
        if matches!(cleaned, "" | "-") && chars.get(i).copied().is_some_and(is_word_char) {
            // `-Infinity`, `+NaN`: a sign stuck to a word literal.
            return self.copy_word(chars, i);
        }
        self.separate();
        let normalized = normalize_number(cleaned);
        if normalized.parse::<f64>().is_ok() {
            self.out.push_str(&normalized);
        } else {
            self.out.push('"');
            for c in token.chars() {
                self.push_string_char(c);
            }
            self.out.push('"');
        }
        i
    }

    /// Copies a bare word: literals map to JSON keywords, anything else
    /// becomes a quoted string (this is how unquoted keys get their quotes).
    /// Returns the next index.
    fn copy_word(&mut self, chars: &[char], start: usize) -> usize {
        let mut i = start;
        let mut word = String::new();
        while let Some(&c) = chars.get(i) {
            if is_word_char(c) {
                word.push(c);
                i += 1;
            } else {
                break;
            }
        }
        self.separate();
        match word.to_ascii_lowercase().as_str() {
            "true" => self.out.push_str("true"),
            "false" => self.out.push_str("false"),
            "null" | "none" | "nan" | "infinity" | "undefined" => self.out.push_str("null"),
            _ => {
                self.out.push('"');
                for c in word.chars() {
                    self.push_string_char(c);
                }
                self.out.push('"');
            }
        }
        i
    }
}

fn closes(opener: char, c: char) -> bool {
    match opener {
        '\'' => c == '\'',
        '\u{201c}' | '\u{201d}' => matches!(c, '\u{201c}' | '\u{201d}'),
        '\u{2018}' | '\u{2019}' => matches!(c, '\u{2018}' | '\u{2019}'),
        _ => c == '"',
    }
}

/// Whether the next non-whitespace character (if any) is structural, meaning
/// a lenient quote here really does end the string.
fn at_boundary(chars: &[char], mut i: usize) -> bool {
    while chars.get(i).is_some_and(|c| c.is_whitespace()) {
        i += 1;
    }
    matches!(chars.get(i), None | Some(',' | ':' | '}' | ']'))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn normalize_number(token: &str) -> String {
    let (sign, digits) = token
        .strip_prefix('-')
        .map_or(("", token), |rest| ("-", rest));
    let mut digits = digits.to_string();
    if digits.starts_with('.') {
        digits.insert(0, '0');
    }
    if digits.ends_with('.') {
        digits.push('0');
    }
    // JSON forbids leading zeros.
    while digits.len() > 1
        && digits.starts_with('0')
        && digits.as_bytes().get(1).is_some_and(u8::is_ascii_digit)
    {
        digits.remove(0);
    }
    format!("{sign}{digits}")
}

fn skip_line(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i] != '\n' {
        i += 1;
    }
    i.saturating_add(usize::from(i < chars.len()))
}

fn skip_block_comment(chars: &[char], start: usize) -> usize {
    let mut i = start + 2;
    while i + 1 < chars.len() {
        if chars[i] == '*' && chars[i + 1] == '/' {
            return i + 2;
        }
        i += 1;
    }
    chars.len()
}
