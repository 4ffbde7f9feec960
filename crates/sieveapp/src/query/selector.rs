//! Renders predicates as CSS selector text.
//!
//! Indexed attributes live on items as `data-{tag}-{field}`. Atomic tests become
//! case-insensitive attribute selectors, AND becomes a compound selector and negation
//! becomes `:not(...)`:
//!
//! ```text
//! Contains(title, red)          [data-sieve-title*="red" i]
//! Equals(kind, cat)             [data-sieve-kind="cat" i]
//! And(a, b)                     <a><b>
//! Not(x)                        :not(<x>)
//! All                           (empty, selects every item)
//! ```
//!
//! Identifiers go through CSS identifier escaping and values through CSS string
//! escaping, so any word a user types can be embedded literally.

use super::compiler::Highlight;
use super::predicate::Predicate;

/// Escapes `s` for use as a CSS identifier, following `CSS.escape`.
pub fn escape_ident(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let chars: Vec<char> = s.chars().collect();

    if chars.len() == 1 && chars[0] == '-' {
        return "\\-".to_string();
    }

    for (i, &ch) in chars.iter().enumerate() {
        let code = ch as u32;
        match ch {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1F}' | '\u{7F}' => push_code_point(&mut out, code),
            '0'..='9' if i == 0 || (i == 1 && chars[0] == '-') => {
                push_code_point(&mut out, code)
            }
            '-' | '_' | '0'..='9' | 'a'..='z' | 'A'..='Z' => out.push(ch),
            _ if code >= 0x80 => out.push(ch),
            _ => {
                out.push('\\');
                out.push(ch);
            }
        }
    }
    out
}

/// Escapes `s` for use inside a double-quoted CSS string, without the quotes.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1F}' | '\u{7F}' => push_code_point(&mut out, ch as u32),
            '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

fn push_code_point(out: &mut String, code: u32) {
    out.push_str(&format!("\\{:x} ", code));
}

#[derive(Debug, Clone, Copy)]
pub struct SelectorRenderer<'a> {
    tag: &'a str,
}

impl<'a> SelectorRenderer<'a> {
    pub fn new(tag: &'a str) -> Self {
        Self { tag }
    }

    /// The attribute an item carries the indexed value of `field` in.
    pub fn attribute_name(&self, field: &str) -> String {
        format!("data-{}-{}", escape_ident(self.tag), escape_ident(field))
    }

    pub fn render(&self, predicate: &Predicate) -> String {
        match predicate {
            Predicate::All => String::new(),
            Predicate::Contains { field, word } => format!(
                "[{}*=\"{}\" i]",
                self.attribute_name(field),
                escape_string(word)
            ),
            Predicate::Equals { field, value } => format!(
                "[{}=\"{}\" i]",
                self.attribute_name(field),
                escape_string(value)
            ),
            Predicate::And { all } => all.iter().map(|p| self.render(p)).collect(),
            Predicate::Not { inner } => format!(":not({})", self.render(inner)),
        }
    }

    /// `:is(...)` over every term of every highlight, or `None` when there is nothing
    /// to mark.
    pub fn render_highlights(&self, highlights: &[Highlight]) -> Option<String> {
        let terms: Vec<String> = highlights
            .iter()
            .flat_map(|h| h.terms.iter())
            .map(|t| self.render(t))
            .collect();
        if terms.is_empty() {
            None
        } else {
            Some(format!(":is({})", terms.join(", ")))
        }
    }
}
