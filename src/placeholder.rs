//! Placeholder scanning for `{{name}}` message templates
//!
//! A placeholder token is `{{` followed by one or more characters other than
//! `}` and closed by `}}`. Its name is the enclosed text, trimmed. Names made
//! only of ASCII digits are positional (`{{1}}`, `{{2}}`), everything else is
//! a named placeholder.

use std::cmp::Ordering;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("placeholder pattern is valid"));

/// Byte range in template text
pub type Span = Range<usize>;

/// A single `{{...}}` occurrence in a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Literal token text including braces, e.g. `{{ name }}`
    pub token: String,
    /// Enclosed text, trimmed
    pub name: String,
    /// Byte span of the token in the template
    pub span: Span,
}

impl Placeholder {
    /// Whether this is a positional (`{{1}}`) placeholder
    pub fn is_positional(&self) -> bool {
        is_positional(&self.name)
    }

    /// Numeric position, if positional and representable
    pub fn position(&self) -> Option<u64> {
        position_of(&self.name)
    }
}

/// Scan a template left to right and return every token occurrence.
///
/// Unmatched or empty braces (`{{`, `{{}}`) produce no occurrence.
pub fn scan(template: &str) -> Vec<Placeholder> {
    TOKEN
        .captures_iter(template)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let inner = caps.get(1)?;
            Some(Placeholder {
                token: whole.as_str().to_string(),
                name: inner.as_str().trim().to_string(),
                span: whole.range(),
            })
        })
        .collect()
}

/// Extract placeholder names for display.
///
/// Positional names come first in ascending numeric order, followed by named
/// placeholders in lexicographic order. Repeated tokens are kept.
pub fn extract_placeholder_names(template: &str) -> Vec<String> {
    let (mut positional, mut named): (Vec<String>, Vec<String>) = scan(template)
        .into_iter()
        .map(|p| p.name)
        .partition(|name| is_positional(name));

    positional.sort_by(|a, b| compare_numeric(a, b));
    named.sort();

    positional.extend(named);
    positional
}

/// True when `name` (after trimming) is a non-empty run of ASCII digits.
pub fn is_positional(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a positional name into its slot number.
///
/// Returns `None` for named placeholders and for numbers too large to
/// represent; both resolve like an unknown slot.
pub fn position_of(name: &str) -> Option<u64> {
    if is_positional(name) {
        name.trim().parse().ok()
    } else {
        None
    }
}

/// Compare two digit strings by numeric value without overflowing.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
