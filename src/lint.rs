//! Lint checks for message templates.
//!
//! Lint never changes how a template is filled; it points at templates that
//! will fill in surprising ways: braces that are not tokens, tokens that
//! repeat (and therefore share one value), positional numbering gaps, and
//! input map entries that have no effect.

use std::collections::HashMap;
use std::fmt;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};

use crate::category::SemanticCategory;
use crate::placeholder::{is_positional, scan, Placeholder, Span};
use crate::resolver::InputMap;
use crate::rules::RuleBook;

/// A lint warning about a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintWarning {
    pub category: LintCategory,
    pub message: String,
    /// Byte span in the template, when the warning has a location
    pub span: Option<Span>,
}

/// Category of lint defect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintCategory {
    Syntax,
    Repeated,
    Positional,
    Mapping,
}

impl fmt::Display for LintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintCategory::Syntax => write!(f, "syntax"),
            LintCategory::Repeated => write!(f, "repeated"),
            LintCategory::Positional => write!(f, "positional"),
            LintCategory::Mapping => write!(f, "mapping"),
        }
    }
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.message)
    }
}

impl LintWarning {
    fn new(category: LintCategory, message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            category,
            message: message.into(),
            span,
        }
    }

    /// Format the warning with source context using ariadne
    pub fn report(&self, source: &str, filename: &str, color: bool) -> String {
        let span = self.span.clone().map(|s| char_span(source, s));
        let offset = span.as_ref().map_or(0, |s| s.start);

        let mut builder = Report::build(ReportKind::Warning, filename, offset)
            .with_config(Config::default().with_color(color))
            .with_message(format!("[{}] {}", self.category, self.message));
        if let Some(span) = span {
            builder = builder.with_label(
                Label::new((filename, span))
                    .with_message(&self.message)
                    .with_color(Color::Yellow),
            );
        }

        let mut buf = Vec::new();
        match builder
            .finish()
            .write((filename, Source::from(source)), &mut buf)
        {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("warning: {}", self),
        }
    }
}

/// ariadne counts characters, spans here are bytes
fn char_span(source: &str, span: Span) -> Span {
    let to_chars = |byte: usize| source.get(..byte).map_or(byte, |s| s.chars().count());
    to_chars(span.start)..to_chars(span.end)
}

/// Run all lint checks on a template.
pub fn check(template: &str, mapping: Option<&InputMap>, rules: &RuleBook) -> Vec<LintWarning> {
    let tokens = scan(template);
    let mut warnings = Vec::new();
    check_braces(template, &tokens, &mut warnings);
    check_repeated(&tokens, &mut warnings);
    check_positional(&tokens, &mut warnings);
    if let Some(mapping) = mapping {
        check_mapping(&tokens, mapping, rules, &mut warnings);
    }
    warnings
}

// ── Braces ────────────────────────────────────────────────────────

fn check_braces(template: &str, tokens: &[Placeholder], warnings: &mut Vec<LintWarning>) {
    for (start, _) in template.match_indices("{{") {
        if tokens.iter().any(|t| t.span.contains(&start)) {
            continue;
        }
        if template[start + 2..].starts_with("}}") {
            warnings.push(LintWarning::new(
                LintCategory::Syntax,
                "empty placeholder `{{}}` is left as plain text",
                Some(start..start + 4),
            ));
        } else {
            warnings.push(LintWarning::new(
                LintCategory::Syntax,
                "unclosed `{{` is left as plain text",
                Some(start..start + 2),
            ));
        }
    }

    for token in tokens.iter().filter(|t| t.name.is_empty()) {
        warnings.push(LintWarning::new(
            LintCategory::Syntax,
            format!("placeholder `{}` has a blank name", token.token),
            Some(token.span.clone()),
        ));
    }
}

// ── Repeated tokens ───────────────────────────────────────────────

fn check_repeated(tokens: &[Placeholder], warnings: &mut Vec<LintWarning>) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in tokens {
        *counts.entry(token.token.as_str()).or_default() += 1;
    }

    let mut reported = Vec::new();
    for (index, token) in tokens.iter().enumerate() {
        let count = counts.get(token.token.as_str()).copied().unwrap_or(0);
        if count < 2 || reported.contains(&token.token.as_str()) {
            continue;
        }
        if tokens[..index].iter().any(|t| t.token == token.token) {
            reported.push(token.token.as_str());
            warnings.push(LintWarning::new(
                LintCategory::Repeated,
                format!(
                    "`{}` appears {} times; every occurrence takes the value given for the first",
                    token.token, count
                ),
                Some(token.span.clone()),
            ));
        }
    }
}

// ── Positional numbering ──────────────────────────────────────────

fn check_positional(tokens: &[Placeholder], warnings: &mut Vec<LintWarning>) {
    let positional: Vec<&Placeholder> = tokens.iter().filter(|t| t.is_positional()).collect();
    if positional.is_empty() {
        return;
    }

    let mut found: Vec<(Option<u64>, &str)> = positional
        .iter()
        .map(|t| (t.position(), t.name.as_str()))
        .collect();
    found.sort_by(|a, b| {
        let a_key = a.0.unwrap_or(u64::MAX);
        let b_key = b.0.unwrap_or(u64::MAX);
        a_key.cmp(&b_key).then_with(|| a.1.cmp(b.1))
    });
    found.dedup_by(|a, b| a.0 == b.0 && (a.0.is_some() || a.1 == b.1));

    let expected_max = found.len() as u64;
    let in_range = |p: Option<u64>| matches!(p, Some(n) if n >= 1 && n <= expected_max);
    if found.iter().all(|(p, _)| in_range(*p)) {
        return;
    }

    let listed = found
        .iter()
        .map(|(p, name)| p.map_or_else(|| name.to_string(), |n| n.to_string()))
        .collect::<Vec<_>>()
        .join(", ");
    let first_bad = positional.iter().find(|t| !in_range(t.position()));

    warnings.push(LintWarning::new(
        LintCategory::Positional,
        format!(
            "positional placeholders should be numbered 1..{} without gaps, found {}",
            expected_max, listed
        ),
        first_bad.map(|t| t.span.clone()),
    ));
}

// ── Input map ─────────────────────────────────────────────────────

fn check_mapping(
    tokens: &[Placeholder],
    mapping: &InputMap,
    rules: &RuleBook,
    warnings: &mut Vec<LintWarning>,
) {
    let mut keys: Vec<&String> = mapping.keys().collect();
    keys.sort();

    for key in keys {
        let category = mapping[key].trim();
        let Some(token) = tokens.iter().find(|t| &t.name == key) else {
            warnings.push(LintWarning::new(
                LintCategory::Mapping,
                format!("input map entry `{}` matches no placeholder", key),
                None,
            ));
            continue;
        };

        if !is_positional(key) {
            warnings.push(LintWarning::new(
                LintCategory::Mapping,
                format!(
                    "input map entry for named placeholder `{}` only changes its label",
                    key
                ),
                Some(token.span.clone()),
            ));
        } else if category.is_empty() {
            warnings.push(LintWarning::new(
                LintCategory::Mapping,
                format!("input map entry `{}` is blank and is ignored", key),
                Some(token.span.clone()),
            ));
        } else if SemanticCategory::parse(category).is_none()
            && rules.find(&category.to_lowercase()).is_none()
        {
            warnings.push(LintWarning::new(
                LintCategory::Mapping,
                format!(
                    "`{}` maps to unknown category `{}` and falls back to `Value`",
                    key, category
                ),
                Some(token.span.clone()),
            ));
        }
    }
}
