//! Field labels for template editing forms

use serde::Serialize;

use crate::category::{positional_label, SemanticCategory};
use crate::placeholder::{is_positional, position_of, scan};
use crate::resolver::{mapped_category, InputMap, Resolver};

/// Label used when a name has no readable characters
const GENERIC_LABEL: &str = "Parameter";

/// One input field of a template form, in substitution order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    /// Occurrence index; the matching entry of the values list
    pub index: usize,
    /// Literal token text, e.g. `{{1}}`
    pub token: String,
    /// Trimmed placeholder name
    pub name: String,
    /// Label to show next to the input
    pub label: String,
    /// Text substituted if the input is left empty
    pub fallback: String,
}

impl<'a> Resolver<'a> {
    /// Human-readable label for a placeholder. Never empty.
    pub fn describe(&self, placeholder: &str, mapping: Option<&InputMap>) -> String {
        if let Some(mapped) = mapped_category(placeholder, mapping) {
            return match SemanticCategory::parse(mapped) {
                Some(category) => category.label().to_string(),
                None => humanize(mapped),
            };
        }

        let clean = placeholder.trim().to_lowercase();

        if is_positional(&clean) {
            return match positional_label(position_of(&clean)) {
                Some(label) => label.to_string(),
                None => format!("Parameter {}", placeholder.trim()),
            };
        }

        if clean.contains("agent") {
            return "Agent name".to_string();
        }
        if clean.contains("customer") && clean.contains("name") {
            return "Customer name".to_string();
        }

        match self.rules().description_for(&clean) {
            Some(description) if !description.trim().is_empty() => description.to_string(),
            _ => humanize(placeholder),
        }
    }

    /// Input fields for every token of `template`, in occurrence order
    pub fn form_fields(&self, template: &str, mapping: Option<&InputMap>) -> Vec<FormField> {
        scan(template)
            .into_iter()
            .enumerate()
            .map(|(index, p)| FormField {
                index,
                label: self.describe(&p.name, mapping),
                fallback: self.resolve_value(&p.name, "", mapping),
                token: p.token,
                name: p.name,
            })
            .collect()
    }
}

/// `delivery_slot` or `delivery-slot` -> `Delivery Slot`, or the generic
/// label if nothing is left
fn humanize(raw: &str) -> String {
    let words: Vec<String> = raw
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect();

    if words.is_empty() {
        GENERIC_LABEL.to_string()
    } else {
        words.join(" ")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
