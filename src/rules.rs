//! Fallback rule table
//!
//! A rule book is an ordered list of keyword rules. A placeholder name that
//! has no user value is matched against the rules in order and the first
//! matching rule supplies the fallback text. The built-in rule book is an
//! embedded TOML document; a replacement can be loaded from a file with the
//! same schema.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a rule book
#[derive(Error, Debug)]
pub enum RuleBookError {
    #[error("Failed to read rule book file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse rule book TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid pattern in rule {index}: {source}")]
    InvalidPattern {
        index: usize,
        #[source]
        source: regex::Error,
    },
    #[error("Rule {index} has no keywords")]
    EmptyRule { index: usize },
}

/// A single keyword rule
#[derive(Debug, Clone)]
pub struct FallbackRule {
    keywords: Vec<String>,
    pattern: Regex,
    /// Text substituted when this rule matches
    pub fallback_value: String,
    /// Human-readable label for editing UIs
    pub description: String,
}

impl FallbackRule {
    /// Build a rule from its keyword alternatives.
    ///
    /// A keyword matches when it is not part of a longer run of letters:
    /// it must be bounded by the start or end of the name or by any
    /// non-letter character, digits included (`order1`, `customer_name`).
    pub fn new(
        keywords: Vec<String>,
        fallback_value: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        let alternatives = keywords
            .iter()
            .map(|k| regex::escape(k.trim()))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(
            r"(?i)(?:^|[^[:alpha:]])(?:{})(?:[^[:alpha:]]|$)",
            alternatives
        ))?;

        Ok(Self {
            keywords,
            pattern,
            fallback_value: fallback_value.into(),
            description: description.into(),
        })
    }

    /// Keyword alternatives this rule was built from
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Test a cleaned (trimmed, lowercased) name against this rule
    pub fn matches(&self, clean_name: &str) -> bool {
        self.pattern.is_match(clean_name)
    }
}

/// An ordered, immutable set of fallback rules
#[derive(Debug, Clone)]
pub struct RuleBook {
    /// Optional name for the rule book
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    rules: Vec<FallbackRule>,
}

/// TOML structure for deserializing rule books
#[derive(Deserialize)]
struct TomlRuleBook {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    rules: Vec<TomlRule>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct TomlRule {
    keywords: Vec<String>,
    fallback: String,
    description: String,
}

/// Built-in rules. Order is significant: the first match wins, so `number`
/// resolves through the phone rule and `delivery` through the date rule.
const DEFAULT_RULES: &str = r#"
[metadata]
name = "800 Pharmacy"
description = "Default WhatsApp template fallbacks"

[[rules]]
keywords = ["name", "customer", "client", "user"]
fallback = "Customer"
description = "Customer name"

[[rules]]
keywords = ["phone", "number", "mobile", "contact", "tel", "telephone"]
fallback = "Customer"
description = "Phone number"

[[rules]]
keywords = ["order", "invoice"]
fallback = "Your Order"
description = "Order reference"

[[rules]]
keywords = ["amount", "price", "cost", "total", "sum", "payment"]
fallback = "Amount"
description = "Amount"

[[rules]]
keywords = ["date", "time", "datetime", "delivery", "appointment"]
fallback = "Date"
description = "Date/time"

[[rules]]
keywords = ["product", "item", "medicine", "medication", "drug"]
fallback = "Product"
description = "Product name"

[[rules]]
keywords = ["address", "location", "area", "city", "zone", "delivery"]
fallback = "Location"
description = "Location"

[[rules]]
keywords = ["status", "state", "condition", "tracking"]
fallback = "Status"
description = "Status"

[[rules]]
keywords = ["company", "store", "pharmacy", "clinic", "hospital"]
fallback = "800 Pharmacy"
description = "Company name"

[[rules]]
keywords = ["url", "link", "website", "payment_link", "tracking_link"]
fallback = "https://www.800pharmacy.ae"
description = "Link/URL"

[[rules]]
keywords = ["no", "number", "order_no", "order_number", "id"]
fallback = "Order Number"
description = "Order number"

[[rules]]
keywords = ["flow", "action", "survey", "feedback", "rate", "rating", "feedback_survey"]
fallback = "Rate Our Service"
description = "Survey/feedback action"
"#;

static BUILTIN: Lazy<RuleBook> = Lazy::new(RuleBook::default);

impl RuleBook {
    /// Load a rule book from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, RuleBookError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a rule book from a TOML string
    pub fn from_str(content: &str) -> Result<Self, RuleBookError> {
        let parsed: TomlRuleBook = toml::from_str(content)?;

        let mut rules = Vec::with_capacity(parsed.rules.len());
        for (index, rule) in parsed.rules.into_iter().enumerate() {
            if rule.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(RuleBookError::EmptyRule { index });
            }
            let keywords = rule
                .keywords
                .into_iter()
                .filter(|k| !k.trim().is_empty())
                .collect();
            let rule = FallbackRule::new(keywords, rule.fallback, rule.description)
                .map_err(|source| RuleBookError::InvalidPattern { index, source })?;
            rules.push(rule);
        }

        Ok(RuleBook {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            rules,
        })
    }

    /// Shared instance of the built-in rule book
    pub fn builtin() -> &'static RuleBook {
        &BUILTIN
    }

    /// Rules in match order
    pub fn rules(&self) -> &[FallbackRule] {
        &self.rules
    }

    /// First rule matching an already cleaned name
    pub fn find(&self, clean_name: &str) -> Option<&FallbackRule> {
        self.rules.iter().find(|rule| rule.matches(clean_name))
    }

    /// Fallback value of the first rule matching `clean_name`
    pub fn fallback_for(&self, clean_name: &str) -> Option<&str> {
        self.find(clean_name).map(|r| r.fallback_value.as_str())
    }

    /// Description of the first rule matching `clean_name`
    pub fn description_for(&self, clean_name: &str) -> Option<&str> {
        self.find(clean_name).map(|r| r.description.as_str())
    }
}

impl Default for RuleBook {
    fn default() -> Self {
        Self::from_str(DEFAULT_RULES).expect("Default rules should be valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule_order() {
        let book = RuleBook::default();
        let fallbacks: Vec<&str> = book
            .rules()
            .iter()
            .map(|r| r.fallback_value.as_str())
            .collect();
        assert_eq!(
            fallbacks,
            vec![
                "Customer",
                "Customer",
                "Your Order",
                "Amount",
                "Date",
                "Product",
                "Location",
                "Status",
                "800 Pharmacy",
                "https://www.800pharmacy.ae",
                "Order Number",
                "Rate Our Service",
            ]
        );
        assert_eq!(book.name.as_deref(), Some("800 Pharmacy"));
    }

    #[test]
    fn test_keyword_inside_separated_name() {
        let book = RuleBook::default();
        assert_eq!(book.fallback_for("customer_name"), Some("Customer"));
        assert_eq!(book.fallback_for("order_id"), Some("Your Order"));
        assert_eq!(book.fallback_for("delivery-date"), Some("Date"));
        assert_eq!(book.fallback_for("medicine name"), Some("Customer"));
    }

    #[test]
    fn test_digits_bound_keywords() {
        let book = RuleBook::default();
        assert_eq!(book.fallback_for("order1"), Some("Your Order"));
        assert_eq!(book.fallback_for("name1"), Some("Customer"));
        assert_eq!(book.fallback_for("2amount"), Some("Amount"));
        assert_eq!(book.fallback_for("item1"), Some("Product"));
    }

    #[test]
    fn test_keyword_must_not_be_part_of_longer_word() {
        let book = RuleBook::default();
        assert_eq!(book.fallback_for("totally_unknown_xyz"), None);
        assert_eq!(book.fallback_for("hotel"), None);
    }

    #[test]
    fn test_number_overlap_first_rule_wins() {
        let book = RuleBook::default();
        assert_eq!(book.fallback_for("order_number"), Some("Customer"));
        assert_eq!(book.fallback_for("order_no"), Some("Your Order"));
        assert_eq!(book.fallback_for("ref_no"), Some("Order Number"));
    }

    #[test]
    fn test_delivery_overlap_first_rule_wins() {
        let book = RuleBook::default();
        assert_eq!(book.fallback_for("delivery_address"), Some("Date"));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let book = RuleBook::default();
        assert_eq!(book.fallback_for("AMOUNT"), Some("Amount"));
    }

    #[test]
    fn test_description_for() {
        let book = RuleBook::default();
        assert_eq!(book.description_for("invoice"), Some("Order reference"));
        assert_eq!(book.description_for("xyz"), None);
    }

    #[test]
    fn test_keywords_are_escaped() {
        let rule = FallbackRule::new(vec!["a.b".to_string()], "X", "x").unwrap();
        assert!(rule.matches("a.b"));
        assert!(!rule.matches("axb"));
    }

    #[test]
    fn test_parse_custom_rule_book() {
        let toml_str = r#"
[metadata]
name = "Clinic"

[[rules]]
keywords = ["doctor"]
fallback = "Dr. Smith"
description = "Doctor"
"#;
        let book = RuleBook::from_str(toml_str).expect("Should parse");
        assert_eq!(book.name, Some("Clinic".to_string()));
        assert_eq!(book.rules().len(), 1);
        assert_eq!(book.fallback_for("doctor_name"), Some("Dr. Smith"));
        assert_eq!(book.fallback_for("customer_name"), None);
    }

    #[test]
    fn test_empty_rule_rejected() {
        let toml_str = r#"
[[rules]]
keywords = ["  "]
fallback = "X"
description = "x"
"#;
        let result = RuleBook::from_str(toml_str);
        assert!(matches!(result, Err(RuleBookError::EmptyRule { index: 0 })));
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = RuleBook::from_str("rules = {{{{");
        assert!(matches!(result, Err(RuleBookError::ParseError(_))));
    }

    #[test]
    fn test_builtin_is_shared() {
        assert!(std::ptr::eq(RuleBook::builtin(), RuleBook::builtin()));
    }
}
