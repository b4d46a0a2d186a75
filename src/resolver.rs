//! Value resolution and template substitution

use std::collections::HashMap;

use log::{debug, warn};

use crate::category::{positional_value, SemanticCategory};
use crate::placeholder::{is_positional, position_of, scan};
use crate::rules::RuleBook;

/// Template input map: literal placeholder name -> semantic category
pub type InputMap = HashMap<String, String>;

/// Text used when nothing else applies
pub const DEFAULT_VALUE: &str = "Value";

/// Resolves placeholder values against a rule book
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    rules: &'a RuleBook,
}

impl Default for Resolver<'static> {
    fn default() -> Self {
        Self::new(RuleBook::builtin())
    }
}

impl<'a> Resolver<'a> {
    /// Create a resolver over the given rule book
    pub fn new(rules: &'a RuleBook) -> Self {
        Self { rules }
    }

    /// The rule book used for named placeholders
    pub fn rules(&self) -> &'a RuleBook {
        self.rules
    }

    /// Value to substitute for one placeholder.
    ///
    /// A non-blank user value wins and is returned trimmed, except for
    /// `payment_link` placeholders which keep only the last path segment of
    /// the supplied URL. Otherwise the value falls back to, in order: the
    /// input map (positional names only), the positional slot table, the
    /// agent shortcut, the rule book, and finally [`DEFAULT_VALUE`].
    pub fn resolve_value(
        &self,
        placeholder: &str,
        user_value: &str,
        mapping: Option<&InputMap>,
    ) -> String {
        let provided = user_value.trim();
        if !provided.is_empty() {
            if placeholder.trim().to_lowercase().contains("payment_link") {
                if let Some(segment) = last_path_segment(provided) {
                    return segment.to_string();
                }
            }
            return provided.to_string();
        }

        let value = self.fallback(placeholder, mapping);
        debug!("placeholder '{}' has no value, using '{}'", placeholder, value);
        value
    }

    /// Substitute every placeholder in `template`.
    ///
    /// `values[i]` belongs to the i-th token in left-to-right order; missing
    /// entries count as empty. Each resolved value replaces every occurrence
    /// of that literal token text, so a token repeated later in the template
    /// keeps the value resolved at its first occurrence.
    pub fn substitute<S: AsRef<str>>(
        &self,
        template: &str,
        values: &[S],
        mapping: Option<&InputMap>,
    ) -> String {
        let mut result = template.to_string();
        let placeholders = scan(template);

        if values.len() > placeholders.len() {
            warn!(
                "{} value(s) supplied for {} placeholder(s), extra values ignored",
                values.len(),
                placeholders.len()
            );
        }

        for (index, placeholder) in placeholders.into_iter().enumerate() {
            let user_value = values.get(index).map(AsRef::as_ref).unwrap_or("");

            if !result.contains(&placeholder.token) {
                debug!(
                    "token {} at position {} was already substituted, value ignored",
                    placeholder.token, index
                );
                continue;
            }

            let value = self.resolve_value(&placeholder.name, user_value, mapping);
            result = result.replace(&placeholder.token, &value);
        }

        result
    }

    fn fallback(&self, placeholder: &str, mapping: Option<&InputMap>) -> String {
        let clean = placeholder.trim().to_lowercase();

        if is_positional(&clean) {
            if let Some(mapped) = mapped_category(placeholder, mapping) {
                return self.category_value(mapped);
            }
            return positional_value(position_of(&clean))
                .unwrap_or(DEFAULT_VALUE)
                .to_string();
        }

        if clean.contains("agent") {
            return "Agent".to_string();
        }

        self.rules
            .fallback_for(&clean)
            .unwrap_or(DEFAULT_VALUE)
            .to_string()
    }

    /// Fallback value for a mapped category string
    pub(crate) fn category_value(&self, mapped: &str) -> String {
        if let Some(category) = SemanticCategory::parse(mapped) {
            return category.fallback_value().to_string();
        }
        self.rules
            .fallback_for(&mapped.trim().to_lowercase())
            .unwrap_or(DEFAULT_VALUE)
            .to_string()
    }
}

/// Non-blank mapped category for the literal placeholder name
pub(crate) fn mapped_category<'m>(
    placeholder: &str,
    mapping: Option<&'m InputMap>,
) -> Option<&'m str> {
    mapping?
        .get(placeholder)
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
}

/// Text after the last `/`, if non-empty
fn last_path_segment(value: &str) -> Option<&str> {
    value
        .rsplit_once('/')
        .map(|(_, tail)| tail)
        .filter(|tail| !tail.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn map(pairs: &[(&str, &str)]) -> InputMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_user_value_trimmed() {
        let r = Resolver::default();
        assert_eq!(r.resolve_value("name", "  John  ", None), "John");
    }

    #[test]
    fn test_blank_user_value_falls_back() {
        let r = Resolver::default();
        assert_eq!(r.resolve_value("name", "   ", None), "Customer");
        assert_eq!(r.resolve_value("name", "", None), "Customer");
    }

    #[test]
    fn test_payment_link_keeps_last_segment() {
        let r = Resolver::default();
        assert_eq!(
            r.resolve_value("payment_link", "https://x.com/abc/xyz123", None),
            "xyz123"
        );
        assert_eq!(
            r.resolve_value(" Payment_Link ", " https://x.com/pay/42 ", None),
            "42"
        );
    }

    #[test]
    fn test_payment_link_without_segment_keeps_value() {
        let r = Resolver::default();
        assert_eq!(r.resolve_value("payment_link", "abc123", None), "abc123");
        assert_eq!(
            r.resolve_value("payment_link", "https://x.com/", None),
            "https://x.com/"
        );
    }

    #[test]
    fn test_payment_link_without_value_uses_rules() {
        let r = Resolver::default();
        // "payment" is in the amount rule, which precedes the link rule
        assert_eq!(r.resolve_value("payment_link", "", None), "Amount");
    }

    #[test]
    fn test_other_urls_untouched() {
        let r = Resolver::default();
        assert_eq!(
            r.resolve_value("tracking_url", "https://x.com/t/1", None),
            "https://x.com/t/1"
        );
    }

    #[test]
    fn test_positional_defaults() {
        let r = Resolver::default();
        let expected = [
            "Customer",
            "Amount",
            "Agent",
            "Customer",
            "Date",
            "Your Order",
            "Product",
            "Location",
            "Status",
            "800 Pharmacy",
            "Value",
        ];
        for (i, want) in expected.iter().enumerate() {
            let name = (i + 1).to_string();
            assert_eq!(r.resolve_value(&name, "", None), *want, "position {}", name);
        }
        assert_eq!(r.resolve_value("0", "", None), "Value");
    }

    #[test]
    fn test_positional_mapping() {
        let r = Resolver::default();
        let m = map(&[("1", "date"), ("2", "order_id"), ("3", " STORE "), ("4", "")]);
        assert_eq!(r.resolve_value("1", "", Some(&m)), "Date");
        assert_eq!(r.resolve_value("2", "", Some(&m)), "ID");
        assert_eq!(r.resolve_value("3", "", Some(&m)), "800 Pharmacy");
        // blank mapping is ignored
        assert_eq!(r.resolve_value("4", "", Some(&m)), "Customer");
    }

    #[test]
    fn test_positional_mapping_unknown_category_uses_rules() {
        let r = Resolver::default();
        let m = map(&[("1", "invoice_ref"), ("2", "shoe_size")]);
        assert_eq!(r.resolve_value("1", "", Some(&m)), "Your Order");
        assert_eq!(r.resolve_value("2", "", Some(&m)), "Value");
    }

    #[test]
    fn test_mapping_key_is_literal_name() {
        let r = Resolver::default();
        let m = map(&[("1", "date")]);
        assert_eq!(r.resolve_value(" 1 ", "", Some(&m)), "Customer");
    }

    #[test]
    fn test_mapping_ignored_for_named_placeholder() {
        let r = Resolver::default();
        let m = map(&[("name", "date")]);
        assert_eq!(r.resolve_value("name", "", Some(&m)), "Customer");
    }

    #[test]
    fn test_agent_shortcut() {
        let r = Resolver::default();
        assert_eq!(r.resolve_value("agent_name", "", None), "Agent");
        assert_eq!(r.resolve_value("SupportAgent", "", None), "Agent");
    }

    #[test]
    fn test_unknown_name() {
        let r = Resolver::default();
        assert_eq!(r.resolve_value("totally_unknown_xyz", "", None), "Value");
        assert_eq!(r.resolve_value("", "", None), "Value");
    }

    #[test]
    fn test_substitute_scenario() {
        let r = Resolver::default();
        let out = r.substitute(
            "Hi {{name}}, your order {{order_id}} for {{amount}} is ready!",
            &["John", "", ""],
            None,
        );
        assert_eq!(out, "Hi John, your order Your Order for Amount is ready!");
    }

    #[test]
    fn test_substitute_short_values() {
        let r = Resolver::default();
        let out = r.substitute::<&str>("{{1}} paid {{2}}", &[], None);
        assert_eq!(out, "Customer paid Amount");
    }

    #[test]
    fn test_substitute_ignores_extra_values() {
        let r = Resolver::default();
        let out = r.substitute("Hi {{1}}", &["Ann", "unused", "also unused"], None);
        assert_eq!(out, "Hi Ann");
        assert_eq!(r.substitute("no tokens", &["x"], None), "no tokens");
    }

    #[test]
    fn test_digit_suffixed_names_use_rules() {
        let r = Resolver::default();
        let out = r.substitute(
            "Hi {{name1}}, {{item1}} costs {{price1}}",
            &["", "", ""],
            None,
        );
        assert_eq!(out, "Hi Customer, Product costs Amount");
        assert_eq!(r.resolve_value("date2", "", None), "Date");
    }

    #[test]
    fn test_substitute_keeps_token_spacing() {
        let r = Resolver::default();
        let out = r.substitute("Dear {{ name }}", &["Ann"], None);
        assert_eq!(out, "Dear Ann");
    }

    #[test]
    fn test_substitute_repeated_token_shares_first_value() {
        let r = Resolver::default();
        let out = r.substitute("{{1}} / {{2}} / {{1}}", &["a", "b", "c"], None);
        assert_eq!(out, "a / b / a");
    }

    #[test]
    fn test_substitute_with_mapping() {
        let r = Resolver::default();
        let m = map(&[("1", "customer_name"), ("2", "time")]);
        let out = r.substitute("Hello {{1}}, see you at {{2}}", &["", ""], Some(&m));
        assert_eq!(out, "Hello Customer, see you at Time");
    }

    #[test]
    fn test_substitute_without_tokens_is_noop() {
        let r = Resolver::default();
        assert_eq!(r.substitute("plain {{ text", &["x"], None), "plain {{ text");
    }

    #[test]
    fn test_custom_rule_book() {
        let rules = RuleBook::from_str(
            r#"
[[rules]]
keywords = ["doctor"]
fallback = "Dr. Smith"
description = "Doctor"
"#,
        )
        .unwrap();
        let r = Resolver::new(&rules);
        assert_eq!(r.resolve_value("doctor", "", None), "Dr. Smith");
        assert_eq!(r.resolve_value("name", "", None), "Value");
        assert_eq!(r.resolve_value("1", "", None), "Customer");
    }
}
