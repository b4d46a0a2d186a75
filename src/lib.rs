//! Template Fallback - placeholder resolution for WhatsApp message templates
//!
//! Message templates carry `{{placeholder}}` tokens, either positional
//! (`{{1}}`) or named (`{{customer_name}}`). This library extracts those
//! tokens, fills them from user input, and supplies a readable default
//! (`"Customer"`, `"Amount"`, `"Value"`, ...) for anything left blank, so a
//! message can always be composed.
//!
//! # Example
//!
//! ```rust
//! use template_fallback::substitute;
//!
//! let text = substitute(
//!     "Hi {{name}}, your order {{order_id}} for {{amount}} is ready!",
//!     &["John", "", ""],
//!     None,
//! );
//! assert_eq!(text, "Hi John, your order Your Order for Amount is ready!");
//! ```

pub mod catalog;
pub mod category;
pub mod describe;
pub mod error;
pub mod lint;
pub mod placeholder;
pub mod resolver;
pub mod rules;

pub use catalog::{CatalogError, MessageTemplate, TemplateCatalog};
pub use category::SemanticCategory;
pub use describe::FormField;
pub use error::Error;
pub use lint::{LintCategory, LintWarning};
pub use placeholder::{extract_placeholder_names, is_positional, scan, Placeholder};
pub use resolver::{InputMap, Resolver, DEFAULT_VALUE};
pub use rules::{FallbackRule, RuleBook, RuleBookError};

/// Resolve one placeholder with the built-in rule book
///
/// # Example
///
/// ```rust
/// use template_fallback::resolve_value;
///
/// assert_eq!(resolve_value("name", "  John  ", None), "John");
/// assert_eq!(resolve_value("name", "", None), "Customer");
/// assert_eq!(resolve_value("payment_link", "https://x.com/abc/xyz123", None), "xyz123");
/// ```
pub fn resolve_value(
    placeholder: &str,
    user_value: &str,
    mapping: Option<&InputMap>,
) -> String {
    Resolver::default().resolve_value(placeholder, user_value, mapping)
}

/// Fill every token of `template` with the built-in rule book
///
/// `values` are taken in left-to-right token order.
pub fn substitute<S: AsRef<str>>(
    template: &str,
    values: &[S],
    mapping: Option<&InputMap>,
) -> String {
    Resolver::default().substitute(template, values, mapping)
}

/// Field label for a placeholder with the built-in rule book
///
/// # Example
///
/// ```rust
/// use template_fallback::describe;
///
/// assert_eq!(describe("1", None), "Customer name");
/// assert_eq!(describe("loyalty_points", None), "Loyalty Points");
/// ```
pub fn describe(placeholder: &str, mapping: Option<&InputMap>) -> String {
    Resolver::default().describe(placeholder, mapping)
}

/// Form fields for `template` with the built-in rule book
pub fn form_fields(template: &str, mapping: Option<&InputMap>) -> Vec<FormField> {
    Resolver::default().form_fields(template, mapping)
}

/// Lint `template` with the built-in rule book
pub fn lint(template: &str, mapping: Option<&InputMap>) -> Vec<LintWarning> {
    lint::check(template, mapping, RuleBook::builtin())
}

/// Parse a `KEY=CATEGORY` input map entry
///
/// The key is kept verbatim since input maps are keyed by the literal
/// placeholder name.
pub fn parse_mapping_entry(entry: &str) -> Result<(String, String), Error> {
    match entry.split_once('=') {
        Some((key, category)) if !key.is_empty() => {
            Ok((key.to_string(), category.trim().to_string()))
        }
        _ => Err(Error::InvalidMapping(entry.to_string())),
    }
}
