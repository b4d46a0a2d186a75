//! Semantic categories and positional slots
//!
//! Templates may declare an input map that tags a placeholder with a
//! semantic category (`"1" = "customer_name"`). Each category carries both
//! the text substituted when the user leaves the field empty and the label
//! shown next to the input field, so resolution and description read from
//! one table.

use std::fmt;

/// A known semantic category from a template input map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticCategory {
    CustomerName,
    AgentName,
    CustomerPhone,
    FirstName,
    LastName,
    Date,
    Time,
    Company,
    OrderId,
    Amount,
    Product,
    Address,
    Status,
}

impl SemanticCategory {
    /// Every category, in declaration order
    pub const ALL: [SemanticCategory; 13] = [
        SemanticCategory::CustomerName,
        SemanticCategory::AgentName,
        SemanticCategory::CustomerPhone,
        SemanticCategory::FirstName,
        SemanticCategory::LastName,
        SemanticCategory::Date,
        SemanticCategory::Time,
        SemanticCategory::Company,
        SemanticCategory::OrderId,
        SemanticCategory::Amount,
        SemanticCategory::Product,
        SemanticCategory::Address,
        SemanticCategory::Status,
    ];

    /// Look up a mapped category string (trimmed, case-insensitive)
    pub fn parse(mapped: &str) -> Option<Self> {
        let key = mapped.trim().to_lowercase();
        let category = match key.as_str() {
            "customer_name" => SemanticCategory::CustomerName,
            "agent_name" => SemanticCategory::AgentName,
            "customer_phone" => SemanticCategory::CustomerPhone,
            "first_name" => SemanticCategory::FirstName,
            "last_name" => SemanticCategory::LastName,
            "date" => SemanticCategory::Date,
            "time" => SemanticCategory::Time,
            "company" | "store" => SemanticCategory::Company,
            "order_id" => SemanticCategory::OrderId,
            "amount" | "price" => SemanticCategory::Amount,
            "product" | "item" => SemanticCategory::Product,
            "address" | "location" => SemanticCategory::Address,
            "status" => SemanticCategory::Status,
            _ => return None,
        };
        Some(category)
    }

    /// Text substituted for an empty field of this category
    pub fn fallback_value(self) -> &'static str {
        match self {
            SemanticCategory::CustomerName
            | SemanticCategory::CustomerPhone
            | SemanticCategory::FirstName
            | SemanticCategory::LastName => "Customer",
            SemanticCategory::AgentName => "Agent",
            SemanticCategory::Date => "Date",
            SemanticCategory::Time => "Time",
            SemanticCategory::Company => "800 Pharmacy",
            SemanticCategory::OrderId => "ID",
            SemanticCategory::Amount => "Amount",
            SemanticCategory::Product => "Product",
            SemanticCategory::Address => "Location",
            SemanticCategory::Status => "Status",
        }
    }

    /// Field label for editing UIs
    pub fn label(self) -> &'static str {
        match self {
            SemanticCategory::CustomerName => "Customer Name",
            SemanticCategory::AgentName => "Agent Name",
            SemanticCategory::CustomerPhone => "Customer Phone",
            SemanticCategory::FirstName => "First Name",
            SemanticCategory::LastName => "Last Name",
            SemanticCategory::Date => "Date",
            SemanticCategory::Time => "Time",
            SemanticCategory::Company => "Company/Store",
            SemanticCategory::OrderId => "Order ID",
            SemanticCategory::Amount => "Amount",
            SemanticCategory::Product => "Product",
            SemanticCategory::Address => "Address/Location",
            SemanticCategory::Status => "Status",
        }
    }
}

impl fmt::Display for SemanticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Default (value, label) for positional slots 1 through 10
const POSITIONAL_SLOTS: [(&str, &str); 10] = [
    ("Customer", "Customer name"),
    ("Amount", "Amount"),
    ("Agent", "Agent name"),
    ("Customer", "Customer phone"),
    ("Date", "Date"),
    ("Your Order", "Order details"),
    ("Product", "Product"),
    ("Location", "Location"),
    ("Status", "Status"),
    ("800 Pharmacy", "Company/Store"),
];

fn slot(position: u64) -> Option<(&'static str, &'static str)> {
    let index = usize::try_from(position.checked_sub(1)?).ok()?;
    POSITIONAL_SLOTS.get(index).copied()
}

/// Fallback value for a positional slot without a mapping
pub fn positional_value(position: Option<u64>) -> Option<&'static str> {
    position.and_then(slot).map(|(value, _)| value)
}

/// Field label for a positional slot without a mapping
pub fn positional_label(position: Option<u64>) -> Option<&'static str> {
    position.and_then(slot).map(|(_, label)| label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!(SemanticCategory::parse("store"), Some(SemanticCategory::Company));
        assert_eq!(SemanticCategory::parse(" Price "), Some(SemanticCategory::Amount));
        assert_eq!(SemanticCategory::parse("LOCATION"), Some(SemanticCategory::Address));
        assert_eq!(SemanticCategory::parse("shoe_size"), None);
        assert_eq!(SemanticCategory::parse(""), None);
    }

    #[test]
    fn test_values_and_labels_are_non_empty() {
        for category in SemanticCategory::ALL {
            assert!(!category.fallback_value().is_empty());
            assert!(!category.label().is_empty());
        }
    }

    #[test]
    fn test_order_id_values() {
        let cat = SemanticCategory::OrderId;
        assert_eq!(cat.fallback_value(), "ID");
        assert_eq!(cat.label(), "Order ID");
        assert_eq!(cat.to_string(), "Order ID");
    }

    #[test]
    fn test_positional_slots() {
        assert_eq!(positional_value(Some(1)), Some("Customer"));
        assert_eq!(positional_value(Some(3)), Some("Agent"));
        assert_eq!(positional_value(Some(6)), Some("Your Order"));
        assert_eq!(positional_value(Some(10)), Some("800 Pharmacy"));
        assert_eq!(positional_value(Some(0)), None);
        assert_eq!(positional_value(Some(11)), None);
        assert_eq!(positional_value(None), None);
        assert_eq!(positional_label(Some(1)), Some("Customer name"));
        assert_eq!(positional_label(Some(10)), Some("Company/Store"));
    }
}
