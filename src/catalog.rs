//! Message template catalogs
//!
//! A catalog is a set of named WhatsApp message templates, each with a body
//! containing `{{...}}` tokens and an optional input map. Catalogs load from
//! TOML (`[[templates]]` tables) or from the JSON returned by the template
//! store, either a bare array or an object with a `templates` array.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::describe::FormField;
use crate::resolver::{InputMap, Resolver};

/// Errors that can occur when loading or querying a catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse catalog TOML: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("Failed to parse catalog JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("duplicate template definition: {name}")]
    Duplicate { name: String },
    #[error("template not found: {name}")]
    NotFound { name: String },
}

/// A stored message template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub name: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub body: String,
    /// Placeholder name -> semantic category
    #[serde(default)]
    pub input_map: InputMap,
}

impl MessageTemplate {
    /// Create a template without an input map
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: None,
            category: None,
            body: body.into(),
            input_map: InputMap::new(),
        }
    }

    /// Add an input map entry
    pub fn with_mapping(
        mut self,
        placeholder: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        self.input_map.insert(placeholder.into(), category.into());
        self
    }

    fn mapping(&self) -> Option<&InputMap> {
        if self.input_map.is_empty() {
            None
        } else {
            Some(&self.input_map)
        }
    }

    /// Fill the template body with `values` in token order
    pub fn compose<S: AsRef<str>>(&self, resolver: &Resolver<'_>, values: &[S]) -> String {
        resolver.substitute(&self.body, values, self.mapping())
    }

    /// Form fields for the template body
    pub fn fields(&self, resolver: &Resolver<'_>) -> Vec<FormField> {
        resolver.form_fields(&self.body, self.mapping())
    }
}

/// A named collection of message templates
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    pub name: Option<String>,
    pub description: Option<String>,
    templates: Vec<MessageTemplate>,
}

#[derive(Deserialize)]
struct TomlCatalog {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    templates: Vec<MessageTemplate>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonCatalog {
    List(Vec<MessageTemplate>),
    Wrapped { templates: Vec<MessageTemplate> },
}

impl TemplateCatalog {
    /// Build a catalog from templates, rejecting duplicate names
    pub fn from_templates(templates: Vec<MessageTemplate>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for template in &templates {
            if !seen.insert(template.name.as_str()) {
                return Err(CatalogError::Duplicate {
                    name: template.name.clone(),
                });
            }
        }
        Ok(Self {
            name: None,
            description: None,
            templates,
        })
    }

    /// Load a catalog file; `.json` files are read as JSON, anything else as TOML
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Load a catalog from TOML
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let parsed: TomlCatalog = toml::from_str(content)?;
        let mut catalog = Self::from_templates(parsed.templates)?;
        catalog.name = parsed.metadata.as_ref().and_then(|m| m.name.clone());
        catalog.description = parsed.metadata.as_ref().and_then(|m| m.description.clone());
        Ok(catalog)
    }

    /// Load a catalog from template store JSON
    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let templates = match serde_json::from_str(content)? {
            JsonCatalog::List(templates) => templates,
            JsonCatalog::Wrapped { templates } => templates,
        };
        Self::from_templates(templates)
    }

    /// Templates in declaration order
    pub fn templates(&self) -> &[MessageTemplate] {
        &self.templates
    }

    /// Look up a template by name
    pub fn get(&self, name: &str) -> Result<&MessageTemplate, CatalogError> {
        self.templates
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| CatalogError::NotFound {
                name: name.to_string(),
            })
    }
}
