//! Configuration for the response transformer.
//!
//! Defines the content roots the engine reads from and the response
//! definition shape it consumes and produces.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Locations of the directory trees the transformer reads from.
///
/// Both roots are fixed at startup and treated as read-only afterwards;
/// the transformer re-reads their contents on every invocation, so files
/// can be edited live without a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformerConfig {
    /// Directory holding response body template files
    pub files_root: PathBuf,

    /// Directory holding replacement specifications, mirroring the layout
    /// of `files_root`
    pub replacements_root: PathBuf,
}

impl TransformerConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// The replacements root is allowed to be absent: a missing directory
    /// just means no directive substitution happens.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.files_root.is_dir() {
            anyhow::bail!("files root {:?} is not a directory", self.files_root);
        }
        Ok(())
    }
}

/// A response definition, as selected by stub matching.
///
/// The transformer only activates for definitions that reference a body
/// file; definitions with an inline body (or none) pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponseDefinition {
    /// HTTP status code
    #[serde(default = "default_status")]
    pub status: u16,

    /// Response headers
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Inline response body
    #[serde(default)]
    pub body: Option<String>,

    /// Response body loaded from a file under the files root
    #[serde(default)]
    pub body_file_name: Option<String>,
}

fn default_status() -> u16 {
    200
}

impl ResponseDefinition {
    /// A definition whose body comes from a template file.
    pub fn from_body_file(name: impl Into<String>) -> Self {
        Self {
            status: default_status(),
            headers: HashMap::new(),
            body: None,
            body_file_name: Some(name.into()),
        }
    }

    /// A definition with an inline body.
    pub fn from_body(body: impl Into<String>) -> Self {
        Self {
            status: default_status(),
            headers: HashMap::new(),
            body: Some(body.into()),
            body_file_name: None,
        }
    }

    /// Set the status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Add a response header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Validate the response definition.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.status < 100 || self.status > 599 {
            anyhow::bail!("Invalid status code: {}", self.status);
        }
        if self.body.is_some() && self.body_file_name.is_some() {
            anyhow::bail!("A response cannot set both body and body_file_name");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_file_definition() {
        let yaml = r#"
status: 200
headers:
  Content-Type: application/json
body_file_name: folder/order-confirmation.json
"#;
        let definition: ResponseDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(definition.status, 200);
        assert_eq!(
            definition.body_file_name.as_deref(),
            Some("folder/order-confirmation.json")
        );
        assert!(definition.body.is_none());
        definition.validate().unwrap();
    }

    #[test]
    fn test_status_defaults_to_200() {
        let yaml = "body: '{}'";
        let definition: ResponseDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(definition.status, 200);
    }

    #[test]
    fn test_validate_rejects_bad_status() {
        let definition = ResponseDefinition::from_body("{}").with_status(42);
        assert!(definition.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_body_and_body_file() {
        let mut definition = ResponseDefinition::from_body_file("order.json");
        definition.body = Some("{}".to_string());
        assert!(definition.validate().is_err());
    }

    #[test]
    fn test_transformer_config_parses() {
        let yaml = r#"
files_root: stub/__files
replacements_root: stub/replacements
"#;
        let config: TransformerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.files_root, PathBuf::from("stub/__files"));
        assert_eq!(config.replacements_root, PathBuf::from("stub/replacements"));
    }

    #[test]
    fn test_transformer_config_validate_requires_files_root() {
        let config = TransformerConfig {
            files_root: PathBuf::from("/definitely/not/here"),
            replacements_root: PathBuf::from("/also/not/here"),
        };
        assert!(config.validate().is_err());
    }
}
