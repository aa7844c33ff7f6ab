//! Configuration validation for docdiff-tools.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::{AppConfig, BehaviorConfig, CompareOptions, OutputConfig, SchemaConfig};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.compare.validate());
        errors.extend(self.schema.validate());
        errors.extend(self.output.validate());
        errors.extend(self.behavior.validate());
        errors
    }
}

impl Validatable for CompareOptions {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.identity_attribute.trim().is_empty() {
            errors.push(ConfigError {
                field: "compare.identity_attribute".to_string(),
                message: "Identity attribute name must not be empty".to_string(),
            });
        } else if self.identity_attribute.contains(char::is_whitespace) {
            errors.push(ConfigError {
                field: "compare.identity_attribute".to_string(),
                message: format!(
                    "Identity attribute '{}' must not contain whitespace",
                    self.identity_attribute
                ),
            });
        }

        errors
    }
}

impl Validatable for SchemaConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(catalog) = &self.catalog {
            let extension = catalog
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default()
                .to_lowercase();
            if !matches!(extension.as_str(), "yaml" | "yml" | "json") {
                errors.push(ConfigError {
                    field: "schema.catalog".to_string(),
                    message: format!(
                        "Unsupported catalog extension '{extension}'. Valid options: yaml, yml, json"
                    ),
                });
            }
        }

        if self.default_module.is_some() && self.catalog.is_none() {
            errors.push(ConfigError {
                field: "schema.default_module".to_string(),
                message: "A default module requires a catalog file to resolve it from".to_string(),
            });
        }

        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        // Validate output file path if specified
        if let Some(file_path) = &self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError {
                        field: "output.file".to_string(),
                        message: format!("Parent directory does not exist: {}", parent.display()),
                    });
                }
            }
        }

        if let Some(indent) = self.indent {
            if indent > 16 {
                errors.push(ConfigError {
                    field: "output.indent".to_string(),
                    message: format!("Indentation must be at most 16 spaces, got {indent}"),
                });
            }
        }

        errors
    }
}

impl Validatable for BehaviorConfig {
    fn validate(&self) -> Vec<ConfigError> {
        // Every flag combination is meaningful.
        Vec::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.is_valid(), "errors: {:?}", config.validate());
    }

    #[test]
    fn test_empty_identity_attribute_is_invalid() {
        let mut config = AppConfig::default();
        config.compare.identity_attribute = "  ".to_string();
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.field == "compare.identity_attribute"));
    }

    #[test]
    fn test_identity_attribute_with_whitespace_is_invalid() {
        let mut config = AppConfig::default();
        config.compare.identity_attribute = "item key".to_string();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("whitespace"));
    }

    #[test]
    fn test_catalog_extension_is_checked() {
        let mut config = AppConfig::default();
        config.schema.catalog = Some(PathBuf::from("schemas.toml"));
        let errors = config.validate();
        assert!(
            errors.iter().any(|e| e.field == "schema.catalog"),
            "errors: {errors:?}"
        );

        config.schema.catalog = Some(PathBuf::from("schemas.yaml"));
        assert!(config.is_valid());
    }

    #[test]
    fn test_default_module_requires_catalog() {
        let mut config = AppConfig::default();
        config.schema.default_module = Some("orders".to_string());
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.field == "schema.default_module"));
    }

    #[test]
    fn test_missing_output_parent_is_invalid() {
        let mut config = AppConfig::default();
        config.output.file = Some(PathBuf::from("/nonexistent-docdiff-dir/out.xml"));
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.field == "output.file"));
    }

    #[test]
    fn test_oversized_indent_is_invalid() {
        let mut config = AppConfig::default();
        config.output.indent = Some(32);
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.field == "output.indent"));
    }

    #[test]
    fn test_error_display_names_the_field() {
        let error = ConfigError {
            field: "output.indent".to_string(),
            message: "too deep".to_string(),
        };
        assert_eq!(error.to_string(), "output.indent: too deep");
    }
}
