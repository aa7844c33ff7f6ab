//! Configuration module for docdiff-tools.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use docdiff_tools::config::AppConfig;
//!
//! // Use defaults
//! let config = AppConfig::default();
//!
//! // Use builder
//! let config = AppConfig::builder()
//!     .style(DisplayStyle::Hint)
//!     .identity_attribute("id")
//!     .fail_on_change(true)
//!     .build();
//!
//! // Load from file
//! use docdiff_tools::config::load_or_default;
//! let (config, loaded_from) = load_or_default(None);
//! ```
//!
//! # Configuration File
//!
//! Place a `.docdiff-tools.yaml` file in your project root or
//! `~/.config/docdiff-tools/`:
//!
//! ```yaml
//! compare:
//!   style: hint
//!   identity_attribute: id
//! behavior:
//!   fail_on_change: true
//! ```

pub mod file;
mod types;
mod validation;

// Re-export main types
pub use types::{
    AppConfig, AppConfigBuilder, BehaviorConfig, CompareOptions, ComparePaths, CompareRunConfig,
    OutputConfig, SchemaConfig, ScriptRunConfig,
};
pub use validation::{ConfigError, Validatable};

// Re-export file utilities
pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, ConfigFileError, CONFIG_FILE_NAMES,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.docdiff-tools.yaml` config files. It can be used by editors for
/// validation and autocompletion.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).expect("schema serialization should not fail")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_schema_lists_sections() {
        let schema = generate_json_schema();
        for section in ["compare", "schema", "output", "behavior"] {
            assert!(schema.contains(section), "schema missing section {section}");
        }
    }
}
