//! Configuration types for docdiff-tools operations.
//!
//! Provides structured configuration for the compare engine, schema catalog
//! loading, and output handling.

use crate::align::DEFAULT_IDENTITY_ATTRIBUTE;
use crate::annotate::DisplayStyle;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// This is the top-level configuration struct that aggregates all configuration
/// options. It can be constructed from CLI arguments, config files, or both
/// (with CLI overriding file settings).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Compare engine configuration (style, identity matching)
    pub compare: CompareOptions,
    /// Schema catalog configuration
    pub schema: SchemaConfig,
    /// Output configuration (destination, indentation)
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the display style.
    pub const fn style(mut self, style: DisplayStyle) -> Self {
        self.config.compare.style = style;
        self
    }

    /// Set the identity attribute name.
    pub fn identity_attribute(mut self, name: impl Into<String>) -> Self {
        self.config.compare.identity_attribute = name.into();
        self
    }

    /// Enable mapset materialization.
    pub const fn materialise_mapsets(mut self, enabled: bool) -> Self {
        self.config.compare.materialise_mapsets = enabled;
        self
    }

    /// Set the schema catalog path.
    pub fn catalog(mut self, path: Option<PathBuf>) -> Self {
        self.config.schema.catalog = path;
        self
    }

    /// Set the default schema module name.
    pub fn default_module(mut self, name: Option<String>) -> Self {
        self.config.schema.default_module = name;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Set the output indentation.
    pub const fn indent(mut self, indent: Option<usize>) -> Self {
        self.config.output.indent = indent;
        self
    }

    /// Enable fail-on-change mode.
    pub const fn fail_on_change(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_change = fail;
        self
    }

    /// Enable quiet mode.
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    /// Build the `AppConfig`.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Sub-configuration Types
// ============================================================================

/// Compare engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CompareOptions {
    /// Display style for comparison output
    pub style: DisplayStyle,
    /// Attribute consulted for identity matching within same-tag groups
    pub identity_attribute: String,
    /// Materialize mapset labels before comparing
    pub materialise_mapsets: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            style: DisplayStyle::default(),
            identity_attribute: DEFAULT_IDENTITY_ATTRIBUTE.to_string(),
            materialise_mapsets: false,
        }
    }
}

/// Schema catalog configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SchemaConfig {
    /// Path to a schema catalog file (YAML or JSON)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
    /// Module applied when an operation names none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_module: Option<String>,
}

/// Output-related configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Spaces of indentation for serialized output (None for compact)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0, max = 16))]
    pub indent: Option<usize>,
}

/// Behavior flags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Exit with code 1 if any changes are detected
    pub fail_on_change: bool,
    /// Suppress non-essential output
    pub quiet: bool,
}

// ============================================================================
// Per-run Configurations
// ============================================================================

/// Configuration for one `compare` run assembled from CLI args and file config
#[derive(Debug, Clone)]
pub struct CompareRunConfig {
    /// Input document paths
    pub paths: ComparePaths,
    /// Version label for the new side, carried through to the result root
    pub version_label: String,
    /// Compare engine options
    pub compare: CompareOptions,
    /// Schema catalog and module selection
    pub schema: SchemaConfig,
    /// Output destination and formatting
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

/// Paths for a compare run
#[derive(Debug, Clone)]
pub struct ComparePaths {
    /// Old version of the document
    pub old: PathBuf,
    /// New version of the document
    pub new: PathBuf,
    /// Selector path narrowing the old document to a subtree
    pub select_old: Option<String>,
    /// Selector path narrowing the new document to a subtree
    pub select_new: Option<String>,
}

/// Configuration for one `script` run
#[derive(Debug, Clone)]
pub struct ScriptRunConfig {
    /// Script document whose root children are command elements
    pub script: PathBuf,
    /// State document the commands operate on
    pub state: PathBuf,
    /// Compare engine defaults for commands that do not override them
    pub compare: CompareOptions,
    /// Schema catalog configuration
    pub schema: SchemaConfig,
    /// Output destination for the final state
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_compare_options() {
        let options = CompareOptions::default();
        assert_eq!(options.style, DisplayStyle::Legacy);
        assert_eq!(options.identity_attribute, "key");
        assert!(!options.materialise_mapsets);
    }

    #[test]
    fn test_builder_sets_all_fields() {
        let config = AppConfig::builder()
            .style(DisplayStyle::Hint)
            .identity_attribute("id")
            .materialise_mapsets(true)
            .catalog(Some(PathBuf::from("schemas.yaml")))
            .default_module(Some("orders".to_string()))
            .output_file(Some(PathBuf::from("out.xml")))
            .indent(Some(2))
            .fail_on_change(true)
            .quiet(true)
            .build();

        assert_eq!(config.compare.style, DisplayStyle::Hint);
        assert_eq!(config.compare.identity_attribute, "id");
        assert!(config.compare.materialise_mapsets);
        assert_eq!(config.schema.catalog, Some(PathBuf::from("schemas.yaml")));
        assert_eq!(config.schema.default_module.as_deref(), Some("orders"));
        assert_eq!(config.output.file, Some(PathBuf::from("out.xml")));
        assert_eq!(config.output.indent, Some(2));
        assert!(config.behavior.fail_on_change);
        assert!(config.behavior.quiet);
    }

    #[test]
    fn test_config_yaml_round_trip() {
        let yaml = "compare:\n  style: hint\n  identity_attribute: id\n";
        let config: AppConfig = serde_yaml::from_str(yaml).expect("config parses");
        assert_eq!(config.compare.style, DisplayStyle::Hint);
        assert_eq!(config.compare.identity_attribute, "id");
        assert!(!config.behavior.quiet, "unlisted sections fall back to defaults");

        let serialized = serde_yaml::to_string(&config).expect("config serializes");
        assert!(serialized.contains("style: hint"), "got: {serialized}");
    }
}
