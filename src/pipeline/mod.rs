//! Pipeline orchestration for document comparison runs.
//!
//! This module provides shared load → compare → write glue used by the CLI
//! command handlers, reducing duplication across them.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::SchemaConfig;
use crate::model::{Element, SchemaCatalog};
use crate::parsers::parse_document;

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success - no changes detected (or no --fail-on-change)
    pub const SUCCESS: i32 = 0;
    /// Changes were detected
    pub const CHANGES_DETECTED: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 2;
}

/// Target for output - either stdout or a file
#[derive(Debug, Clone)]
pub enum OutputTarget {
    /// Write to stdout
    Stdout,
    /// Write to a file
    File(PathBuf),
}

impl OutputTarget {
    /// Create output target from optional path
    #[must_use]
    pub fn from_option(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) => Self::File(p),
            None => Self::Stdout,
        }
    }
}

/// Write output to the target (stdout or file)
pub fn write_output(content: &str, target: &OutputTarget, quiet: bool) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            print!("{content}");
            Ok(())
        }
        OutputTarget::File(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            if !quiet {
                tracing::info!("Result written to {}", path.display());
            }
            Ok(())
        }
    }
}

/// Parse a document with context for error messages.
pub fn load_document(path: &Path, quiet: bool) -> Result<Element> {
    if !quiet {
        tracing::info!("Parsing document: {}", path.display());
    }

    let doc =
        parse_document(path).with_context(|| format!("Failed to load {}", path.display()))?;

    tracing::debug!(
        root = doc.tag.as_str(),
        nodes = doc.node_count(),
        content_hash = format!("{:016x}", doc.content_hash()),
        "loaded document"
    );
    Ok(doc)
}

/// Load the schema catalog named by the configuration, if any.
///
/// Returns an empty catalog when the configuration names no catalog file.
/// The file format is chosen by extension; `Validatable` has already
/// rejected anything but yaml, yml and json at configuration time.
pub fn load_catalog(schema: &SchemaConfig, quiet: bool) -> Result<SchemaCatalog> {
    let Some(path) = &schema.catalog else {
        return Ok(SchemaCatalog::default());
    };

    if !quiet {
        tracing::info!("Loading schema catalog: {}", path.display());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();
    let catalog = match extension.as_str() {
        "json" => SchemaCatalog::from_json_str(&content),
        _ => SchemaCatalog::from_yaml_str(&content),
    }
    .with_context(|| format!("Failed to parse catalog {}", path.display()))?;

    tracing::debug!(modules = catalog.modules.len(), "loaded schema catalog");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::CHANGES_DETECTED, 1);
        assert_eq!(exit_codes::ERROR, 2);
    }

    #[test]
    fn test_output_target_from_option() {
        assert!(matches!(OutputTarget::from_option(None), OutputTarget::Stdout));
        assert!(matches!(
            OutputTarget::from_option(Some(PathBuf::from("/tmp/out.xml"))),
            OutputTarget::File(_)
        ));
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("result.xml");
        let target = OutputTarget::File(path.clone());

        write_output("<out/>\n", &target, true).expect("write succeeds");
        assert_eq!(std::fs::read_to_string(&path).expect("readable"), "<out/>\n");
    }

    #[test]
    fn test_load_document_reports_the_path() {
        let err = load_document(Path::new("/nonexistent/state.xml"), true)
            .expect_err("missing file must fail");
        assert!(err.to_string().contains("/nonexistent/state.xml"));
    }

    #[test]
    fn test_load_catalog_defaults_to_empty() {
        let catalog = load_catalog(&SchemaConfig::default(), true).expect("no catalog configured");
        assert!(catalog.modules.is_empty());
    }

    #[test]
    fn test_load_catalog_from_yaml_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .expect("temp file");
        write!(
            file,
            "modules:\n  - name: orders\n    mapsets:\n      status-type:\n        \"2\": Active\n"
        )
        .expect("write");

        let schema = SchemaConfig {
            catalog: Some(file.path().to_path_buf()),
            default_module: Some("orders".to_string()),
        };
        let catalog = load_catalog(&schema, true).expect("catalog loads");
        assert!(catalog.get("orders").is_ok());
    }

    #[test]
    fn test_load_catalog_from_json_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .expect("temp file");
        write!(file, r#"{{"modules": [{{"name": "orders"}}]}}"#).expect("write");

        let schema = SchemaConfig {
            catalog: Some(file.path().to_path_buf()),
            default_module: None,
        };
        let catalog = load_catalog(&schema, true).expect("catalog loads");
        assert_eq!(catalog.modules.len(), 1);
    }
}
