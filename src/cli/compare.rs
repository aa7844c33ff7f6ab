//! Compare command handler.
//!
//! Implements the `compare` subcommand for diffing two document versions.

use anyhow::Result;

use crate::compare::{CompareEngine, RequestContext};
use crate::config::CompareRunConfig;
use crate::model::Element;
use crate::parsers::serialize_document;
use crate::pipeline::{exit_codes, load_catalog, load_document, write_output, OutputTarget};
use crate::select;

/// Run the compare command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
pub fn run_compare(config: CompareRunConfig) -> Result<i32> {
    let quiet = config.behavior.quiet;

    // Load inputs, optionally narrowed to a selected subtree
    let old = narrow(
        load_document(&config.paths.old, quiet)?,
        config.paths.select_old.as_deref(),
    )?;
    let new = narrow(
        load_document(&config.paths.new, quiet)?,
        config.paths.select_new.as_deref(),
    )?;
    let catalog = load_catalog(&config.schema, quiet)?;

    // An unknown module is fatal before any comparison work begins.
    let module = match &config.schema.default_module {
        Some(name) => Some(catalog.get(name)?),
        None => None,
    };

    // Compare
    let engine = CompareEngine::new(config.compare.style)
        .with_identity_attribute(&config.compare.identity_attribute);
    let ctx = RequestContext::new("compare");
    let result = engine.compare_elements(
        &ctx,
        &old,
        &new,
        &config.version_label,
        module,
        config.compare.materialise_mapsets,
    )?;

    if !quiet {
        tracing::info!(
            added = result.summary.added,
            removed = result.summary.removed,
            changed = result.summary.changed,
            unchanged = result.summary.unchanged,
            unresolved = result.summary.unresolved,
            "comparison complete"
        );
    }

    // Route output
    let xml = serialize_document(&result.root, config.output.indent)?;
    let target = OutputTarget::from_option(config.output.file.clone());
    write_output(&xml, &target, quiet)?;

    Ok(determine_exit_code(&config, result.has_changes()))
}

/// Narrow a loaded document to the subtree a selector path names, if given.
fn narrow(doc: Element, path: Option<&str>) -> Result<Element> {
    match path {
        Some(path) => Ok(select::select_one(&doc, path)?.clone()),
        None => Ok(doc),
    }
}

/// Determine the appropriate exit code based on the result and config flags.
const fn determine_exit_code(config: &CompareRunConfig, has_changes: bool) -> i32 {
    if config.behavior.fail_on_change && has_changes {
        return exit_codes::CHANGES_DETECTED;
    }
    exit_codes::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        BehaviorConfig, CompareOptions, ComparePaths, OutputConfig, SchemaConfig,
    };
    use std::io::Write as _;
    use std::path::Path;

    fn write_doc(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).expect("fixture writes");
        path
    }

    fn run_config(dir: &Path, old: &str, new: &str) -> CompareRunConfig {
        CompareRunConfig {
            paths: ComparePaths {
                old: write_doc(dir, "old.xml", old),
                new: write_doc(dir, "new.xml", new),
                select_old: None,
                select_new: None,
            },
            version_label: "v2".to_string(),
            compare: CompareOptions::default(),
            schema: SchemaConfig::default(),
            output: OutputConfig {
                file: Some(dir.join("result.xml")),
                indent: None,
            },
            behavior: BehaviorConfig {
                fail_on_change: true,
                quiet: true,
            },
        }
    }

    #[test]
    fn test_identical_documents_exit_zero() {
        let dir = tempfile::tempdir().expect("temp dir");
        let doc = "<order><status>2</status></order>";
        let config = run_config(dir.path(), doc, doc);

        let code = run_compare(config).expect("run succeeds");
        assert_eq!(code, exit_codes::SUCCESS);

        let written = std::fs::read_to_string(dir.path().join("result.xml")).expect("output");
        assert!(written.contains("compare-version=\"v2\""), "got: {written}");
    }

    #[test]
    fn test_changed_documents_fail_on_change() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = run_config(
            dir.path(),
            "<order><status>2</status></order>",
            "<order><status>5</status></order>",
        );

        let code = run_compare(config).expect("run succeeds");
        assert_eq!(code, exit_codes::CHANGES_DETECTED);
    }

    #[test]
    fn test_unknown_default_module_is_fatal() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut catalog = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .expect("temp file");
        write!(catalog, "modules: []\n").expect("write");

        let doc = "<order><status>2</status></order>";
        let mut config = run_config(dir.path(), doc, doc);
        config.schema = SchemaConfig {
            catalog: Some(catalog.path().to_path_buf()),
            default_module: Some("missing".to_string()),
        };

        let err = run_compare(config).expect_err("unknown module must fail");
        assert!(err.to_string().contains("missing"), "got: {err}");
    }

    #[test]
    fn test_exit_code_without_fail_on_change() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut config = run_config(
            dir.path(),
            "<order><status>2</status></order>",
            "<order><status>5</status></order>",
        );
        config.behavior.fail_on_change = false;

        let code = run_compare(config).expect("run succeeds");
        assert_eq!(code, exit_codes::SUCCESS);
    }
}
