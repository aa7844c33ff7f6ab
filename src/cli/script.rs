//! Script command handler.
//!
//! Implements the `script` subcommand: runs the command elements of a script
//! document, in document order, against a state document, then writes the
//! final state.

use anyhow::Result;

use crate::config::ScriptRunConfig;
use crate::parsers::serialize_document;
use crate::pipeline::{exit_codes, load_catalog, load_document, write_output, OutputTarget};
use crate::registry::{CommandRegistry, ScriptContext};

/// Run the script command, returning the desired exit code.
///
/// Every command is constructed before anything runs, so a markup mistake
/// anywhere in the script surfaces without touching the state. A command
/// failure aborts the run and nothing is written.
pub fn run_script(config: ScriptRunConfig) -> Result<i32> {
    let quiet = config.behavior.quiet;

    let script = load_document(&config.script, quiet)?;
    let state = load_document(&config.state, quiet)?;
    let catalog = load_catalog(&config.schema, quiet)?;

    let registry = CommandRegistry::builtin();
    let commands = registry.load_script(&script)?;
    if !quiet {
        tracing::info!(commands = commands.len(), "script loaded");
    }

    let mut ctx = ScriptContext::new(state)
        .with_catalog(catalog)
        .with_defaults(config.compare.clone());
    for (position, command) in commands.iter().enumerate() {
        tracing::debug!(position, name = command.name(), "running command");
        command.run(&mut ctx)?;
    }

    let xml = serialize_document(&ctx.state, config.output.indent)?;
    let target = OutputTarget::from_option(config.output.file.clone());
    write_output(&xml, &target, quiet)?;

    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BehaviorConfig, CompareOptions, OutputConfig, SchemaConfig};
    use std::path::Path;

    fn write_doc(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).expect("fixture writes");
        path
    }

    fn run_config(dir: &Path, script: &str, state: &str) -> ScriptRunConfig {
        ScriptRunConfig {
            script: write_doc(dir, "script.xml", script),
            state: write_doc(dir, "state.xml", state),
            compare: CompareOptions::default(),
            schema: SchemaConfig::default(),
            output: OutputConfig {
                file: Some(dir.join("out.xml")),
                indent: None,
            },
            behavior: BehaviorConfig {
                fail_on_change: false,
                quiet: true,
            },
        }
    }

    const STATE: &str = "<state>\
        <before><order><status>2</status></order></before>\
        <after><order><status>5</status></order></after>\
        <result/></state>";

    #[test]
    fn test_script_runs_and_writes_state() {
        let dir = tempfile::tempdir().expect("temp dir");
        let script = r#"<script>
            <compare context-one="/state/before/order" context-two="/state/after/order"
                     context-out="/state/result" version-two="v2"/>
        </script>"#;
        let config = run_config(dir.path(), script, STATE);

        let code = run_script(config).expect("script runs");
        assert_eq!(code, exit_codes::SUCCESS);

        let written = std::fs::read_to_string(dir.path().join("out.xml")).expect("output");
        assert!(written.contains("compare-version=\"v2\""), "got: {written}");
        assert!(written.contains("change=\"changed\""), "got: {written}");
    }

    #[test]
    fn test_invalid_markup_fails_before_any_command_runs() {
        let dir = tempfile::tempdir().expect("temp dir");
        let script = r#"<script>
            <compare context-one="/state/before/order" context-two="/state/after/order"
                     context-out="/state/result" version-two="v2"/>
            <compare context-one="/state/before/order" context-two="/state/after/order"
                     version-two="v2"/>
        </script>"#;
        let config = run_config(dir.path(), script, STATE);
        let out_path = dir.path().join("out.xml");

        let err = run_script(config).expect_err("second command is missing context-out");
        assert!(err.to_string().contains("context-out"), "got: {err}");
        assert!(!out_path.exists(), "nothing is written when the load fails");
    }

    #[test]
    fn test_failed_command_writes_nothing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let script = r#"<script>
            <compare context-one="/state/missing" context-two="/state/after/order"
                     context-out="/state/result" version-two="v2"/>
        </script>"#;
        let config = run_config(dir.path(), script, STATE);
        let out_path = dir.path().join("out.xml");

        let err = run_script(config).expect_err("context-one cannot resolve");
        assert!(err.to_string().contains("context-one"), "got: {err}");
        assert!(!out_path.exists());
    }
}
