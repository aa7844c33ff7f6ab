//! End-to-end tests for the script command host.
//!
//! Scripts are documents whose root children are command elements; these
//! tests run them through the `script` handler the way the binary does.

use docdiff_tools::annotate::{CHANGE_ATTR, COMPARE_VERSION_ATTR};
use docdiff_tools::cli::run_script;
use docdiff_tools::config::{
    BehaviorConfig, CompareOptions, OutputConfig, SchemaConfig, ScriptRunConfig,
};
use docdiff_tools::parsers::parse_document_str;
use docdiff_tools::pipeline::exit_codes;
use std::path::{Path, PathBuf};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn run_config(script: PathBuf, state: PathBuf, output: PathBuf) -> ScriptRunConfig {
    ScriptRunConfig {
        script,
        state,
        compare: CompareOptions::default(),
        schema: SchemaConfig::default(),
        output: OutputConfig {
            file: Some(output),
            indent: Some(2),
        },
        behavior: BehaviorConfig {
            fail_on_change: false,
            quiet: true,
        },
    }
}

#[test]
fn test_report_script_rewrites_the_report_section() {
    let dir = tempfile::tempdir().expect("temp dir");
    let out_path = dir.path().join("state-out.xml");
    let config = run_config(
        fixture_path("scripts/report.xml"),
        fixture_path("scripts/state.xml"),
        out_path.clone(),
    );

    let code = run_script(config).expect("script runs");
    assert_eq!(code, exit_codes::SUCCESS);

    let written = std::fs::read_to_string(&out_path).expect("output written");
    let state = parse_document_str(&written).expect("output reparses");

    // The report section's prior content is gone, replaced by the result.
    let report = state.child("report").expect("report section");
    assert!(report.child("previous-run").is_none());
    assert_eq!(report.children.len(), 1);

    let order = &report.children[0];
    assert_eq!(order.tag, "order");
    // version-two was a path; the label comes from /current/order/version.
    assert_eq!(order.attr(COMPARE_VERSION_ATTR), Some("2.1"));
    let status = order.child("status").expect("status in result");
    assert_eq!(status.attr(CHANGE_ATTR), Some("changed"));

    // The inputs under history/ and current/ are untouched.
    let history = state
        .child("history")
        .and_then(|h| h.child("order"))
        .and_then(|o| o.child("status"))
        .expect("history preserved");
    assert_eq!(history.text.as_deref(), Some("2"));
}

#[test]
fn test_commands_run_in_document_order_over_shared_state() {
    // The second command diffs the first command's output against the
    // current order, which only works if state flows between commands.
    let dir = tempfile::tempdir().expect("temp dir");
    let script = dir.path().join("chain.xml");
    std::fs::write(
        &script,
        r#"<script>
             <compare context-one="/state/history/order"
                      context-two="/state/current/order"
                      context-out="/state/report" version-two="v2"/>
             <compare context-one="/state/report/order"
                      context-two="/state/current/order"
                      context-out="/state/second" version-two="v3"/>
           </script>"#,
    )
    .expect("script writes");
    let state = dir.path().join("state.xml");
    std::fs::write(
        &state,
        "<state>\
           <history><order><status>2</status></order></history>\
           <current><order><status>5</status></order></current>\
           <report/><second/>\
         </state>",
    )
    .expect("state writes");
    let out_path = dir.path().join("out.xml");

    run_script(run_config(script, state, out_path.clone())).expect("script runs");

    let written = std::fs::read_to_string(&out_path).expect("output written");
    let state = parse_document_str(&written).expect("output reparses");
    let second = state.child("second").expect("second section");
    assert_eq!(second.children.len(), 1);
    assert_eq!(second.children[0].attr(COMPARE_VERSION_ATTR), Some("v3"));
}

#[test]
fn test_unknown_command_element_fails_the_whole_script() {
    let dir = tempfile::tempdir().expect("temp dir");
    let script = dir.path().join("bad.xml");
    std::fs::write(
        &script,
        r#"<script>
             <compare context-one="/state/history/order"
                      context-two="/state/current/order"
                      context-out="/state/report" version-two="v2"/>
             <transmogrify target="/state/report"/>
           </script>"#,
    )
    .expect("script writes");
    let out_path = dir.path().join("out.xml");
    let config = run_config(script, fixture_path("scripts/state.xml"), out_path.clone());

    let err = run_script(config).expect_err("unknown element must fail the load");
    assert!(err.to_string().contains("<transmogrify>"), "got: {err}");
    assert!(!out_path.exists(), "a failed load writes nothing");
}

#[test]
fn test_schema_module_resolves_through_the_catalog() {
    let dir = tempfile::tempdir().expect("temp dir");
    let script = dir.path().join("labels.xml");
    std::fs::write(
        &script,
        r#"<script>
             <compare context-one="/state/history/order"
                      context-two="/state/current/order"
                      context-out="/state/report" version-two="v2"
                      schema-module="orders" materialise-mapsets="true"/>
           </script>"#,
    )
    .expect("script writes");
    let out_path = dir.path().join("out.xml");
    let mut config = run_config(script, fixture_path("scripts/state.xml"), out_path.clone());
    config.schema.catalog = Some(fixture_path("orders/catalog.yaml"));

    run_script(config).expect("script runs");

    let written = std::fs::read_to_string(&out_path).expect("output written");
    assert!(written.contains("Active"), "old label in output: {written}");
    assert!(written.contains("Closed"), "new label in output: {written}");
}
