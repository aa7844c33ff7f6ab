//! docdiff-tools: Structural diff tool for hierarchical document state
//!
//! Compares two versions of an XML document tree and renders an annotated
//! change-history tree.

#![allow(clippy::too_many_lines, clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use docdiff_tools::{
    annotate::DisplayStyle,
    cli,
    config::{
        self, BehaviorConfig, CompareOptions, ComparePaths, CompareRunConfig, OutputConfig,
        SchemaConfig, ScriptRunConfig, Validatable,
    },
    pipeline::exit_codes,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with display style info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nDisplay Styles:",
        "\n  legacy: merged single-tree output, backward compatible",
        "\n  hint:   new-shape output with per-node change metadata",
        "\n\nFeatures:",
        "\n  Identity-aware tree alignment, mapset label resolution, script host"
    )
}

#[derive(Parser)]
#[command(name = "docdiff-tools")]
#[command(version, long_version = build_long_version())]
#[command(about = "Structural diff tool for hierarchical document state", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  No changes detected (or no --fail-on-change)
    1  Changes detected
    2  Error occurred

EXAMPLES:
    # Compare two document versions
    docdiff-tools compare old.xml new.xml --version-label v2

    # Resolve coded values through a schema module before comparing
    docdiff-tools compare old.xml new.xml --catalog schemas.yaml \\
        --schema-module orders --materialise-mapsets

    # CI check: fail when anything changed
    docdiff-tools compare old.xml new.xml --style hint --fail-on-change

    # Run the command elements of a script against a state document
    docdiff-tools script commands.xml state.xml -O updated-state.xml")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs (extracted for readability)
// ============================================================================

/// Arguments for the `compare` subcommand
#[derive(Parser)]
struct CompareArgs {
    /// Path to the old version of the document
    old: PathBuf,

    /// Path to the new version of the document
    new: PathBuf,

    /// Version label attached to the result root
    #[arg(short = 'l', long, default_value = "")]
    version_label: String,

    /// Display style for the result tree
    #[arg(short, long, value_enum)]
    style: Option<DisplayStyle>,

    /// Selector path narrowing the old document to a subtree
    #[arg(long, value_name = "PATH")]
    select_one: Option<String>,

    /// Selector path narrowing the new document to a subtree
    #[arg(long, value_name = "PATH")]
    select_two: Option<String>,

    /// Attribute consulted for identity matching within same-tag groups
    #[arg(long)]
    identity_attribute: Option<String>,

    /// Resolve coded values to mapset labels before comparing
    #[arg(long)]
    materialise_mapsets: bool,

    /// Path to a schema catalog file (YAML or JSON)
    #[arg(long, env = "DOCDIFF_CATALOG")]
    catalog: Option<PathBuf>,

    /// Schema module supplying the mapsets
    #[arg(long)]
    schema_module: Option<String>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Spaces of indentation for the output (compact if not specified)
    #[arg(long)]
    indent: Option<usize>,

    /// Exit with code 1 if any changes are detected
    #[arg(long)]
    fail_on_change: bool,
}

/// Arguments for the `script` subcommand
#[derive(Parser)]
struct ScriptArgs {
    /// Script document whose root children are command elements
    script: PathBuf,

    /// State document the commands operate on
    state: PathBuf,

    /// Attribute consulted for identity matching within same-tag groups
    #[arg(long)]
    identity_attribute: Option<String>,

    /// Path to a schema catalog file (YAML or JSON)
    #[arg(long, env = "DOCDIFF_CATALOG")]
    catalog: Option<PathBuf>,

    /// Output file path for the final state (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Spaces of indentation for the output (compact if not specified)
    #[arg(long)]
    indent: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two versions of a document
    Compare(CompareArgs),

    /// Run the command elements of a script against a state document
    Script(ScriptArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and the discovered config file
    Path,
    /// Generate an example .docdiff-tools.yaml in the current directory
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Compare(args) => {
            let (file_config, _) = config::load_or_default(cli.config.as_deref());

            let run = CompareRunConfig {
                paths: ComparePaths {
                    old: args.old,
                    new: args.new,
                    select_old: args.select_one,
                    select_new: args.select_two,
                },
                version_label: args.version_label,
                compare: CompareOptions {
                    style: args.style.unwrap_or(file_config.compare.style),
                    identity_attribute: args
                        .identity_attribute
                        .unwrap_or(file_config.compare.identity_attribute),
                    materialise_mapsets: args.materialise_mapsets
                        || file_config.compare.materialise_mapsets,
                },
                schema: SchemaConfig {
                    catalog: args.catalog.or(file_config.schema.catalog),
                    default_module: args.schema_module.or(file_config.schema.default_module),
                },
                output: OutputConfig {
                    file: args.output_file.or(file_config.output.file),
                    indent: args.indent.or(file_config.output.indent),
                },
                behavior: BehaviorConfig {
                    fail_on_change: args.fail_on_change || file_config.behavior.fail_on_change,
                    quiet: cli.quiet || file_config.behavior.quiet,
                },
            };
            let exit_code = run_to_exit_code(
                reject_invalid(&run.compare, &run.schema, &run.output)
                    .and_then(|()| cli::run_compare(run)),
            );
            if exit_code != exit_codes::SUCCESS {
                std::process::exit(exit_code);
            }
            Ok(())
        }

        Commands::Script(args) => {
            let (file_config, _) = config::load_or_default(cli.config.as_deref());

            let run = ScriptRunConfig {
                script: args.script,
                state: args.state,
                compare: {
                    let mut compare = file_config.compare;
                    if let Some(attr) = args.identity_attribute {
                        compare.identity_attribute = attr;
                    }
                    compare
                },
                schema: SchemaConfig {
                    catalog: args.catalog.or(file_config.schema.catalog),
                    default_module: file_config.schema.default_module,
                },
                output: OutputConfig {
                    file: args.output_file.or(file_config.output.file),
                    indent: args.indent.or(file_config.output.indent),
                },
                behavior: BehaviorConfig {
                    fail_on_change: false,
                    quiet: cli.quiet || file_config.behavior.quiet,
                },
            };
            let exit_code = run_to_exit_code(
                reject_invalid(&run.compare, &run.schema, &run.output)
                    .and_then(|()| cli::run_script(run)),
            );
            if exit_code != exit_codes::SUCCESS {
                std::process::exit(exit_code);
            }
            Ok(())
        }

        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "docdiff-tools",
                &mut io::stdout(),
            );
            Ok(())
        }

        Commands::ConfigSchema { output } => {
            let schema = config::generate_json_schema();
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) = config::load_or_default(cli.config.as_deref());
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(())
            }
            ConfigAction::Path => {
                eprintln!("Config file search locations (in order):");
                if let Ok(cwd) = std::env::current_dir() {
                    eprintln!("  {} (and ancestor git root)", cwd.display());
                }
                if let Some(dir) = dirs::config_dir() {
                    eprintln!("  {}", dir.join("docdiff-tools").display());
                }
                if let Some(dir) = dirs::home_dir() {
                    eprintln!("  {}", dir.display());
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in config::CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(())
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".docdiff-tools.yaml");
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                std::fs::write(&target, config::generate_full_example_config())
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(())
            }
        },
    }
}

/// Collapse a handler result into an exit code, reporting any failure.
fn run_to_exit_code(result: Result<i32>) -> i32 {
    match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("Error: {error:#}");
            exit_codes::ERROR
        }
    }
}

/// Fail fast when the assembled run configuration is invalid.
fn reject_invalid(
    compare: &CompareOptions,
    schema: &SchemaConfig,
    output: &OutputConfig,
) -> Result<()> {
    let mut errors = Vec::new();
    errors.extend(compare.validate());
    errors.extend(schema.validate());
    errors.extend(output.validate());
    if errors.is_empty() {
        return Ok(());
    }

    let mut report = String::from("invalid configuration:");
    for error in errors {
        report.push_str("\n  ");
        report.push_str(&error.to_string());
    }
    anyhow::bail!(report)
}
