use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tableaudit_core::{CheckName, Config};
use tableaudit_engine::{CheckOrchestrator, CheckSelection, RunOutcome};

mod render;

use render::OutputFormat;

const DEFAULT_CONFIG: &str = "tableaudit.toml";

/// tableaudit - Schema consistency verification for table list, YAML and DDL
#[derive(Parser)]
#[command(name = "tableaudit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: tableaudit.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check table list, YAML details and DDL against each other
    Check {
        /// Comma-separated table names (default: every known table)
        #[arg(short, long, value_delimiter = ',')]
        tables: Vec<String>,

        /// Comma-separated check names (default: all checks)
        #[arg(long)]
        checks: Option<String>,

        /// Generate fix suggestions
        #[arg(long)]
        suggest_fixes: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Console)]
        format: OutputFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Markdown table list file
        #[arg(long)]
        table_list: Option<PathBuf>,

        /// Directory of `T_details.yaml` files
        #[arg(long)]
        yaml_dir: Option<PathBuf>,

        /// Directory of `T.sql` files
        #[arg(long)]
        ddl_dir: Option<PathBuf>,
    },

    /// List the available checks
    ListChecks,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref(), cli.verbose)?;

    match cli.command {
        Commands::Check {
            tables,
            checks,
            suggest_fixes,
            format,
            output,
            table_list,
            yaml_dir,
            ddl_dir,
        } => {
            let mut config = config;
            if let Some(path) = table_list {
                config.paths.table_list = path;
            }
            if let Some(dir) = yaml_dir {
                config.paths.yaml_dir = dir;
            }
            if let Some(dir) = ddl_dir {
                config.paths.ddl_dir = dir;
            }

            let selection = match checks {
                Some(csv) => CheckSelection::parse(&csv).context("Invalid --checks")?,
                None => CheckSelection::all(),
            }
            .with_suggest_fixes(suggest_fixes);

            check_command(config, selection, &tables, format, output.as_deref())
        }
        Commands::ListChecks => {
            list_checks_command();
            Ok(())
        }
    }
}

/// `RUST_LOG` wins; otherwise `warn`, or `debug` with `--verbose`
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    if let Some(path) = path {
        tracing::debug!(path = %path.display(), "loading config");
        return Config::from_file(path).with_context(|| format!("Failed to load config {}", path.display()));
    }

    let default = Path::new(DEFAULT_CONFIG);
    if default.exists() {
        tracing::debug!(path = DEFAULT_CONFIG, "loading default config");
        return Config::from_file(default).with_context(|| format!("Failed to load config {DEFAULT_CONFIG}"));
    }

    if verbose {
        eprintln!("{}", "No config file found, using defaults".yellow());
    }
    Ok(Config::default())
}

fn check_command(
    config: Config,
    selection: CheckSelection,
    tables: &[String],
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let mut orchestrator = CheckOrchestrator::new(config).with_selection(selection);
    let outcome = orchestrator.run(tables);

    if let RunOutcome::PathInvalid { error, .. } = &outcome {
        eprintln!("{} {}", "Configuration error:".red().bold(), error);
        std::process::exit(outcome.exit_code());
    }

    let rendered = render::render(outcome.report(), format).context("Failed to render report")?;
    match output {
        Some(path) => {
            std::fs::write(path, rendered).with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{} {}", "Report saved to:".green(), path.display());
        }
        None => println!("{rendered}"),
    }

    // Exit with error code if there are errors
    if outcome.exit_code() != 0 {
        std::process::exit(outcome.exit_code());
    }

    Ok(())
}

fn list_checks_command() {
    println!("{}", "Available checks:".bold());
    for check in CheckName::ALL {
        println!("  {} {}", format!("{:<26}", check.as_str()).green(), check.description());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn check_arguments() {
        let cli = Cli::try_parse_from([
            "tableaudit",
            "check",
            "--tables",
            "MST_Item,TRN_Order",
            "--checks",
            "table_existence",
            "--format",
            "markdown",
            "--suggest-fixes",
        ])
        .unwrap();

        match cli.command {
            Commands::Check {
                tables,
                checks,
                suggest_fixes,
                format,
                ..
            } => {
                assert_eq!(tables, vec!["MST_Item", "TRN_Order"]);
                assert_eq!(checks.as_deref(), Some("table_existence"));
                assert!(suggest_fixes);
                assert_eq!(format, OutputFormat::Markdown);
            }
            Commands::ListChecks => panic!("expected check"),
        }
    }

    #[test]
    fn explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG);
        std::fs::write(&path, "[multitenant]\ntenant_column = \"org_id\"\n").unwrap();

        let config = load_config(Some(&path), false).unwrap();
        assert_eq!(config.multitenant.tenant_column, "org_id");
        assert_eq!(config.paths.yaml_dir, dir.path().join("docs/design/database/table-details"));
    }
}
