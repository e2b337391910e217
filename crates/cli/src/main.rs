mod commands;
mod config;
mod loader;
mod transcoding;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Session rule evaluator.
#[derive(Parser)]
#[command(
    name = "ceh",
    version,
    about = "Evaluate session records against business rules"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log filter for stderr diagnostics (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Path to a ceh.toml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a session record and print the selected message
    Eval {
        /// Path to the session record JSON file
        record: PathBuf,
        /// Path to the rule catalog (YAML or JSON)
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Evaluation date (YYYY-MM-DD); defaults to today (UTC)
        #[arg(long)]
        date: Option<String>,
        /// Also list every matched rule
        #[arg(long)]
        all: bool,
    },

    /// Load a rule catalog and report malformed rules and unknown labels
    Check {
        /// Path to the rule catalog (YAML or JSON)
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Print the active transcoding table
    Transcoding,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.quiet);

    let config = load_config(cli.config.as_deref(), cli.output, cli.quiet);

    match cli.command {
        Commands::Eval {
            record,
            rules,
            date,
            all,
        } => {
            let rules = rules_path(rules, &config, cli.output, cli.quiet);
            commands::eval::cmd_eval(
                &record,
                &rules,
                date.as_deref(),
                all,
                &config,
                cli.output,
                cli.quiet,
            );
        }
        Commands::Check { rules } => {
            let rules = rules_path(rules, &config, cli.output, cli.quiet);
            commands::check::cmd_check(&rules, &config, cli.output, cli.quiet);
        }
        Commands::Transcoding => {
            commands::transcoding::cmd_transcoding(&config, cli.output, cli.quiet);
        }
    }
}

fn init_logging(level: &str, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>, output: OutputFormat, quiet: bool) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    match config::read_config(path) {
        Ok(c) => c,
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    }
}

/// `--rules` wins over the config file's `rules` key.
fn rules_path(
    flag: Option<PathBuf>,
    config: &Config,
    output: OutputFormat,
    quiet: bool,
) -> PathBuf {
    match flag.or_else(|| config.rules.clone()) {
        Some(p) => p,
        None => {
            report_error(
                "error: no rule catalog given (use --rules or set 'rules' in the config)",
                output,
                quiet,
            );
            process::exit(1);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
