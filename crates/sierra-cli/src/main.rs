//! `sierra`: expand batch criteria, scaffold batches and compute
//! performance measures.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sierra_core::SierraConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sierra")]
#[command(about = "Batch-criteria expansion and performance measures for swarm experiments")]
#[command(version)]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the experiments a criterion expands to
    Describe {
        /// Criterion token; pass twice for a bivariate batch
        #[arg(long = "criteria", required = true, num_args = 1)]
        criteria: Vec<String>,

        /// Batch root the experiment paths are shown under
        #[arg(long, default_value = ".")]
        batch_root: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Create experiment directories and persist their change sets
    Scaffold {
        /// Criterion token; pass twice for a bivariate batch
        #[arg(long = "criteria", required = true, num_args = 1)]
        criteria: Vec<String>,

        /// Batch root directory
        #[arg(long)]
        batch_root: PathBuf,
    },

    /// Compute performance measures from collated tables
    Measures {
        /// Criterion token; pass twice for a bivariate batch
        #[arg(long = "criteria", required = true, num_args = 1)]
        criteria: Vec<String>,

        /// Batch root directory
        #[arg(long)]
        batch_root: PathBuf,
    },

    /// Show a persisted experiment definition
    Inspect {
        /// Path to an exp_def.json file
        #[arg(long)]
        exp_def: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool, json: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SierraConfig> {
    match path {
        Some(path) => SierraConfig::from_yaml_file(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(SierraConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);
    let cfg = load_config(cli.config.as_ref())?;
    tracing::debug!(command = ?cli.command, config = ?cli.config, "starting");

    let output = match cli.command {
        Commands::Describe {
            criteria,
            batch_root,
            json,
        } => commands::describe(&criteria, &cfg, &batch_root, json)?,
        Commands::Scaffold {
            criteria,
            batch_root,
        } => commands::scaffold(&criteria, &cfg, &batch_root)?,
        Commands::Measures {
            criteria,
            batch_root,
        } => commands::measures(&criteria, &cfg, &batch_root)?,
        Commands::Inspect { exp_def, json } => commands::inspect(&exp_def, json)?,
    };
    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bivariate_criteria_repeat_the_flag() {
        let cli = Cli::try_parse_from([
            "sierra",
            "--verbose",
            "describe",
            "--criteria",
            "swarm_size.Log8",
            "--criteria",
            "oracle.all",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Describe { criteria, .. } => {
                assert_eq!(criteria, vec!["swarm_size.Log8", "oracle.all"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn scaffold_requires_batch_root() {
        let args = ["sierra", "scaffold", "--criteria", "swarm_size.Log8"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
