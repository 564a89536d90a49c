mod config;
mod dataset_cmd;
mod graph_cmd;
mod plan_cmds;
mod resolve;
#[cfg(test)]
mod test_util;

use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

use config::{AharaConfig, CliOverrides};

#[derive(Parser)]
#[command(name = "ahara", about = "Ayurvedic meal-plan synthesis")]
struct Cli {
    /// Knowledge-base TOML file (overrides AHARA_KNOWLEDGE_BASE env var)
    #[arg(long, global = true)]
    knowledge_base: Option<PathBuf>,

    /// Generator executable (overrides AHARA_ORACLE_COMMAND env var)
    #[arg(long, global = true)]
    oracle_command: Option<String>,

    /// Model directory passed to the generator (overrides AHARA_MODEL_DIR env var)
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,

    /// Model type to select from the oracle registry
    #[arg(long, global = true)]
    model_type: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            knowledge_base: self.knowledge_base.clone(),
            model_type: self.model_type.clone(),
            model_dir: self.model_dir.clone(),
            oracle_command: self.oracle_command.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default ahara config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Build the knowledge graph and write its feature export as JSON
    Graph {
        /// Output file path (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List food names per category
    Categories,
    /// Suggest meals for a patient from the category index
    Recommend {
        /// Patient ID
        patient_id: String,
    },
    /// Print the prompt that would be sent to the generator
    Prompt {
        /// Patient ID
        patient_id: String,
        /// Day number (1-7); omit for the weekly prompt
        #[arg(long)]
        day: Option<u8>,
    },
    /// Generate a weekly (or single-day) meal plan
    Plan {
        /// Patient ID
        patient_id: String,
        /// Day number (1-7); omit for a full week
        #[arg(long)]
        day: Option<u8>,
        /// Parse previously captured generator output instead of calling the generator
        #[arg(long)]
        from_text: Option<PathBuf>,
        /// Do not consult the knowledge graph's category index
        #[arg(long)]
        no_graph: bool,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write prompt/target training pairs from reference plans as JSON Lines
    Dataset {
        /// One example per reference week instead of per day
        #[arg(long)]
        weekly: bool,
        /// Output file path (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print shell completions
    Completions {
        shell: Shell,
    },
}

/// Execute the `ahara init` command: write config file.
fn cmd_init(force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let path = config::save_config(&config::ConfigFile::default())?;

    println!("Config written to {}", path.display());
    println!("  oracle.model_type = {}", ahara_core::oracle::DEFAULT_MODEL_TYPE);
    println!();
    println!("Set oracle.command to a generator executable to enable model output.");

    Ok(())
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Commands that must work without a readable config file.
    match cli.command {
        Commands::Init { force } => {
            init_logging("info");
            return cmd_init(force);
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "ahara", &mut std::io::stdout());
            return Ok(());
        }
        _ => {}
    }

    let resolved = AharaConfig::resolve(&cli.overrides()).context("failed to resolve configuration")?;
    init_logging(&resolved.log_level);

    match cli.command {
        Commands::Graph { output } => graph_cmd::run_graph(&resolved, output.as_deref()),
        Commands::Categories => graph_cmd::run_categories(&resolved),
        Commands::Recommend { patient_id } => plan_cmds::run_recommend(&resolved, &patient_id),
        Commands::Prompt { patient_id, day } => plan_cmds::run_prompt(&resolved, &patient_id, day),
        Commands::Plan {
            patient_id,
            day,
            from_text,
            no_graph,
            json,
        } => {
            let request = plan_cmds::PlanRequest {
                patient_id,
                day,
                from_text,
                no_graph,
                json,
            };
            plan_cmds::run_plan(&resolved, &request).await
        }
        Commands::Dataset { weekly, output } => {
            dataset_cmd::run_dataset(&resolved, weekly, output.as_deref())
        }
        Commands::Init { .. } | Commands::Completions { .. } => Ok(()),
    }
}
