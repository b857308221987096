use animus_core::AnimusConfig;
use animus_reasoning::SemanticEncoder;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod scenario;

use scenario::Scenario;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, global = true, env = "ANIMUS_CONFIG")]
    config: Option<PathBuf>,

    /// Emit JSON reports and JSON logs
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every agent in a scenario through its cycles
    Run {
        /// Scenario file (JSON)
        #[arg(short, long)]
        scenario: PathBuf,

        /// Cycles per agent; missing ones are idle cycles a minute apart
        #[arg(short = 'n', long)]
        cycles: Option<usize>,

        /// Write the final agent states to this file
        #[arg(long)]
        state_out: Option<PathBuf>,
    },
    /// Print the encoded context for one agent without invoking anything
    Encode {
        #[arg(short, long)]
        scenario: PathBuf,

        /// Agent id
        #[arg(short, long)]
        agent: String,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<AnimusConfig> {
    match path {
        Some(p) => AnimusConfig::load(p),
        None => Ok(AnimusConfig::load_or_default("animus.toml")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json);
    let config = load_config(args.config.as_ref())?;

    match args.command {
        Command::Run {
            scenario,
            cycles,
            state_out,
        } => {
            info!("Loading scenario from {}...", scenario.display());
            let scenario = Scenario::load(&scenario)?;
            info!("Running {} agent(s)", scenario.agents.len());
            let runs = scenario::run(&config, scenario, cycles).await?;

            for run in &runs {
                for (i, report) in run.reports.iter().enumerate() {
                    if args.json {
                        println!("{}", serde_json::to_string(report)?);
                    } else {
                        println!("{}", scenario::summarize(report, i + 1));
                    }
                }
            }

            if let Some(path) = state_out {
                let agents: Vec<_> = runs.iter().map(|r| &r.agent).collect();
                let json = serde_json::to_string_pretty(&agents)?;
                std::fs::write(&path, json)
                    .with_context(|| format!("Failed to write state to {}", path.display()))?;
                info!("Final state written to {}", path.display());
            }
        }
        Command::Encode { scenario, agent } => {
            let scenario = Scenario::load(&scenario)?;
            let agent = scenario
                .agent(&agent)
                .with_context(|| format!("No agent '{}' in scenario", agent))?;
            print!("{}", SemanticEncoder::encode(agent, &[], &[]).render());
        }
    }

    Ok(())
}
