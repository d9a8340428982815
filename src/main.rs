use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use tracing::{error, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a random workload file.
    Generate(cmd::generate::GenerateArgs),
    /// Show workload statistics and the greedy baseline.
    Inspect(cmd::inspect::InspectArgs),
    /// Evolve populations and report the best distributions.
    Run(cmd::run::RunArgs),
}

fn main() {
    // Raw matches let `run` tell typed flags apart from clap defaults.
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .init();

    let outcome = match cli.command {
        Commands::Generate(args) => cmd::generate::run(args),
        Commands::Inspect(args) => cmd::inspect::run(args),
        Commands::Run(args) => {
            let fallback = ArgMatches::default();
            let sub_matches = matches.subcommand_matches("run").unwrap_or(&fallback);
            cmd::run::run(args, sub_matches)
        }
    };

    if let Err(e) = outcome {
        error!("❌ {}", e);
        process::exit(1);
    }
}
