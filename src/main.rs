use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use log::error;

use run::RunArgs;

mod error;
mod inspect;
mod run;

#[derive(Parser, Debug)]
#[command(name = "wisp")]
#[command(about = "Headless 2D smoke simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Seed a simulation and record its dye field frame by frame.
    Run(RunArgs),
    /// Print per-frame dye intensity of a raw recording.
    Inspect {
        /// Recording directory.
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(args) => run::run(&args),
        Command::Inspect { dir } => inspect::inspect(&dir),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
