mod cli;
mod derivation;
mod error_handling;
mod generator;
mod grammar;
mod tasks;

use clap::Parser;

fn main() {
    env_logger::init();

    let args = cli::Cli::parse();
    let attempts = args.attempts.unwrap_or(generator::DEFAULT_MAX_ATTEMPTS);

    if let Err(error) = tasks::run_file(&args.file, attempts) {
        eprintln!("{}", error);
        std::process::exit(1);
    }
}
