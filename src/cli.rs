use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// File containing the task script
    pub file: PathBuf,

    /// Generation retries per requested string (default: 100)
    #[arg(short, long, value_name = "COUNT")]
    pub attempts: Option<u32>
}
