use crate::pipeline::{AlignArgs, GenerateArgs};
use clap::{Args, Parser, Subcommand};

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// The number of threads to use
    #[arg(
        short = 't',
        long = "threads",
        default_value_t = 8usize,
        value_name = "n"
    )]
    pub num_threads: usize,

    /// Allow wunsch to overwrite files
    #[arg(long = "allow-overwrite", default_value_t = false)]
    pub allow_overwrite: bool,

    /// Print debug messages
    #[arg(short = 'v', long = "verbose", default_value_t = false)]
    pub verbose: bool,
}

impl Default for CommonArgs {
    fn default() -> Self {
        Self {
            num_threads: 8,
            allow_overwrite: false,
            verbose: false,
        }
    }
}

#[derive(Subcommand)]
pub enum SubCommands {
    #[command(about = "Globally align every pair of sequences in a file under a cost table")]
    Align(AlignArgs),
    #[command(about = "Write a file of random sequence pairs")]
    Generate(GenerateArgs),
}

#[derive(Parser)]
#[command(name = "wunsch")]
#[command(about = "Batch Needleman-Wunsch global alignment under an arbitrary cost table")]
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,
}
