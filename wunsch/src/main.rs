mod cli;
mod pipeline;
mod stats;
mod util;

use cli::{Cli, SubCommands};
use pipeline::{align, generate};
use util::{init_logger, set_threads};

use clap::Parser;

fn main() -> anyhow::Result<()> {
    match Cli::parse().command {
        SubCommands::Align(args) => {
            init_logger(args.common_args.verbose);
            set_threads(args.common_args.num_threads)?;

            let stats = align(&args)?;
            stats.write(&mut std::io::stderr())?;
        }
        SubCommands::Generate(args) => {
            init_logger(args.common_args.verbose);
            generate(&args)?;
        }
    }
    Ok(())
}
