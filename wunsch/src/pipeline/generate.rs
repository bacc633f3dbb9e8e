use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use log::info;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use thiserror::Error;

use libwunsch::alphabet::GAP;

use crate::cli::CommonArgs;
use crate::util::PathBufExt;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GenerateArgsError {
    #[error("the alphabet is empty")]
    EmptyAlphabet,
    #[error("the alphabet may only contain printable symbols other than '-', found: {0:?}")]
    InvalidSymbol(char),
    #[error("at least one sequence length is required")]
    NoLengths,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Where to place the generated pairs
    #[arg(value_name = "OUTPUT")]
    pub output_path: PathBuf,

    /// The number of pairs to write
    #[arg(short = 'n', long = "num-pairs", default_value_t = 2500usize, value_name = "n")]
    pub num_pairs: usize,

    /// The symbols the sequences are drawn from
    #[arg(short = 'a', long = "alphabet", default_value = "ACGT")]
    pub alphabet: String,

    /// The sequence lengths to choose from
    #[arg(
        short = 'l',
        long = "lengths",
        value_delimiter = ',',
        default_value = "5,10,100,500,1000,2000,4000,5000",
        value_name = "n,n,.."
    )]
    pub lengths: Vec<usize>,

    /// The random seed; without one the output differs on every run
    #[arg(short = 's', long = "seed", value_name = "n")]
    pub seed: Option<u64>,

    /// Arguments that are common across all wunsch subcommands
    #[command(flatten)]
    pub common_args: CommonArgs,
}

impl GenerateArgs {
    fn validate(&self) -> Result<(), GenerateArgsError> {
        if self.alphabet.is_empty() {
            return Err(GenerateArgsError::EmptyAlphabet);
        }

        if let Some(c) = self
            .alphabet
            .chars()
            .find(|&c| !c.is_ascii_graphic() || c == char::from(GAP))
        {
            return Err(GenerateArgsError::InvalidSymbol(c));
        }

        if self.lengths.is_empty() {
            return Err(GenerateArgsError::NoLengths);
        }

        Ok(())
    }
}

/// Draw one sequence: a length from `lengths`, then each symbol from `alphabet`.
pub fn random_sequence(rng: &mut impl Rng, alphabet: &[u8], lengths: &[usize]) -> String {
    let length = lengths.choose(rng).copied().unwrap_or(0);

    (0..length)
        .filter_map(|_| alphabet.choose(rng))
        .map(|&b| char::from(b))
        .collect()
}

pub fn write_pairs(
    out: &mut impl Write,
    rng: &mut impl Rng,
    num_pairs: usize,
    alphabet: &[u8],
    lengths: &[usize],
) -> anyhow::Result<()> {
    for _ in 0..num_pairs {
        let first = random_sequence(rng, alphabet, lengths);
        let second = random_sequence(rng, alphabet, lengths);
        writeln!(out, "{first},{second}")?;
    }

    Ok(())
}

pub fn generate(args: &GenerateArgs) -> anyhow::Result<()> {
    args.validate()?;

    let mut rng = match args.seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_entropy(),
    };

    let mut out = args.output_path.open(args.common_args.allow_overwrite)?;
    write_pairs(
        &mut out,
        &mut rng,
        args.num_pairs,
        args.alphabet.as_bytes(),
        &args.lengths,
    )
    .with_context(|| format!("failed to write pairs to: {}", args.output_path.to_string_lossy()))?;
    out.flush()?;

    info!(
        "wrote {} pairs to {}",
        args.num_pairs,
        args.output_path.to_string_lossy()
    );

    Ok(())
}
