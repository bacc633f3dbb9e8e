use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Args, ValueEnum};
use log::{debug, info};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use libwunsch::align::structs::{AlignParams, Alignment, MissingPairPolicy, Objective};
use libwunsch::align::AlignmentEngine;
use libwunsch::structs::{CostModel, Delimiter, MalformedLinePolicy, PairFile, SequencePair};

use crate::cli::CommonArgs;
use crate::stats::{CountedValue, SerialTimed, Stats};

use super::OutputStage;

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ObjectiveArg {
    /// Lower totals are better: the table holds costs
    #[default]
    Minimize,
    /// Higher totals are better: the table holds scores
    Maximize,
}

impl From<ObjectiveArg> for Objective {
    fn from(arg: ObjectiveArg) -> Self {
        match arg {
            ObjectiveArg::Minimize => Objective::Minimize,
            ObjectiveArg::Maximize => Objective::Maximize,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingPairArg {
    /// Stop with an error naming the pair
    #[default]
    Error,
    /// Never use the transition
    Forbid,
}

impl From<MissingPairArg> for MissingPairPolicy {
    fn from(arg: MissingPairArg) -> Self {
        match arg {
            MissingPairArg::Error => MissingPairPolicy::Error,
            MissingPairArg::Forbid => MissingPairPolicy::Forbid,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedLineArg {
    /// Stop at the first malformed line
    #[default]
    Abort,
    /// Warn about the line and leave it out of the output
    Skip,
}

impl From<MalformedLineArg> for MalformedLinePolicy {
    fn from(arg: MalformedLineArg) -> Self {
        match arg {
            MalformedLineArg::Abort => MalformedLinePolicy::Abort,
            MalformedLineArg::Skip => MalformedLinePolicy::Skip,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DelimiterArg {
    /// Comma if the header line has one, otherwise whitespace
    #[default]
    Auto,
    Comma,
    Whitespace,
}

impl From<DelimiterArg> for Delimiter {
    fn from(arg: DelimiterArg) -> Self {
        match arg {
            DelimiterArg::Auto => Delimiter::Auto,
            DelimiterArg::Comma => Delimiter::Comma,
            DelimiterArg::Whitespace => Delimiter::Whitespace,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct AlignmentArgs {
    /// Whether the cost table is minimized or maximized
    #[arg(long = "objective", value_enum, default_value_t = ObjectiveArg::Minimize)]
    pub objective: ObjectiveArg,

    /// What to do when a symbol pair has no entry in the cost table
    #[arg(long = "missing-pair", value_enum, default_value_t = MissingPairArg::Error)]
    pub missing_pair: MissingPairArg,

    /// What to do with a line of the pair file that can't be parsed
    #[arg(long = "malformed-line", value_enum, default_value_t = MalformedLineArg::Abort)]
    pub malformed_line: MalformedLineArg,

    /// How the fields of the cost table are separated
    #[arg(long = "delimiter", value_enum, default_value_t = DelimiterArg::Auto)]
    pub delimiter: DelimiterArg,
}

impl AlignmentArgs {
    pub fn align_params(&self) -> AlignParams {
        AlignParams::new(self.objective.into(), self.missing_pair.into())
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Where to place a human readable rendering of every alignment
    #[arg(short = 'P', long = "pretty-output", value_name = "path")]
    pub pretty_path: Option<PathBuf>,

    /// Where to place per-pair runtime statistics (JSON)
    #[arg(short = 'S', long = "stats-output", value_name = "path")]
    pub stats_path: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct AlignArgs {
    /// Sequence pair file, one SEQ1,SEQ2 per line
    #[arg(value_name = "PAIRS")]
    pub pairs_path: PathBuf,

    /// Cost table file
    #[arg(value_name = "COSTS")]
    pub costs_path: PathBuf,

    /// Where to place the alignments, one ALIGNED1,ALIGNED2:SCORE per line
    #[arg(value_name = "OUTPUT")]
    pub output_path: PathBuf,

    /// Arguments that control how the alignments are computed
    #[command(flatten)]
    pub alignment_args: AlignmentArgs,

    /// Arguments that control output options
    #[command(flatten)]
    pub output_args: OutputArgs,

    /// Arguments that are common across all wunsch subcommands
    #[command(flatten)]
    pub common_args: CommonArgs,
}

/// One aligned pair and what it took to align it.
pub struct PairResult {
    /// The line of the pair file the pair came from
    pub line: usize,
    pub length_1: usize,
    pub length_2: usize,
    pub cells: usize,
    pub time: Duration,
    pub alignment: Alignment,
}

impl PairResult {
    fn new(pair: &SequencePair, alignment: Alignment, time: Duration) -> Self {
        Self {
            line: pair.line,
            length_1: pair.first.length,
            length_2: pair.second.length,
            cells: (pair.first.length + 1) * (pair.second.length + 1),
            time,
            alignment,
        }
    }
}

/// Align every pair with one engine, in parallel.
///
/// The results come back in the order of `pairs`. The first pair that
/// fails to align stops the batch.
pub fn align_pairs(
    pairs: &[SequencePair],
    engine: &AlignmentEngine,
    stats: &Stats,
) -> anyhow::Result<Vec<PairResult>> {
    pairs
        .par_iter()
        .map(|pair| {
            let now = Instant::now();
            let alignment = engine
                .align(&pair.first, &pair.second)
                .with_context(|| format!("failed to align the pair on line {}", pair.line))?;

            let result = PairResult::new(pair, alignment, now.elapsed());

            stats.increment_count(CountedValue::Pairs);
            stats.add_count(CountedValue::Cells, result.cells);

            debug!(
                "line {}: {}x{} aligned in {:.6}s",
                result.line,
                result.length_1,
                result.length_2,
                result.time.as_secs_f64()
            );

            Ok(result)
        })
        .collect()
}

pub fn align(args: &AlignArgs) -> anyhow::Result<Stats> {
    let mut stats = Stats::default();
    let total_now = Instant::now();

    let now = Instant::now();
    // the cost table goes first: a bad table stops the run before anything else
    let cost_model = CostModel::from_path(&args.costs_path, args.alignment_args.delimiter.into())?;

    let pair_file = PairFile::from_path(
        &args.pairs_path,
        args.alignment_args.malformed_line.into(),
    )?;
    stats.add_count(CountedValue::SkippedLines, pair_file.skipped.len());
    stats.set_serial_time(SerialTimed::Reading, now.elapsed());

    info!(
        "read {} pairs from {}",
        pair_file.pairs.len(),
        args.pairs_path.to_string_lossy()
    );

    let mut output = OutputStage::new(
        &args.output_path,
        &args.output_args,
        args.common_args.allow_overwrite,
    )?;

    let engine = AlignmentEngine::new(Arc::new(cost_model), args.alignment_args.align_params());
    info!(
        "aligning with objective {:?} over {} cost table symbols",
        engine.params().objective,
        engine.cost_model().symbols().len()
    );

    let now = Instant::now();
    let results = align_pairs(&pair_file.pairs, &engine, &stats)?;
    stats.set_serial_time(SerialTimed::Alignment, now.elapsed());

    let now = Instant::now();
    output.write_alignments(&results)?;
    stats.set_serial_time(SerialTimed::Writing, now.elapsed());

    stats.set_serial_time(SerialTimed::Total, total_now.elapsed());
    output.write_stats(&results, &stats)?;
    output.finish()?;

    info!(
        "wrote {} alignments to {}",
        results.len(),
        args.output_path.to_string_lossy()
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use libwunsch::structs::{MalformedPairError, MalformedTableError, UnknownPairError};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const UNIT_TABLE: &str = "\
,A,C,G,T,-
A,0,1,1,1,1
C,1,0,1,1,1
G,1,1,0,1,1
T,1,1,1,0,1
-,1,1,1,1,0
";

    fn args(dir: &Path, pairs: &str, costs: &str) -> anyhow::Result<AlignArgs> {
        let pairs_path = dir.join("pairs.txt");
        let costs_path = dir.join("costs.csv");
        fs::write(&pairs_path, pairs)?;
        fs::write(&costs_path, costs)?;

        Ok(AlignArgs {
            pairs_path,
            costs_path,
            output_path: dir.join("out.txt"),
            alignment_args: AlignmentArgs::default(),
            output_args: OutputArgs::default(),
            common_args: CommonArgs::default(),
        })
    }

    #[test]
    fn test_align_writes_in_input_order() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let pairs = "GATTACA,GCATGCA\nA,A\n\nAC,CA\nAA,A\nACGT,\n";
        let args = args(dir.path(), pairs, UNIT_TABLE)?;

        // an empty second field is malformed
        let_assert!(Err(err) = align(&args));
        let_assert!(Some(err) = err.downcast_ref::<MalformedPairError>());
        check!(err.line == 6);
        check!(!args.output_path.exists());

        fs::write(&args.pairs_path, "GATTACA,GCATGCA\nA,A\n\nAC,CA\nAA,A\n")?;
        let stats = align(&args)?;

        let out = fs::read_to_string(&args.output_path)?;
        check!(out == "GATTACA,GCATGCA:3\nA,A:0\nAC,CA:2\nAA,-A:1\n");
        check!(stats.counted_value(CountedValue::Pairs) == 4);
        check!(stats.counted_value(CountedValue::Cells) == 64 + 4 + 9 + 6);
        Ok(())
    }

    #[test]
    fn test_align_skip_malformed_lines() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let mut args = args(dir.path(), "AC,CA\nnot a pair\nA-C,A\nA,C\n", UNIT_TABLE)?;
        args.alignment_args.malformed_line = MalformedLineArg::Skip;

        let stats = align(&args)?;

        let out = fs::read_to_string(&args.output_path)?;
        check!(out == "AC,CA:2\nA,C:1\n");
        check!(stats.counted_value(CountedValue::SkippedLines) == 2);
        Ok(())
    }

    #[test]
    fn test_align_malformed_table() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let args = args(dir.path(), "AC,CA\n", ",A,-\nA,0,1\n-,1\n")?;

        let_assert!(Err(err) = align(&args));
        check!(err.downcast_ref::<MalformedTableError>().is_some());
        check!(!args.output_path.exists());
        Ok(())
    }

    #[test]
    fn test_align_missing_pair() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let mut args = args(dir.path(), "A,A\nA,G\n", ",A,-\nA,0,1\n-,1,0\n")?;

        let_assert!(Err(err) = align(&args));
        check!(
            err.downcast_ref::<UnknownPairError>()
                == Some(&UnknownPairError {
                    first: b'-',
                    second: b'G'
                })
        );
        check!(format!("{err:#}").contains("line 2"));

        // the failed run left an empty output file behind
        args.common_args.allow_overwrite = true;
        args.alignment_args.missing_pair = MissingPairArg::Forbid;
        let_assert!(Err(err) = align(&args));
        check!(format!("{err:#}").contains("no alignment exists"));
        Ok(())
    }

    #[test]
    fn test_align_maximize() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let scores = ",A,C,G,T,-\nA,1,-1,-1,-1,-2\nC,-1,1,-1,-1,-2\nG,-1,-1,1,-1,-2\nT,-1,-1,-1,1,-2\n-,-2,-2,-2,-2,0\n";
        let mut args = args(dir.path(), "GATTACA,GCATGCA\n", scores)?;
        args.alignment_args.objective = ObjectiveArg::Maximize;

        align(&args)?;

        check!(fs::read_to_string(&args.output_path)? == "GATTACA,GCATGCA:1\n");
        Ok(())
    }

    #[test]
    fn test_align_refuses_to_overwrite() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let mut args = args(dir.path(), "A,A\n", UNIT_TABLE)?;
        fs::write(&args.output_path, "precious")?;

        check!(align(&args).is_err());
        check!(fs::read_to_string(&args.output_path)? == "precious");

        args.common_args.allow_overwrite = true;
        align(&args)?;
        check!(fs::read_to_string(&args.output_path)? == "A,A:0\n");
        Ok(())
    }

    #[test]
    fn test_align_pretty_and_stats_output() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let mut args = args(dir.path(), "ACG,ATG\n\nAA,A\n", UNIT_TABLE)?;
        args.output_args.pretty_path = Some(dir.path().join("pretty.txt"));
        args.output_args.stats_path = Some(dir.path().join("stats.json"));

        align(&args)?;

        let pretty = fs::read_to_string(dir.path().join("pretty.txt"))?;
        let expected = "\
# line 1 score 1
==  score: 1;  identities: 2/3
1 ACG 3
  | |
1 ATG 3

# line 3 score 1
==  score: 1;  identities: 1/2
1 AA 2
   |
1 -A 1

";
        check!(pretty == expected);

        let stats: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("stats.json"))?)?;
        check!(stats["pairs"][0]["line"] == 1);
        check!(stats["pairs"][0]["cells"] == 16);
        check!(stats["pairs"][1]["line"] == 3);
        check!(stats["pairs"][1]["length_1"] == 2);
        check!(stats["pairs"][1]["length_2"] == 1);
        check!(stats["totals"]["pairs"] == 2);
        check!(stats["totals"]["cells"] == 22);
        Ok(())
    }
}
