use std::{io::Write, path::PathBuf};

use anyhow::Context;
use serde::Serialize;

use crate::{
    stats::{RunTotals, Stats},
    util::PathBufExt,
};

use super::{OutputArgs, PairResult};

/// The per-pair record of the stats output.
#[derive(Serialize)]
pub struct PairStats {
    pub line: usize,
    pub length_1: usize,
    pub length_2: usize,
    pub cells: usize,
    pub seconds: f64,
}

impl From<&PairResult> for PairStats {
    fn from(result: &PairResult) -> Self {
        Self {
            line: result.line,
            length_1: result.length_1,
            length_2: result.length_2,
            cells: result.cells,
            seconds: result.time.as_secs_f64(),
        }
    }
}

#[derive(Serialize)]
struct StatsReport {
    pairs: Vec<PairStats>,
    totals: RunTotals,
}

pub struct OutputStage {
    alignment_writer: Box<dyn Write>,
    pretty_writer: Option<Box<dyn Write>>,
    stats_writer: Option<Box<dyn Write>>,
}

impl OutputStage {
    pub fn new(
        output_path: &PathBuf,
        args: &OutputArgs,
        allow_overwrite: bool,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            alignment_writer: Box::new(output_path.open(allow_overwrite)?),
            pretty_writer: match &args.pretty_path {
                Some(path) => Some(Box::new(path.open(allow_overwrite)?)),
                None => None,
            },
            stats_writer: match &args.stats_path {
                Some(path) => Some(Box::new(path.open(allow_overwrite)?)),
                None => None,
            },
        })
    }

    pub fn write_alignments(&mut self, results: &[PairResult]) -> anyhow::Result<()> {
        results
            .iter()
            .try_for_each(|r| writeln!(self.alignment_writer, "{}", r.alignment))
            .context("failed to write to alignment writer")?;

        if let Some(writer) = &mut self.pretty_writer {
            results
                .iter()
                .try_for_each(|r| {
                    writeln!(
                        writer,
                        "# line {} score {}\n{}",
                        r.line,
                        r.alignment.score,
                        r.alignment.ali_string()
                    )
                })
                .context("failed to write to pretty writer")?;
        }

        Ok(())
    }

    pub fn write_stats(&mut self, results: &[PairResult], stats: &Stats) -> anyhow::Result<()> {
        if let Some(writer) = &mut self.stats_writer {
            let report = StatsReport {
                pairs: results.iter().map(PairStats::from).collect(),
                totals: stats.totals(),
            };

            serde_json::to_writer_pretty(&mut *writer, &report)
                .context("failed to write to stats writer")?;
            writeln!(writer)?;
        }

        Ok(())
    }

    /// Flush every writer, surfacing any error a dropped writer would swallow.
    pub fn finish(mut self) -> anyhow::Result<()> {
        self.alignment_writer.flush()?;

        if let Some(writer) = &mut self.pretty_writer {
            writer.flush()?;
        }

        if let Some(writer) = &mut self.stats_writer {
            writer.flush()?;
        }

        Ok(())
    }
}
