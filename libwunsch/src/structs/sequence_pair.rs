use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::Context;
use log::warn;
use thiserror::Error;

use super::Sequence;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {reason}")]
pub struct MalformedPairError {
    pub line: usize,
    pub reason: String,
}

/// What to do with a pair line that can't be parsed.
///
/// The choice applies to every line of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedLinePolicy {
    /// Fail the whole batch on the first malformed line
    #[default]
    Abort,
    /// Log the line, remember it, and move on
    Skip,
}

/// Two sequences to be aligned, read from one line of a pair file.
#[derive(Debug, Clone)]
pub struct SequencePair {
    /// The 1-based line number the pair was read from
    pub line: usize,
    pub first: Sequence,
    pub second: Sequence,
}

impl SequencePair {
    pub fn from_line(text: &str, line: usize) -> Result<Self, MalformedPairError> {
        let malformed = |reason: String| MalformedPairError { line, reason };

        let fields: Vec<&str> = text.trim().split(',').map(str::trim).collect();

        if fields.len() != 2 {
            return Err(malformed(format!(
                "expected 2 comma separated sequences, found {}",
                fields.len()
            )));
        }

        if let Some(idx) = fields.iter().position(|f| f.is_empty()) {
            return Err(malformed(format!("sequence {} is blank", idx + 1)));
        }

        let first = Sequence::from_utf8(fields[0].as_bytes())
            .map_err(|e| malformed(format!("sequence 1: {e}")))?;
        let second = Sequence::from_utf8(fields[1].as_bytes())
            .map_err(|e| malformed(format!("sequence 2: {e}")))?;

        Ok(Self {
            line,
            first,
            second,
        })
    }
}

/// The pairs read from a pair file, in file order.
#[derive(Debug, Default)]
pub struct PairFile {
    pub pairs: Vec<SequencePair>,
    /// The lines that were dropped under MalformedLinePolicy::Skip
    pub skipped: Vec<MalformedPairError>,
}

impl PairFile {
    pub fn from_path<P: AsRef<Path>>(path: P, policy: MalformedLinePolicy) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open pair file: {}", path.to_string_lossy()))?;

        let mut pair_file = Self::default();

        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line
                .with_context(|| format!("failed to read pair file: {}", path.to_string_lossy()))?;

            pair_file
                .push_line(&line, idx + 1, policy)
                .with_context(|| format!("malformed pair file: {}", path.to_string_lossy()))?;
        }

        Ok(pair_file)
    }

    pub fn parse(text: &str, policy: MalformedLinePolicy) -> Result<Self, MalformedPairError> {
        let mut pair_file = Self::default();

        text.lines()
            .enumerate()
            .try_for_each(|(idx, line)| pair_file.push_line(line, idx + 1, policy))?;

        Ok(pair_file)
    }

    fn push_line(
        &mut self,
        text: &str,
        line: usize,
        policy: MalformedLinePolicy,
    ) -> Result<(), MalformedPairError> {
        if text.trim().is_empty() {
            return Ok(());
        }

        match (SequencePair::from_line(text, line), policy) {
            (Ok(pair), _) => self.pairs.push(pair),
            (Err(err), MalformedLinePolicy::Abort) => return Err(err),
            (Err(err), MalformedLinePolicy::Skip) => {
                warn!("skipping malformed pair: {err}");
                self.skipped.push(err);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn test_from_line() -> anyhow::Result<()> {
        let pair = SequencePair::from_line("GATTACA,GCATGCA\r\n", 4)?;

        check!(pair.line == 4);
        check!(pair.first.symbols() == b"GATTACA");
        check!(pair.second.symbols() == b"GCATGCA");
        Ok(())
    }

    #[test]
    fn test_from_line_errors() {
        for text in ["GATTACA", "A,C,G", "A,", ",C", "A-C,G"] {
            let err = SequencePair::from_line(text, 7).unwrap_err();
            check!(err.line == 7, "line: {text:?}");
        }
    }

    #[test]
    fn test_parse_abort() {
        let text = "AC,CA\nnot a pair\nGG,GG\n";
        let err = PairFile::parse(text, MalformedLinePolicy::Abort).unwrap_err();

        check!(err.line == 2);
    }

    #[test]
    fn test_parse_skip() -> anyhow::Result<()> {
        let text = "AC,CA\n\nnot a pair\nGG,GG\n";
        let pair_file = PairFile::parse(text, MalformedLinePolicy::Skip)?;

        check!(pair_file.pairs.len() == 2);
        check!(pair_file.pairs[0].line == 1);
        check!(pair_file.pairs[1].line == 4);
        check!(pair_file.skipped.len() == 1);
        check!(pair_file.skipped[0].line == 3);
        Ok(())
    }
}
