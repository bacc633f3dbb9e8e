use std::cmp::min;
use std::fmt::{Display, Formatter};

use crate::alphabet::{GAP, UTF8_PIPE, UTF8_SPACE};
use crate::structs::{Cost, Sequence};

use super::trace::TraceStep;
use super::Trace;

/// The width of one block of the pretty alignment display.
const BLOCK_WIDTH: usize = 80;

/// An optimal global alignment of two sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    /// The length of the alignment (the number of columns)
    pub length: usize,
    /// Sequence 1 with gaps inserted
    pub aligned_1: String,
    /// Sequence 2 with gaps inserted
    pub aligned_2: String,
    /// The terminal DP value: the total cost (or score) of the alignment
    pub score: Cost,
    /// The path through the DP table that produced the alignment
    pub trace: Trace,
}

impl Alignment {
    pub fn from_trace(trace: Trace, seq_1: &Sequence, seq_2: &Sequence, score: Cost) -> Self {
        let mut aligned_1 = String::with_capacity(trace.len());
        let mut aligned_2 = String::with_capacity(trace.len());
        let mut seq_1_idx = 0;
        let mut seq_2_idx = 0;

        for step in trace.iter() {
            match step {
                TraceStep::Diagonal => {
                    seq_1_idx += 1;
                    seq_2_idx += 1;
                    aligned_1.push(char::from(seq_1.symbol(seq_1_idx)));
                    aligned_2.push(char::from(seq_2.symbol(seq_2_idx)));
                }
                TraceStep::Up => {
                    seq_1_idx += 1;
                    aligned_1.push(char::from(seq_1.symbol(seq_1_idx)));
                    aligned_2.push(char::from(GAP));
                }
                TraceStep::Left => {
                    seq_2_idx += 1;
                    aligned_1.push(char::from(GAP));
                    aligned_2.push(char::from(seq_2.symbol(seq_2_idx)));
                }
            }
        }

        debug_assert_eq!(seq_1_idx, seq_1.length);
        debug_assert_eq!(seq_2_idx, seq_2.length);

        Self {
            length: trace.len(),
            aligned_1,
            aligned_2,
            score,
            trace,
        }
    }

    /// The line between the two aligned sequences: '|' where they agree.
    pub fn middle_string(&self) -> String {
        self.aligned_1
            .bytes()
            .zip(self.aligned_2.bytes())
            .map(|(a, b)| {
                if a == b && a != GAP {
                    char::from(UTF8_PIPE)
                } else {
                    char::from(UTF8_SPACE)
                }
            })
            .collect()
    }

    /// The number of columns where both sequences have the same symbol.
    pub fn identities(&self) -> usize {
        self.aligned_1
            .bytes()
            .zip(self.aligned_2.bytes())
            .filter(|(a, b)| a == b)
            .count()
    }

    /// A multi-line, human readable rendering of the alignment.
    pub fn ali_string(&self) -> String {
        let middle_string = self.middle_string();
        let (length_1, length_2) = self.trace.consumed();
        let coord_width = length_1.max(length_2).to_string().len();

        let mut ali_string = String::new();
        ali_string.push_str(&format!(
            "==  score: {};  identities: {}/{}\n",
            self.score,
            self.identities(),
            self.length
        ));

        let mut start_offset: usize = 0;
        let mut seq_1_position: usize = 0;
        let mut seq_2_position: usize = 0;

        while start_offset < self.length {
            let end_offset = min(start_offset + BLOCK_WIDTH, self.length);

            let block_1 = &self.aligned_1[start_offset..end_offset];
            let block_2 = &self.aligned_2[start_offset..end_offset];

            let block_1_start = seq_1_position + 1;
            let block_2_start = seq_2_position + 1;
            seq_1_position += block_1.bytes().filter(|&b| b != GAP).count();
            seq_2_position += block_2.bytes().filter(|&b| b != GAP).count();

            ali_string.push_str(&format!(
                "{:>W$} {} {}\n",
                block_1_start,
                block_1,
                seq_1_position,
                W = coord_width
            ));

            ali_string.push_str(&format!(
                "{:W$} {}\n",
                "",
                &middle_string[start_offset..end_offset],
                W = coord_width
            ));

            ali_string.push_str(&format!(
                "{:>W$} {} {}\n",
                block_2_start,
                block_2,
                seq_2_position,
                W = coord_width
            ));

            start_offset = end_offset;
        }

        ali_string
    }
}

impl Display for Alignment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}:{}", self.aligned_1, self.aligned_2, self.score)
    }
}
