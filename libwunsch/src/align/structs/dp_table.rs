use std::io::Write;

use anyhow::Result;
use thiserror::Error;

use super::Objective;
use crate::structs::Cost;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("score overflow at DP cell ({row}, {column})")]
pub struct ScoreOverflowError {
    pub row: usize,
    pub column: usize,
}

/// The Needleman-Wunsch dynamic programming table.
///
/// Cell (i, j) holds the optimal accumulated cost of aligning the first
/// i symbols of sequence 1 against the first j symbols of sequence 2.
#[derive(Clone)]
pub struct DpTable {
    pub length_1: usize,
    pub length_2: usize,
    pub objective: Objective,
    /// The DP cells as a flat vector.
    //
    // the data is stored row-major:
    //     [
    //
    //         c_(0, 0), c_(0, 1), ..., c_(0, M),
    //         c_(1, 0), c_(1, 1), ..., c_(1, M),
    //         ...
    //         c_(N, 0), c_(N, 1), ..., c_(N, M),
    //
    //     ]
    //
    // where:
    //
    //     N:        <length_1>
    //     M:        <length_2>
    //     c_(i, j): the accumulated cost at cell (i, j)
    //
    data: Vec<Cost>,
}

impl DpTable {
    pub fn new(length_1: usize, length_2: usize, objective: Objective) -> Self {
        DpTable {
            length_1,
            length_2,
            objective,
            data: vec![objective.unreachable(); (length_1 + 1) * (length_2 + 1)],
        }
    }

    #[inline]
    pub fn get(&self, row: usize, column: usize) -> Cost {
        debug_assert!(row <= self.length_1);
        debug_assert!(column <= self.length_2);
        self.data[row * (self.length_2 + 1) + column]
    }

    #[inline]
    pub fn set(&mut self, row: usize, column: usize, value: Cost) {
        debug_assert!(row <= self.length_1);
        debug_assert!(column <= self.length_2);
        self.data[row * (self.length_2 + 1) + column] = value;
    }

    #[inline]
    pub fn is_reachable(&self, row: usize, column: usize) -> bool {
        self.get(row, column) != self.objective.unreachable()
    }

    /// The value of moving out of cell (row, column) with a transition of `cost`.
    ///
    /// Returns `Ok(None)` if the cell is unreachable or the transition is forbidden.
    #[inline]
    pub fn extend(
        &self,
        row: usize,
        column: usize,
        cost: Option<Cost>,
    ) -> Result<Option<Cost>, ScoreOverflowError> {
        let cost = match cost {
            Some(cost) if self.is_reachable(row, column) => cost,
            _ => return Ok(None),
        };

        match self.get(row, column).checked_add(cost) {
            Some(value) if value != self.objective.unreachable() => Ok(Some(value)),
            _ => Err(ScoreOverflowError { row, column }),
        }
    }

    /// The terminal value at (N, M), if any path reaches it.
    pub fn score(&self) -> Option<Cost> {
        if self.is_reachable(self.length_1, self.length_2) {
            Some(self.get(self.length_1, self.length_2))
        } else {
            None
        }
    }

    /// The number of cells in the table.
    pub fn num_cells(&self) -> usize {
        self.data.len()
    }

    pub fn dump(&self, out: &mut impl Write) -> Result<()> {
        let row_idx_width = self.length_1.to_string().len();
        let column_width = self
            .data
            .iter()
            .map(|&v| match v == self.objective.unreachable() {
                true => 1,
                false => v.to_string().len(),
            })
            .chain(std::iter::once(self.length_2.to_string().len()))
            .max()
            .unwrap_or(1);

        // write the column indices
        write!(out, "{} ", " ".repeat(row_idx_width))?;
        for column in 0..=self.length_2 {
            write!(out, " {:>w$}", column, w = column_width)?;
        }
        writeln!(out)?;

        for row in 0..=self.length_1 {
            write!(out, "{:>w$} ", row, w = row_idx_width)?;
            for column in 0..=self.length_2 {
                match self.is_reachable(row, column) {
                    true => write!(out, " {:>w$}", self.get(row, column), w = column_width)?,
                    false => write!(out, " {:>w$}", "*", w = column_width)?,
                }
            }
            writeln!(out)?;
        }

        Ok(())
    }
}
