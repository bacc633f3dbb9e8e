use crate::align::structs::{AlignParams, Alignment, DpTable, Trace, TraceStep};
use crate::alphabet::GAP;
use crate::structs::{CostModel, Sequence};

use anyhow::Result;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no alignment exists: every path to the final DP cell uses a pair missing from the cost table")]
pub struct NoAlignmentError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("traceback failed: no predecessor of DP cell ({row}, {column}) explains its value")]
pub struct TracebackError {
    pub row: usize,
    pub column: usize,
}

/// Walk a filled DP table from (N, M) back to (0, 0) and build one optimal alignment.
///
/// When several predecessors explain a cell's value, the diagonal move is
/// taken first, then up, then left. Alignments are not unique; this order
/// makes the one we report deterministic.
pub fn traceback(
    table: &DpTable,
    seq_1: &Sequence,
    seq_2: &Sequence,
    cost_model: &CostModel,
    params: &AlignParams,
) -> Result<Alignment> {
    debug_assert_eq!(table.length_1, seq_1.length);
    debug_assert_eq!(table.length_2, seq_2.length);

    let score = table.score().ok_or(NoAlignmentError)?;

    let mut trace = Trace::with_capacity(seq_1.length + seq_2.length);
    let mut seq_1_idx = seq_1.length;
    let mut seq_2_idx = seq_2.length;

    while seq_1_idx > 0 || seq_2_idx > 0 {
        let current_score = Some(table.get(seq_1_idx, seq_2_idx));

        if seq_1_idx > 0 && seq_2_idx > 0 {
            let diag_cost = params.transition_cost(
                cost_model,
                seq_1.symbol(seq_1_idx),
                seq_2.symbol(seq_2_idx),
            )?;

            if table.extend(seq_1_idx - 1, seq_2_idx - 1, diag_cost)? == current_score {
                seq_1_idx -= 1;
                seq_2_idx -= 1;
                trace.steps.push(TraceStep::Diagonal);
                continue;
            }
        }

        if seq_1_idx > 0 {
            let up_cost = params.transition_cost(cost_model, seq_1.symbol(seq_1_idx), GAP)?;

            if table.extend(seq_1_idx - 1, seq_2_idx, up_cost)? == current_score {
                seq_1_idx -= 1;
                trace.steps.push(TraceStep::Up);
                continue;
            }
        }

        if seq_2_idx > 0 {
            let left_cost = params.transition_cost(cost_model, GAP, seq_2.symbol(seq_2_idx))?;

            if table.extend(seq_1_idx, seq_2_idx - 1, left_cost)? == current_score {
                seq_2_idx -= 1;
                trace.steps.push(TraceStep::Left);
                continue;
            }
        }

        return Err(TracebackError {
            row: seq_1_idx,
            column: seq_2_idx,
        }
        .into());
    }

    trace.steps.reverse();

    Ok(Alignment::from_trace(trace, seq_1, seq_2, score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::build_table;
    use crate::align::structs::{MissingPairPolicy, Objective};
    use crate::structs::Delimiter;

    #[test]
    fn test_traceback_prefers_diagonal_then_up() -> Result<()> {
        // every move costs 1, so many paths tie
        let model = CostModel::from_fn(b"AC", |_, _| 1);
        let seq_1 = Sequence::from_utf8(b"AA")?;
        let seq_2 = Sequence::from_utf8(b"C")?;
        let params = AlignParams::default();

        let table = build_table(&seq_1, &seq_2, &model, &params)?;
        let ali = traceback(&table, &seq_1, &seq_2, &model, &params)?;

        // D at (2,1) from (1,0); then U to (0,0)
        assert_eq!(ali.trace.to_string(), "UD");
        assert_eq!(ali.to_string(), "AA,-C:2");
        Ok(())
    }

    #[test]
    fn test_traceback_unreachable_final_cell() -> Result<()> {
        let model = CostModel::parse(",A,-\nA,0,1\n-,1,0\n", Delimiter::Comma)?;
        let seq_1 = Sequence::from_utf8(b"A")?;
        let seq_2 = Sequence::from_utf8(b"C")?;
        let params = AlignParams::new(Objective::Minimize, MissingPairPolicy::Forbid);

        let table = build_table(&seq_1, &seq_2, &model, &params)?;
        let err = traceback(&table, &seq_1, &seq_2, &model, &params).unwrap_err();

        assert!(err.downcast_ref::<NoAlignmentError>().is_some());
        Ok(())
    }

    #[test]
    fn test_traceback_corrupted_table() -> Result<()> {
        let model = CostModel::from_fn(b"A", |_, _| 1);
        let seq = Sequence::from_utf8(b"A")?;
        let params = AlignParams::default();

        let mut table = build_table(&seq, &seq, &model, &params)?;
        table.set(1, 1, 100);

        let err = traceback(&table, &seq, &seq, &model, &params).unwrap_err();
        assert_eq!(
            err.downcast_ref::<TracebackError>(),
            Some(&TracebackError { row: 1, column: 1 })
        );
        Ok(())
    }
}
