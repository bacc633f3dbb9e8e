use crate::align::structs::{AlignParams, DpTable};
use crate::alphabet::GAP;
use crate::structs::{CostModel, Sequence};

use anyhow::Result;

/// Fill the Needleman-Wunsch DP table for `seq_1` against `seq_2`.
///
/// Row i corresponds to the first i symbols of `seq_1`, column j to the first
/// j symbols of `seq_2`. Each cell combines the diagonal (substitution), up
/// (gap in `seq_2`), and left (gap in `seq_1`) candidates with the objective.
pub fn build_table(
    seq_1: &Sequence,
    seq_2: &Sequence,
    cost_model: &CostModel,
    params: &AlignParams,
) -> Result<DpTable> {
    let objective = params.objective;
    let mut table = DpTable::new(seq_1.length, seq_2.length, objective);

    table.set(0, 0, 0);

    // the first row: a prefix of seq_2 against nothing but gaps
    let mut left_costs = Vec::with_capacity(seq_2.length + 1);
    left_costs.push(None);
    for seq_2_idx in 1..=seq_2.length {
        let left_cost = params.transition_cost(cost_model, GAP, seq_2.symbol(seq_2_idx))?;
        left_costs.push(left_cost);

        let value = table.extend(0, seq_2_idx - 1, left_cost)?;
        table.set(0, seq_2_idx, value.unwrap_or(objective.unreachable()));
    }

    for seq_1_idx in 1..=seq_1.length {
        let seq_1_symbol = seq_1.symbol(seq_1_idx);
        let up_cost = params.transition_cost(cost_model, seq_1_symbol, GAP)?;

        // the first column: a prefix of seq_1 against nothing but gaps
        let value = table.extend(seq_1_idx - 1, 0, up_cost)?;
        table.set(seq_1_idx, 0, value.unwrap_or(objective.unreachable()));

        for seq_2_idx in 1..=seq_2.length {
            let seq_2_symbol = seq_2.symbol(seq_2_idx);
            let diag_cost = params.transition_cost(cost_model, seq_1_symbol, seq_2_symbol)?;

            let diag_score = table.extend(seq_1_idx - 1, seq_2_idx - 1, diag_cost)?;
            let up_score = table.extend(seq_1_idx - 1, seq_2_idx, up_cost)?;
            let left_score = table.extend(seq_1_idx, seq_2_idx - 1, left_costs[seq_2_idx])?;

            let best = [diag_score, up_score, left_score]
                .into_iter()
                .flatten()
                .reduce(|a, b| objective.combine(a, b));

            table.set(
                seq_1_idx,
                seq_2_idx,
                best.unwrap_or(objective.unreachable()),
            );
        }
    }

    Ok(table)
}
