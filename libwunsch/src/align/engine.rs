use std::sync::Arc;

use anyhow::Result;
use log::{debug, log_enabled, Level};

use crate::align::structs::{AlignParams, Alignment, DpTable};
use crate::align::{build_table, traceback};
use crate::structs::{CostModel, Sequence};

/// Tables with more cells than this are never written to the debug log.
const MAX_LOGGED_CELLS: usize = 400;

/// The rendered table, if it is small enough to be worth reading.
fn table_snapshot(table: &DpTable) -> Result<Option<String>> {
    if table.num_cells() > MAX_LOGGED_CELLS {
        return Ok(None);
    }

    let mut out = vec![];
    table.dump(&mut out)?;
    Ok(Some(String::from_utf8_lossy(&out).into_owned()))
}

/// Globally align `seq_1` against `seq_2`.
///
/// A fresh DP table is built for every call and dropped before returning.
pub fn align(
    seq_1: &Sequence,
    seq_2: &Sequence,
    cost_model: &CostModel,
    params: &AlignParams,
) -> Result<Alignment> {
    let table = build_table(seq_1, seq_2, cost_model, params)?;

    if log_enabled!(Level::Debug) {
        if let Some(snapshot) = table_snapshot(&table)? {
            debug!("DP table for {seq_1} against {seq_2}:\n{snapshot}");
        }
    }

    traceback(&table, seq_1, seq_2, cost_model, params)
}

/// Aligns any number of independent sequence pairs against one shared cost model.
///
/// The engine holds no per-alignment state, so clones of it (or a shared
/// reference) can be used from as many threads as needed.
#[derive(Clone)]
pub struct AlignmentEngine {
    cost_model: Arc<CostModel>,
    params: AlignParams,
}

impl AlignmentEngine {
    pub fn new(cost_model: Arc<CostModel>, params: AlignParams) -> Self {
        Self { cost_model, params }
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.cost_model
    }

    pub fn params(&self) -> &AlignParams {
        &self.params
    }

    pub fn align(&self, seq_1: &Sequence, seq_2: &Sequence) -> Result<Alignment> {
        align(seq_1, seq_2, &self.cost_model, &self.params)
    }
}
