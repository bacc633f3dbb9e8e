use std::path::Path;

use crate::alphabet::{symbol_display, GAP, UTF8_COMMA};
use anyhow::Context;
use log::debug;
use thiserror::Error;

/// A substitution, insertion, or deletion cost (or score).
pub type Cost = i64;

const NO_INDEX: usize = usize::MAX;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedTableError {
    #[error("cost table is empty")]
    Empty,
    #[error("line {line}: header lists no column symbols")]
    NoColumns { line: usize },
    #[error("line {line}: symbol \"{symbol}\" is not a single character")]
    InvalidSymbol { line: usize, symbol: String },
    #[error("line {line}: duplicate column symbol: {symbol}")]
    DuplicateColumn { line: usize, symbol: String },
    #[error("line {line}: duplicate row symbol: {symbol}")]
    DuplicateRow { line: usize, symbol: String },
    #[error("line {line}: expected {expected} costs, found {found}")]
    RowLength {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: cost \"{value}\" is not an integer")]
    InvalidCost { line: usize, value: String },
    #[error("expected {expected} rows (one per column symbol), found {found}")]
    RowCount { expected: usize, found: usize },
    #[error("gap symbol '-' must appear as a column and as a row, missing from the {axis}")]
    MissingGap { axis: &'static str },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no cost table entry for pair ({}, {})", pair_symbol(.first), pair_symbol(.second))]
pub struct UnknownPairError {
    pub first: u8,
    pub second: u8,
}

fn pair_symbol(symbol: &u8) -> String {
    symbol_display(*symbol)
}

/// How the fields of a cost table line are separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// Comma if the header line contains one, otherwise whitespace
    #[default]
    Auto,
    Comma,
    Whitespace,
}

impl Delimiter {
    fn resolve(self, header: &str) -> Self {
        match self {
            Delimiter::Auto => {
                if header.as_bytes().contains(&UTF8_COMMA) {
                    Delimiter::Comma
                } else {
                    Delimiter::Whitespace
                }
            }
            other => other,
        }
    }

    fn split(self, line: &str) -> Vec<&str> {
        match self {
            Delimiter::Comma => line.split(',').map(str::trim).collect(),
            _ => {
                let mut fields = vec![];
                // a header with an empty label starts with the separator
                if line.starts_with(char::is_whitespace) {
                    fields.push("");
                }
                fields.extend(line.split_whitespace());
                fields
            }
        }
    }
}

/// A table of costs for ordered pairs of symbols, including the gap symbol.
///
/// Lookups are not assumed to be symmetric: the cost of (a, b) is
/// read from row a, column b and may differ from the cost of (b, a).
#[derive(Clone)]
pub struct CostModel {
    /// The column symbols, in header order
    columns: Vec<u8>,
    /// The row symbols, in file order
    rows: Vec<u8>,
    /// Maps a symbol byte to its column index, or NO_INDEX
    column_indices: [usize; 256],
    /// Maps a symbol byte to its row index, or NO_INDEX
    row_indices: [usize; 256],
    /// The costs, row-major: rows.len() x columns.len()
    costs: Vec<Cost>,
}

impl CostModel {
    pub fn from_path<P: AsRef<Path>>(path: P, delimiter: Delimiter) -> anyhow::Result<Self> {
        let path = path.as_ref();

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read cost table: {}", path.to_string_lossy()))?;

        let model = Self::parse(&text, delimiter)
            .with_context(|| format!("malformed cost table: {}", path.to_string_lossy()))?;

        debug!(
            "loaded {}x{} cost table from {}",
            model.rows.len(),
            model.columns.len(),
            path.to_string_lossy()
        );

        Ok(model)
    }

    pub fn parse(text: &str, delimiter: Delimiter) -> Result<Self, MalformedTableError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line))
            .filter(|(_, line)| !line.trim().is_empty());

        let (header_line_number, header) = lines.next().ok_or(MalformedTableError::Empty)?;
        let delimiter = delimiter.resolve(header);

        let header_fields = delimiter.split(header);
        // the first header field labels the row symbol column
        if header_fields.len() < 2 {
            return Err(MalformedTableError::NoColumns {
                line: header_line_number,
            });
        }

        let mut columns = vec![];
        let mut column_indices = [NO_INDEX; 256];

        for field in &header_fields[1..] {
            let symbol = Self::parse_symbol(field, header_line_number)?;

            if column_indices[symbol as usize] != NO_INDEX {
                return Err(MalformedTableError::DuplicateColumn {
                    line: header_line_number,
                    symbol: field.to_string(),
                });
            }

            column_indices[symbol as usize] = columns.len();
            columns.push(symbol);
        }

        let mut rows = vec![];
        let mut row_indices = [NO_INDEX; 256];
        let mut costs = Vec::with_capacity(columns.len() * columns.len());

        for (line_number, line) in lines {
            let fields = delimiter.split(line);
            let symbol = Self::parse_symbol(fields[0], line_number)?;

            if row_indices[symbol as usize] != NO_INDEX {
                return Err(MalformedTableError::DuplicateRow {
                    line: line_number,
                    symbol: fields[0].to_string(),
                });
            }

            let values = &fields[1..];
            if values.len() != columns.len() {
                return Err(MalformedTableError::RowLength {
                    line: line_number,
                    expected: columns.len(),
                    found: values.len(),
                });
            }

            for value in values {
                let cost = value
                    .parse::<Cost>()
                    .map_err(|_| MalformedTableError::InvalidCost {
                        line: line_number,
                        value: value.to_string(),
                    })?;
                costs.push(cost);
            }

            row_indices[symbol as usize] = rows.len();
            rows.push(symbol);
        }

        if rows.len() != columns.len() {
            return Err(MalformedTableError::RowCount {
                expected: columns.len(),
                found: rows.len(),
            });
        }

        if column_indices[GAP as usize] == NO_INDEX {
            return Err(MalformedTableError::MissingGap { axis: "header" });
        }

        if row_indices[GAP as usize] == NO_INDEX {
            return Err(MalformedTableError::MissingGap { axis: "rows" });
        }

        Ok(Self {
            columns,
            rows,
            column_indices,
            row_indices,
            costs,
        })
    }

    fn parse_symbol(field: &str, line: usize) -> Result<u8, MalformedTableError> {
        match field.as_bytes() {
            [symbol] if symbol.is_ascii_graphic() => Ok(*symbol),
            _ => Err(MalformedTableError::InvalidSymbol {
                line,
                symbol: field.to_string(),
            }),
        }
    }

    /// Build a complete table over `symbols` plus the gap symbol from a cost function.
    pub fn from_fn(symbols: &[u8], cost_fn: impl Fn(u8, u8) -> Cost) -> Self {
        let mut columns: Vec<u8> = vec![];
        symbols
            .iter()
            .chain(std::iter::once(&GAP))
            .for_each(|&s| {
                if !columns.contains(&s) {
                    columns.push(s);
                }
            });

        let mut column_indices = [NO_INDEX; 256];
        columns
            .iter()
            .enumerate()
            .for_each(|(idx, &s)| column_indices[s as usize] = idx);

        let costs = columns
            .iter()
            .flat_map(|&a| columns.iter().map(move |&b| (a, b)))
            .map(|(a, b)| cost_fn(a, b))
            .collect();

        Self {
            rows: columns.clone(),
            columns,
            row_indices: column_indices,
            column_indices,
            costs,
        }
    }

    /// The column symbols, in header order.
    pub fn symbols(&self) -> &[u8] {
        &self.columns
    }

    #[inline]
    pub fn lookup(&self, first: u8, second: u8) -> Option<Cost> {
        let row = self.row_indices[first as usize];
        let column = self.column_indices[second as usize];

        if row == NO_INDEX || column == NO_INDEX {
            None
        } else {
            Some(self.costs[row * self.columns.len() + column])
        }
    }

    #[inline]
    pub fn cost(&self, first: u8, second: u8) -> Result<Cost, UnknownPairError> {
        self.lookup(first, second)
            .ok_or(UnknownPairError { first, second })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{assert, check};

    const DNA_TABLE: &str = "\
,A,C,G,T,-
A,0,1,2,1,3
C,1,0,1,2,3
G,2,1,0,1,3
T,1,2,1,0,3
-,3,3,3,3,0
";

    #[test]
    fn test_parse_comma_table() -> anyhow::Result<()> {
        let model = CostModel::parse(DNA_TABLE, Delimiter::Auto)?;

        check!(model.symbols() == b"ACGT-");
        check!(model.lookup(b'A', b'A') == Some(0));
        check!(model.lookup(b'A', b'G') == Some(2));
        check!(model.lookup(b'T', b'C') == Some(2));
        check!(model.lookup(b'C', GAP) == Some(3));
        check!(model.lookup(GAP, b'T') == Some(3));
        Ok(())
    }

    #[test]
    fn test_parse_whitespace_table() -> anyhow::Result<()> {
        let text = "x A C -\nA 0 4 2\nC 4 0 2\n- 2 2 0\n";
        let model = CostModel::parse(text, Delimiter::Auto)?;

        check!(model.symbols() == b"AC-");
        check!(model.lookup(b'A', b'C') == Some(4));

        // no label at all, just leading whitespace
        let text = "   A -\nA -1 5\n- 5 0\n";
        let model = CostModel::parse(text, Delimiter::Whitespace)?;
        check!(model.lookup(b'A', b'A') == Some(-1));
        Ok(())
    }

    #[test]
    fn test_asymmetric_costs() -> anyhow::Result<()> {
        let text = ",A,C,-\nA,0,7,1\nC,2,0,1\n-,4,5,0\n";
        let model = CostModel::parse(text, Delimiter::Comma)?;

        check!(model.lookup(b'A', b'C') == Some(7));
        check!(model.lookup(b'C', b'A') == Some(2));
        check!(model.lookup(b'A', GAP) == Some(1));
        check!(model.lookup(GAP, b'A') == Some(4));
        Ok(())
    }

    #[test]
    fn test_rows_in_any_order() -> anyhow::Result<()> {
        let text = ",A,C,-\n-,4,5,0\nC,2,0,1\nA,0,7,1\n";
        let model = CostModel::parse(text, Delimiter::Comma)?;

        check!(model.lookup(b'A', b'C') == Some(7));
        check!(model.lookup(GAP, b'C') == Some(5));
        Ok(())
    }

    #[test]
    fn test_unknown_pair() -> anyhow::Result<()> {
        let model = CostModel::parse(DNA_TABLE, Delimiter::Auto)?;

        check!(model.lookup(b'A', b'N') == None);
        check!(
            model.cost(b'N', b'A') == Err(UnknownPairError {
                first: b'N',
                second: b'A'
            })
        );
        Ok(())
    }

    #[test]
    fn test_malformed_tables() {
        let cases: [(&str, MalformedTableError); 9] = [
            ("\n\n", MalformedTableError::Empty),
            ("label\n", MalformedTableError::NoColumns { line: 1 }),
            (
                ",A,CC,-\n",
                MalformedTableError::InvalidSymbol {
                    line: 1,
                    symbol: "CC".to_string(),
                },
            ),
            (
                ",A,A,-\n",
                MalformedTableError::DuplicateColumn {
                    line: 1,
                    symbol: "A".to_string(),
                },
            ),
            (
                ",A,-\nA,0,1\nA,0,1\n",
                MalformedTableError::DuplicateRow {
                    line: 3,
                    symbol: "A".to_string(),
                },
            ),
            (
                ",A,-\nA,0\n-,1,0\n",
                MalformedTableError::RowLength {
                    line: 2,
                    expected: 2,
                    found: 1,
                },
            ),
            (
                ",A,-\nA,0,1.5\n-,1,0\n",
                MalformedTableError::InvalidCost {
                    line: 2,
                    value: "1.5".to_string(),
                },
            ),
            (
                ",A,-\nA,0,1\n",
                MalformedTableError::RowCount {
                    expected: 2,
                    found: 1,
                },
            ),
            (
                ",A,C\nA,0,1\nC,1,0\n",
                MalformedTableError::MissingGap { axis: "header" },
            ),
        ];

        for (text, expected) in cases {
            let result = CostModel::parse(text, Delimiter::Auto);
            assert!(result.err() == Some(expected), "table: {text:?}");
        }
    }

    #[test]
    fn test_gap_missing_from_rows() {
        let text = ",A,-\nA,0,1\nC,1,0\n";
        let result = CostModel::parse(text, Delimiter::Comma);
        assert!(result.err() == Some(MalformedTableError::MissingGap { axis: "rows" }));
    }

    #[test]
    fn test_from_fn() -> anyhow::Result<()> {
        let model = CostModel::from_fn(b"AC", |a, b| if a == b { 0 } else { 1 });

        check!(model.symbols() == b"AC-");
        check!(model.lookup(b'A', b'A') == Some(0));
        check!(model.lookup(b'A', GAP) == Some(1));
        check!(model.lookup(GAP, GAP) == Some(0));
        Ok(())
    }
}
