use std::fmt::{Display, Formatter};

/// One move through the DP table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceStep {
    /// Align a symbol of sequence 1 against a symbol of sequence 2
    Diagonal,
    /// Align a symbol of sequence 1 against a gap
    Up,
    /// Align a gap against a symbol of sequence 2
    Left,
}

impl TraceStep {
    pub fn code(&self) -> char {
        match self {
            TraceStep::Diagonal => 'D',
            TraceStep::Up => 'U',
            TraceStep::Left => 'L',
        }
    }
}

/// The moves of an optimal path, in order from (0, 0) to (N, M).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    pub steps: Vec<TraceStep>,
}

impl Trace {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            steps: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TraceStep> {
        self.steps.iter()
    }

    /// The number of symbols of sequence 1 and sequence 2 the trace consumes.
    pub fn consumed(&self) -> (usize, usize) {
        self.steps
            .iter()
            .fold((0, 0), |(first, second), step| match step {
                TraceStep::Diagonal => (first + 1, second + 1),
                TraceStep::Up => (first + 1, second),
                TraceStep::Left => (first, second + 1),
            })
    }
}

impl Display for Trace {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.steps
            .iter()
            .try_for_each(|step| write!(f, "{}", step.code()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_display_and_consumed() {
        let trace = Trace {
            steps: vec![
                TraceStep::Diagonal,
                TraceStep::Up,
                TraceStep::Left,
                TraceStep::Diagonal,
            ],
        };

        assert_eq!(trace.to_string(), "DULD");
        assert_eq!(trace.consumed(), (3, 3));
        assert_eq!(trace.len(), 4);
        assert_eq!(Trace::default().to_string(), "");
    }
}
