use crate::structs::{Cost, CostModel, UnknownPairError};

/// Whether the DP minimizes accumulated cost or maximizes accumulated score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Objective {
    /// Lower is better; use with a cost table
    #[default]
    Minimize,
    /// Higher is better; use with a score table
    Maximize,
}

impl Objective {
    /// The value stored in a DP cell that no allowed path reaches.
    ///
    /// It is worse than every reachable value under this objective,
    /// so it never wins a comparison. It is never used in arithmetic.
    pub fn unreachable(self) -> Cost {
        match self {
            Objective::Minimize => Cost::MAX,
            Objective::Maximize => Cost::MIN,
        }
    }

    #[inline]
    pub fn combine(self, a: Cost, b: Cost) -> Cost {
        match self {
            Objective::Minimize => a.min(b),
            Objective::Maximize => a.max(b),
        }
    }
}

/// What a cost table lookup of an absent pair means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPairPolicy {
    /// Fail the alignment with an UnknownPairError
    #[default]
    Error,
    /// Never take the transition: +inf when minimizing, -inf when maximizing
    Forbid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlignParams {
    pub objective: Objective,
    pub missing_pair_policy: MissingPairPolicy,
}

impl AlignParams {
    pub fn new(objective: Objective, missing_pair_policy: MissingPairPolicy) -> Self {
        Self {
            objective,
            missing_pair_policy,
        }
    }

    /// Look up the cost of a transition under the missing pair policy.
    ///
    /// `Ok(None)` means the transition is forbidden.
    #[inline]
    pub fn transition_cost(
        &self,
        cost_model: &CostModel,
        first: u8,
        second: u8,
    ) -> Result<Option<Cost>, UnknownPairError> {
        match self.missing_pair_policy {
            MissingPairPolicy::Error => cost_model.cost(first, second).map(Some),
            MissingPairPolicy::Forbid => Ok(cost_model.lookup(first, second)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::GAP;

    #[test]
    fn test_combine() {
        assert_eq!(Objective::Minimize.combine(3, -2), -2);
        assert_eq!(Objective::Maximize.combine(3, -2), 3);
        assert_eq!(
            Objective::Minimize.combine(7, Objective::Minimize.unreachable()),
            7
        );
        assert_eq!(
            Objective::Maximize.combine(-7, Objective::Maximize.unreachable()),
            -7
        );
    }

    #[test]
    fn test_transition_cost_policies() {
        let model = CostModel::from_fn(b"A", |_, _| 1);

        let strict = AlignParams::new(Objective::Minimize, MissingPairPolicy::Error);
        assert_eq!(strict.transition_cost(&model, b'A', GAP), Ok(Some(1)));
        assert_eq!(
            strict.transition_cost(&model, b'A', b'C'),
            Err(UnknownPairError {
                first: b'A',
                second: b'C'
            })
        );

        let forbid = AlignParams::new(Objective::Minimize, MissingPairPolicy::Forbid);
        assert_eq!(forbid.transition_cost(&model, b'A', b'C'), Ok(None));
    }
}
