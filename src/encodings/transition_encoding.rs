use crate::{lit, not, Model, PenaltyTerm, Variable};
use itertools::Itertools;

/// Encodes forbidden or penalized successions of two shifts on consecutive days.
pub struct TransitionEncoding;

impl TransitionEncoding {
    /// Forbids `previous[d] ∧ next[d + 1]` for each day `d`, or charges `cost` for it if the cost is positive.
    ///
    /// Both sequences must be indexed by day.
    pub fn encode(
        model: &mut Model,
        previous: &[Variable],
        next: &[Variable],
        cost: i64,
        prefix: &str,
    ) -> Vec<PenaltyTerm> {
        let mut terms = Vec::new();
        for (day, (p, n)) in previous.iter().zip(next.iter().skip(1)).enumerate() {
            let mut clause = vec![not(*p), not(*n)];
            if cost > 0 {
                let penalty = model.new_bool_var(format!("{}: transition(day={})", prefix, day));
                clause.push(lit(penalty));
                terms.push(PenaltyTerm::new(penalty, cost));
            }
            model.add_bool_or(clause);
        }
        terms
    }

    /// Lists the days on which an assignment (the shift of each day) contains the transition.
    pub fn occurrences(assignment: &[usize], previous: usize, next: usize) -> Vec<usize> {
        assignment
            .iter()
            .tuple_windows()
            .positions(|(p, n)| *p == previous && *n == next)
            .collect()
    }
}
