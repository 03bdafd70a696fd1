use crate::{lit, not, Bounds, Clause, Model, PenaltyTerm, Variable};
use std::ops::Range;

/// Encodes bounds on the length of the maximal runs of true values of a Boolean sequence.
///
/// Each forbidden (or penalized) run length is excluded by a clause isolating the run:
/// the clause is falsified iff the `length` variables starting at `start` are true while their neighbors (if any) are false.
/// Penalized runs get a fresh literal in their clause, charged in the objective.
pub struct SpanEncoding;

impl SpanEncoding {
    /// Adds the constraints on the runs of `works` to the model, and returns the penalty terms it created.
    ///
    /// Runs shorter than `hard_min` or longer than `hard_max` are forbidden.
    /// A run of length `L < soft_min` costs `min_cost × (soft_min - L)`, a run of length `L > soft_max` costs `max_cost × (L - soft_max)`.
    /// The penalty variables are named after the provided prefix.
    pub fn encode(
        model: &mut Model,
        works: &[Variable],
        bounds: &Bounds,
        prefix: &str,
    ) -> Vec<PenaltyTerm> {
        let n = works.len();
        let hard_min = bounds.hard_min() as usize;
        let soft_min = bounds.soft_min() as usize;
        let soft_max = bounds.soft_max() as usize;
        let hard_max = bounds.hard_max() as usize;
        let mut terms = Vec::new();
        // runs longer than the sequence cannot occur
        for length in 1..hard_min.min(n + 1) {
            for start in starts(n, length) {
                model.add_bool_or(isolating_clause(works, start, length));
            }
        }
        if bounds.min_cost() > 0 {
            for length in usize::max(hard_min, 1)..soft_min.min(n + 1) {
                for start in starts(n, length) {
                    let penalty = model.new_bool_var(format!(
                        "{}: under_span(start={}, length={})",
                        prefix, start, length
                    ));
                    let mut clause = isolating_clause(works, start, length);
                    clause.push(lit(penalty));
                    model.add_bool_or(clause);
                    terms.push(PenaltyTerm::new(
                        penalty,
                        bounds.min_cost() * (soft_min - length) as i64,
                    ));
                }
            }
        }
        if bounds.max_cost() > 0 {
            for length in soft_max + 1..=hard_max.min(n) {
                for start in starts(n, length) {
                    let penalty = model.new_bool_var(format!(
                        "{}: over_span(start={}, length={})",
                        prefix, start, length
                    ));
                    let mut clause = isolating_clause(works, start, length);
                    clause.push(lit(penalty));
                    model.add_bool_or(clause);
                    terms.push(PenaltyTerm::new(
                        penalty,
                        bounds.max_cost() * (length - soft_max) as i64,
                    ));
                }
            }
        }
        for start in 0..n.saturating_sub(hard_max) {
            model.add_bool_or(works[start..=start + hard_max].iter().map(|w| not(*w)).collect());
        }
        terms
    }
}

/// The possible start indices of a run of the provided length.
fn starts(n: usize, length: usize) -> Range<usize> {
    0..(n + 1).saturating_sub(length)
}

/// Builds the clause forbidding a maximal run of `length` true values starting at `start`.
fn isolating_clause(works: &[Variable], start: usize, length: usize) -> Clause {
    let mut clause = Clause::with_capacity(length + 2);
    if start > 0 {
        clause.push(lit(works[start - 1]));
    }
    clause.extend(works[start..start + length].iter().map(|w| not(*w)));
    if start + length < works.len() {
        clause.push(lit(works[start + length]));
    }
    clause
}
