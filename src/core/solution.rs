use super::{model::literal_value, Literal, Model, Variable};
use std::fmt::Display;

/// The final verdict of a solving backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SolveStatus {
    /// A solution was found and proven optimal (or the model has no objective).
    Optimal,
    /// A solution was found, but the search ended before proving its optimality.
    Feasible,
    /// The backend proved that no assignment satisfies the hard constraints.
    Infeasible,
    /// The search ended without finding a solution nor proving infeasibility.
    Unknown,
}

impl SolveStatus {
    /// Returns `true` iff the status comes with an assignment.
    pub fn is_solution_found(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

/// The result of a solving backend: a status and, if any, the values of the variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    status: SolveStatus,
    values: Vec<i64>,
    objective: Option<i64>,
}

impl Solution {
    /// Builds a solution from a full assignment, computing its objective value from the model.
    ///
    /// # Panics
    ///
    /// This function panics if the status does not come with an assignment,
    /// or if the number of values differs from the number of variables of the model.
    pub fn new(status: SolveStatus, values: Vec<i64>, model: &Model) -> Self {
        assert!(status.is_solution_found());
        assert_eq!(model.n_vars(), values.len());
        let objective = model.objective().map(|o| o.evaluate(&values));
        Self {
            status,
            values,
            objective,
        }
    }

    /// Builds a result with no assignment.
    ///
    /// # Panics
    ///
    /// This function panics if the status is expected to come with an assignment.
    pub fn without_assignment(status: SolveStatus) -> Self {
        assert!(!status.is_solution_found());
        Self {
            status,
            values: Vec::new(),
            objective: None,
        }
    }

    /// The verdict of the backend.
    pub fn status(&self) -> SolveStatus {
        self.status
    }

    /// The objective value of the assignment, if the model has an objective and a solution was found.
    pub fn objective(&self) -> Option<i64> {
        self.objective
    }

    /// The values of all the variables, indexed from variable 1 (empty if no solution was found).
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Returns the value of a variable.
    ///
    /// # Panics
    ///
    /// This function panics if no solution was found or if the variable is unknown.
    pub fn value(&self, var: Variable) -> i64 {
        self.values[var - 1]
    }

    /// Returns the truth value of a literal.
    ///
    /// # Panics
    ///
    /// This function panics if no solution was found or if the variable is unknown.
    pub fn literal_value(&self, literal: Literal) -> bool {
        literal_value(literal, &self.values)
    }
}
