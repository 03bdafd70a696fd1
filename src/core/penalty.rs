use super::{LinearExpr, Model, Variable};

/// A variable with a coefficient in the objective function.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PenaltyTerm {
    var: Variable,
    coefficient: i64,
}

impl PenaltyTerm {
    /// Builds a new penalty term.
    pub fn new(var: Variable, coefficient: i64) -> Self {
        Self { var, coefficient }
    }

    /// Returns the penalized variable.
    pub fn var(&self) -> Variable {
        self.var
    }

    /// Returns the coefficient of the variable in the objective.
    ///
    /// A negative coefficient is a reward.
    pub fn coefficient(&self) -> i64 {
        self.coefficient
    }
}

/// The accumulator of the penalty terms produced while compiling the rules.
///
/// Once every rule has been encoded, the accumulated terms are summed into the linear objective of the model.
#[derive(Clone, Debug, Default)]
pub struct Penalties {
    terms: Vec<PenaltyTerm>,
}

impl Penalties {
    /// Adds a single term.
    pub fn push(&mut self, term: PenaltyTerm) {
        self.terms.push(term);
    }

    /// Iterates over the accumulated terms, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PenaltyTerm> + '_ {
        self.terms.iter()
    }

    /// Returns the number of accumulated terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` iff no term was accumulated.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Builds the linear expression `Σ coefficient × var`.
    pub fn to_linear_expr(&self) -> LinearExpr {
        self.terms
            .iter()
            .fold(LinearExpr::default(), |expr, t| expr.add_term(t.coefficient, t.var))
    }

    /// Sets the sum of the accumulated terms as the objective to minimize.
    pub fn set_objective(&self, model: &mut Model) {
        model.minimize(self.to_linear_expr());
    }

    /// Consumes the accumulator, returning the terms.
    pub fn into_terms(self) -> Vec<PenaltyTerm> {
        self.terms
    }
}

impl Extend<PenaltyTerm> for Penalties {
    fn extend<T: IntoIterator<Item = PenaltyTerm>>(&mut self, iter: T) {
        self.terms.extend(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objective_from_terms() {
        let mut model = Model::default();
        let a = model.new_bool_var("a");
        let x = model.new_int_var(0, 4, "x");
        let mut penalties = Penalties::default();
        penalties.push(PenaltyTerm::new(a, -2));
        penalties.extend(vec![PenaltyTerm::new(x, 5)]);
        assert_eq!(2, penalties.len());
        penalties.set_objective(&mut model);
        let objective = model.objective().unwrap();
        assert_eq!(&[(-2, a), (5, x)], objective.terms());
        assert_eq!(18, objective.evaluate(&[1, 4]));
    }

    #[test]
    fn test_empty_objective() {
        let mut model = Model::default();
        Penalties::default().set_objective(&mut model);
        assert!(model.objective().unwrap().terms().is_empty());
    }
}
