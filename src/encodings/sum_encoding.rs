use crate::{Bounds, LinearExpr, Model, PenaltyTerm, Relation, Variable};

/// Encodes bounds on a sum of variables.
///
/// The sum is stored in an auxiliary variable which domain is `[hard_min, hard_max]`.
/// Each penalized side gets a deviation variable (the signed distance to the soft bound)
/// and an excess variable equal to the maximum of the deviation and 0; the excess is charged in the objective.
/// The domains of these auxiliary variables are derived from the bounds, so that they never restrict the sum.
pub struct SumEncoding;

impl SumEncoding {
    /// Adds the constraints on the value of `expr` to the model, and returns the penalty terms it created (at most one per side).
    pub fn encode(
        model: &mut Model,
        expr: LinearExpr,
        bounds: &Bounds,
        prefix: &str,
    ) -> Vec<PenaltyTerm> {
        let sum = model.new_int_var(
            bounds.hard_min(),
            bounds.hard_max(),
            format!("{}: sum", prefix),
        );
        model.add_linear(expr.add_term(-1, sum), Relation::Eq, 0);
        let mut terms = Vec::with_capacity(2);
        if bounds.penalizes_under() {
            let delta = model.new_int_var(
                bounds.soft_min() - bounds.hard_max(),
                bounds.soft_min() - bounds.hard_min(),
                format!("{}: under_sum_delta", prefix),
            );
            model.add_linear(
                LinearExpr::from(delta).add_term(1, sum),
                Relation::Eq,
                bounds.soft_min(),
            );
            let excess = positive_part(
                model,
                delta,
                bounds.soft_min() - bounds.hard_min(),
                format!("{}: under_sum", prefix),
            );
            terms.push(PenaltyTerm::new(excess, bounds.min_cost()));
        }
        if bounds.penalizes_over() {
            let delta = model.new_int_var(
                bounds.hard_min() - bounds.soft_max(),
                bounds.hard_max() - bounds.soft_max(),
                format!("{}: over_sum_delta", prefix),
            );
            model.add_linear(
                LinearExpr::from(sum).add_term(-1, delta),
                Relation::Eq,
                bounds.soft_max(),
            );
            let excess = positive_part(
                model,
                delta,
                bounds.hard_max() - bounds.soft_max(),
                format!("{}: over_sum", prefix),
            );
            terms.push(PenaltyTerm::new(excess, bounds.max_cost()));
        }
        terms
    }

    /// Adds the constraints on the number of true variables of `works`.
    pub fn encode_bool_sum(
        model: &mut Model,
        works: &[Variable],
        bounds: &Bounds,
        prefix: &str,
    ) -> Vec<PenaltyTerm> {
        Self::encode(model, LinearExpr::sum(works), bounds, prefix)
    }
}

fn positive_part(model: &mut Model, delta: Variable, upper: i64, name: String) -> Variable {
    let excess = model.new_int_var(0, upper, name);
    model.add_max_equality(
        excess,
        vec![LinearExpr::from(delta), LinearExpr::constant(0)],
    );
    excess
}
