use super::{
    Constraint, Domain, LinearConstraint, LinearExpr, Literal, Model, Relation, SolveStatus,
    Solution, Solver,
};
use anyhow::{Context, Result};
use pumpkin_solver::constraints as cp;
use pumpkin_solver::optimisation::linear_sat_unsat::LinearSatUnsat;
use pumpkin_solver::optimisation::OptimisationDirection;
use pumpkin_solver::results::solution_iterator::IteratedSolution;
use pumpkin_solver::results::{OptimisationResult, ProblemSolution, SolutionReference};
use pumpkin_solver::termination::{Indefinite, TimeBudget};
use pumpkin_solver::variables::{AffineView, DomainId, TransformableVariable};
use std::time::Duration;
use tracing::{debug, warn};

/// A constraint programming backend relying on the Pumpkin solver.
///
/// Each variable of the model becomes an integer variable of the solver, Boolean ones having the domain `{0, 1}`.
/// Clauses and implications are posted as linear inequalities, the latter using the bounds of the implied expression.
/// Objectives are minimized by a linear SAT-UNSAT search; models without objective are minimized against a constant.
#[derive(Default)]
pub struct CpSolver;

impl Solver for CpSolver {
    fn solve(&self, model: &Model, time_budget: Duration) -> Result<Solution> {
        let mut translation = Translation::new(model)?;
        let objective = match model.objective() {
            Some(expr) => translation.expr_var(model, expr)?,
            None => translation.solver.new_bounded_integer(0, 0),
        };
        if !translation.consistent {
            debug!("the model is inconsistent at the root level");
            return Ok(Solution::without_assignment(SolveStatus::Infeasible));
        }
        let Translation {
            mut solver, vars, ..
        } = translation;
        let mut brancher = solver.default_brancher();
        let mut termination = TimeBudget::starting_now(time_budget);
        fn ignore_solution<B>(_: &pumpkin_solver::Solver, _: SolutionReference, _: &B) {}
        let result = solver.optimise(
            &mut brancher,
            &mut termination,
            LinearSatUnsat::new(OptimisationDirection::Minimise, objective, ignore_solution),
        );
        let solution = match result {
            OptimisationResult::Optimal(optimal_solution) => Solution::new(
                SolveStatus::Optimal,
                read_values(&optimal_solution, &vars),
                model,
            ),
            OptimisationResult::Satisfiable(satisfiable) => {
                warn!("the time limit was reached before the optimality proof");
                Solution::new(
                    SolveStatus::Feasible,
                    read_values(&satisfiable, &vars),
                    model,
                )
            }
            OptimisationResult::Unsatisfiable => {
                Solution::without_assignment(SolveStatus::Infeasible)
            }
            OptimisationResult::Unknown => {
                warn!("the time limit was reached before any solution was found");
                Solution::without_assignment(SolveStatus::Unknown)
            }
        };
        Ok(solution)
    }
}

impl CpSolver {
    /// Calls the provided function on each assignment satisfying the model, ignoring the objective.
    ///
    /// The enumeration stops as soon as the function returns `false`.
    /// Returns the number of solutions the function was called on.
    pub fn for_each_solution<F>(&self, model: &Model, mut f: F) -> Result<usize>
    where
        F: FnMut(&[i64]) -> bool,
    {
        let translation = Translation::new(model)?;
        if !translation.consistent {
            return Ok(0);
        }
        let Translation {
            mut solver, vars, ..
        } = translation;
        let mut brancher = solver.default_brancher();
        let mut termination = Indefinite;
        let mut iterator = solver.get_solution_iterator(&mut brancher, &mut termination);
        let mut n_solutions = 0;
        while let IteratedSolution::Solution(solution, ..) = iterator.next_solution() {
            n_solutions += 1;
            if !f(&read_values(&solution, &vars)) {
                break;
            }
        }
        debug!("enumerated {} solutions", n_solutions);
        Ok(n_solutions)
    }
}

fn read_values<S: ProblemSolution>(solution: &S, vars: &[DomainId]) -> Vec<i64> {
    vars.iter()
        .map(|var| solution.get_integer_value(*var) as i64)
        .collect()
}

fn to_i32(value: i64) -> Result<i32> {
    i32::try_from(value)
        .with_context(|| format!("the value {} does not fit the solver integers", value))
}

/// A model posted into a Pumpkin solver.
///
/// `consistent` is cleared as soon as a constraint is found unsatisfiable at the root level.
struct Translation {
    solver: pumpkin_solver::Solver,
    vars: Vec<DomainId>,
    consistent: bool,
}

impl Translation {
    fn new(model: &Model) -> Result<Self> {
        let mut solver = pumpkin_solver::Solver::default();
        let vars = model
            .iter_vars()
            .map(|(_, info)| -> Result<DomainId> {
                let context = || format!("while translating the domain of {}", info.name());
                match info.domain() {
                    Domain::Range(lower, upper) => Ok(solver.new_bounded_integer(
                        to_i32(*lower).with_context(context)?,
                        to_i32(*upper).with_context(context)?,
                    )),
                    Domain::Values(values) => {
                        let values = values
                            .iter()
                            .map(|v| to_i32(*v))
                            .collect::<Result<Vec<_>>>()
                            .with_context(context)?;
                        Ok(solver.new_sparse_integer(values))
                    }
                }
            })
            .collect::<Result<Vec<_>>>()?;
        let mut translation = Self {
            solver,
            vars,
            consistent: true,
        };
        for constraint in model.iter_constraints() {
            translation.post(model, constraint)?;
            if !translation.consistent {
                break;
            }
        }
        Ok(translation)
    }

    fn post(&mut self, model: &Model, constraint: &Constraint) -> Result<()> {
        match constraint {
            Constraint::Linear(linear) => self.post_linear(model, linear, None),
            Constraint::BoolOr(clause) => {
                let n_negative = clause.iter().filter(|l| **l < 0).count() as i64;
                let expr = clause.iter().fold(LinearExpr::default(), |e, l| {
                    e.add_term(l.signum() as i64, l.unsigned_abs())
                });
                let linear = LinearConstraint::new(expr, Relation::Ge, 1 - n_negative);
                self.post_linear(model, &linear, None)
            }
            Constraint::Implication {
                condition,
                consequence,
            } => self.post_linear(model, consequence, Some(*condition)),
            Constraint::MaxEquality { target, exprs } => {
                if exprs.is_empty() {
                    self.consistent = false;
                    return Ok(());
                }
                let operands = exprs
                    .iter()
                    .map(|e| self.expr_var(model, e))
                    .collect::<Result<Vec<_>>>()?;
                let target = self.vars[target - 1];
                let constraint_tag = self.solver.new_constraint_tag();
                if self
                    .solver
                    .add_constraint(cp::maximum(operands, target, constraint_tag))
                    .post()
                    .is_err()
                {
                    self.consistent = false;
                }
                Ok(())
            }
        }
    }

    /// Returns a solver variable equal to the expression, creating it if needed.
    fn expr_var(&mut self, model: &Model, expr: &LinearExpr) -> Result<DomainId> {
        if let Some(var) = expr.as_single_var() {
            return Ok(self.vars[var - 1]);
        }
        let (lower, upper) = model.expr_bounds(expr);
        let var = self.solver.new_bounded_integer(to_i32(lower)?, to_i32(upper)?);
        let mut views = self.views(expr)?;
        views.push(var.scaled(-1));
        self.post_views(views, Relation::Eq, to_i32(-expr.offset())?);
        Ok(var)
    }

    fn views(&self, expr: &LinearExpr) -> Result<Vec<AffineView<DomainId>>> {
        expr.terms()
            .iter()
            .filter(|(c, _)| *c != 0)
            .map(|(c, v)| Ok(self.vars[v - 1].scaled(to_i32(*c)?)))
            .collect()
    }

    fn post_linear(
        &mut self,
        model: &Model,
        linear: &LinearConstraint,
        condition: Option<Literal>,
    ) -> Result<()> {
        let rhs = linear.rhs - linear.expr.offset();
        let condition = match condition {
            None => {
                let views = self.views(&linear.expr)?;
                self.post_views(views, linear.relation, to_i32(rhs)?);
                return Ok(());
            }
            Some(literal) => literal,
        };
        let (lower, upper) = model.expr_bounds(&linear.expr);
        if matches!(linear.relation, Relation::Le | Relation::Eq) {
            self.post_implied(&linear.expr, Relation::Le, rhs, upper - linear.rhs, condition)?;
        }
        if matches!(linear.relation, Relation::Ge | Relation::Eq) {
            self.post_implied(&linear.expr, Relation::Ge, rhs, linear.rhs - lower, condition)?;
        }
        Ok(())
    }

    /// Posts `condition => expr <relation> rhs`, where `slack` is the highest violation of the inequality.
    fn post_implied(
        &mut self,
        expr: &LinearExpr,
        relation: Relation,
        rhs: i64,
        slack: i64,
        condition: Literal,
    ) -> Result<()> {
        if slack <= 0 {
            return Ok(());
        }
        let big_m = match relation {
            Relation::Ge => -slack,
            _ => slack,
        };
        let indicator = self.vars[condition.unsigned_abs() - 1];
        let mut views = self.views(expr)?;
        let rhs = if condition > 0 {
            views.push(indicator.scaled(to_i32(big_m)?));
            rhs + big_m
        } else {
            views.push(indicator.scaled(to_i32(-big_m)?));
            rhs
        };
        self.post_views(views, relation, to_i32(rhs)?);
        Ok(())
    }

    fn post_views(&mut self, views: Vec<AffineView<DomainId>>, relation: Relation, rhs: i32) {
        if views.is_empty() {
            self.consistent &= match relation {
                Relation::Eq => rhs == 0,
                Relation::Le => 0 <= rhs,
                Relation::Ge => 0 >= rhs,
            };
            return;
        }
        let constraint_tag = self.solver.new_constraint_tag();
        let posted = match relation {
            Relation::Eq => self
                .solver
                .add_constraint(cp::equals(views, rhs, constraint_tag))
                .post(),
            Relation::Le => self
                .solver
                .add_constraint(cp::less_than_or_equals(views, rhs, constraint_tag))
                .post(),
            Relation::Ge => self
                .solver
                .add_constraint(cp::greater_than_or_equals(views, rhs, constraint_tag))
                .post(),
        };
        self.consistent &= posted.is_ok();
    }
}
