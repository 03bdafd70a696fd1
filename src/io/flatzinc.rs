use crate::{Constraint, Domain, LinearConstraint, LinearExpr, Literal, Model, Relation, Variable};
use anyhow::{anyhow, Context, Result};
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::io::Write;

/// A structure used to write a model in the FlatZinc format.
///
/// Each integer variable `v` of the model is written as `x{v}`.
/// Each Boolean variable `v` is written as `b{v}`, and gets an integer view `x{v}` for the linear constraints.
/// Only the variables of the model are annotated as outputs.
#[derive(Default)]
pub struct FlatZincWriter;

impl FlatZincWriter {
    /// Writes the model in the FlatZinc format.
    pub fn write(&self, writer: &mut dyn Write, model: &Model) -> Result<()> {
        let context = "while writing a FlatZinc model";
        let mut auxiliaries = Auxiliaries::default();
        for constraint in model.iter_constraints() {
            auxiliaries
                .translate(model, constraint)
                .context(context)?;
        }
        let solve = match model.objective() {
            Some(objective) if !objective.terms().is_empty() => {
                auxiliaries.define_expr(model, objective, "objective".to_string());
                "solve minimize objective;"
            }
            _ => "solve satisfy;",
        };
        model
            .iter_vars()
            .try_for_each(|(v, info)| {
                writeln!(writer, "% {}", info.name())?;
                if info.is_boolean() {
                    writeln!(writer, "var bool: b{} :: output_var;", v)?;
                    writeln!(writer, "var 0..1: x{};", v)
                } else {
                    writeln!(writer, "var {}: x{} :: output_var;", domain_to_flatzinc(info.domain()), v)
                }
            })
            .context(context)?;
        auxiliaries
            .declarations
            .iter()
            .try_for_each(|d| writeln!(writer, "{}", d))
            .context(context)?;
        model
            .iter_vars()
            .filter(|(_, info)| info.is_boolean())
            .try_for_each(|(v, _)| writeln!(writer, "constraint bool2int(b{}, x{});", v, v))
            .context(context)?;
        auxiliaries
            .constraints
            .iter()
            .try_for_each(|c| writeln!(writer, "{}", c))
            .context(context)?;
        writeln!(writer, "{}", solve).context(context)?;
        Ok(())
    }

    /// Returns the names given to the variables of the model in the FlatZinc output.
    pub fn output_names(model: &Model) -> FxHashMap<String, Variable> {
        model
            .iter_vars()
            .map(|(v, info)| {
                let prefix = if info.is_boolean() { 'b' } else { 'x' };
                (format!("{}{}", prefix, v), v)
            })
            .collect()
    }
}

fn domain_to_flatzinc(domain: &Domain) -> String {
    match domain {
        Domain::Range(l, u) => format!("{}..{}", l, u),
        Domain::Values(values) => format!("{{{}}}", values.iter().join(",")),
    }
}

#[derive(Default)]
struct Auxiliaries {
    declarations: Vec<String>,
    constraints: Vec<String>,
    n_reified: usize,
    n_max_args: usize,
}

impl Auxiliaries {
    fn translate(&mut self, model: &Model, constraint: &Constraint) -> Result<()> {
        match constraint {
            Constraint::Linear(linear) => {
                self.constraints.push(linear_to_flatzinc(linear, None));
            }
            Constraint::BoolOr(clause) => {
                let (positive, negative): (Vec<Literal>, Vec<Literal>) =
                    clause.iter().partition(|l| **l > 0);
                let positive = positive
                    .iter()
                    .map(|l| bool_name(model, *l))
                    .collect::<Result<Vec<_>>>()?;
                let negative = negative
                    .iter()
                    .map(|l| bool_name(model, *l))
                    .collect::<Result<Vec<_>>>()?;
                self.constraints.push(format!(
                    "constraint bool_clause([{}],[{}]);",
                    positive.join(","),
                    negative.join(",")
                ));
            }
            Constraint::Implication {
                condition,
                consequence,
            } => {
                let condition_name = bool_name(model, *condition)?;
                self.n_reified += 1;
                let reified = format!("r{}", self.n_reified);
                self.declarations.push(format!("var bool: {};", reified));
                self.constraints
                    .push(linear_to_flatzinc(consequence, Some(&reified)));
                self.constraints.push(if *condition > 0 {
                    format!("constraint bool_clause([{}],[{}]);", reified, condition_name)
                } else {
                    format!("constraint bool_clause([{},{}],[]);", condition_name, reified)
                });
            }
            Constraint::MaxEquality { target, exprs } => {
                let args = exprs
                    .iter()
                    .map(|e| self.max_argument(model, e))
                    .collect::<Vec<_>>();
                self.constraints.push(format!(
                    "constraint array_int_maximum(x{}, [{}]);",
                    target,
                    args.join(",")
                ));
            }
        }
        Ok(())
    }

    fn max_argument(&mut self, model: &Model, expr: &LinearExpr) -> String {
        if expr.terms().is_empty() {
            return expr.offset().to_string();
        }
        if let Some(v) = expr.as_single_var() {
            return format!("x{}", v);
        }
        self.n_max_args += 1;
        let name = format!("m{}", self.n_max_args);
        self.define_expr(model, expr, name.clone());
        name
    }

    /// Declares a variable which value is the one of the expression.
    fn define_expr(&mut self, model: &Model, expr: &LinearExpr, name: String) {
        let (lower, upper) = model.expr_bounds(expr);
        self.declarations
            .push(format!("var {}..{}: {};", lower, upper, name));
        let coefficients = expr
            .terms()
            .iter()
            .map(|(c, _)| c.to_string())
            .chain(std::iter::once("-1".to_string()))
            .join(",");
        let vars = expr
            .terms()
            .iter()
            .map(|(_, v)| format!("x{}", v))
            .chain(std::iter::once(name))
            .join(",");
        self.constraints.push(format!(
            "constraint int_lin_eq([{}],[{}],{});",
            coefficients,
            vars,
            -expr.offset()
        ));
    }
}

fn bool_name(model: &Model, literal: Literal) -> Result<String> {
    let var = literal.unsigned_abs();
    if !model.var_info(var).is_boolean() {
        return Err(anyhow!(
            "literal {} refers to the non-Boolean variable {}",
            literal,
            model.var_info(var).name()
        ));
    }
    Ok(format!("b{}", var))
}

fn linear_to_flatzinc(linear: &LinearConstraint, reified: Option<&str>) -> String {
    let (predicate, sign) = match linear.relation {
        Relation::Eq => ("int_lin_eq", 1),
        Relation::Le => ("int_lin_le", 1),
        Relation::Ge => ("int_lin_le", -1),
    };
    let terms = linear.expr.terms();
    let coefficients = terms.iter().map(|(c, _)| sign * c).join(",");
    let vars = terms.iter().map(|(_, v)| format!("x{}", v)).join(",");
    let rhs = sign * (linear.rhs - linear.expr.offset());
    match reified {
        None => format!(
            "constraint {}([{}],[{}],{});",
            predicate, coefficients, vars, rhs
        ),
        Some(r) => format!(
            "constraint {}_reif([{}],[{}],{},{});",
            predicate, coefficients, vars, rhs, r
        ),
    }
}
