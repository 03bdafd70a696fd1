use std::fmt::Display;

/// A variable of a [`Model`].
///
/// Variables are numbered from 1, in the order they are created.
pub type Variable = usize;

/// A Boolean literal: a positive value is a variable, a negative one is its negation.
pub type Literal = isize;

/// A disjunction of literals.
pub type Clause = Vec<Literal>;

/// Returns the literal asserting the provided (Boolean) variable.
pub fn lit(var: Variable) -> Literal {
    var as Literal
}

/// Returns the literal asserting the negation of the provided (Boolean) variable.
pub fn not(var: Variable) -> Literal {
    -(var as Literal)
}

/// The set of values a variable may take.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Domain {
    /// A contiguous range `[lower, upper]`.
    Range(i64, i64),
    /// An explicit set of values, sorted and without duplicates.
    Values(Vec<i64>),
}

impl Domain {
    /// Builds a domain from a set of values, sorting and deduplicating them.
    pub fn from_values(mut values: Vec<i64>) -> Self {
        values.sort_unstable();
        values.dedup();
        Domain::Values(values)
    }

    /// Returns the lowest value of the domain, or `None` if the domain is empty.
    pub fn lower(&self) -> Option<i64> {
        match self {
            Domain::Range(l, u) if l <= u => Some(*l),
            Domain::Range(_, _) => None,
            Domain::Values(v) => v.first().copied(),
        }
    }

    /// Returns the highest value of the domain, or `None` if the domain is empty.
    pub fn upper(&self) -> Option<i64> {
        match self {
            Domain::Range(l, u) if l <= u => Some(*u),
            Domain::Range(_, _) => None,
            Domain::Values(v) => v.last().copied(),
        }
    }

    /// Returns `true` iff the value belongs to the domain.
    pub fn contains(&self, value: i64) -> bool {
        match self {
            Domain::Range(l, u) => *l <= value && value <= *u,
            Domain::Values(v) => v.binary_search(&value).is_ok(),
        }
    }

    /// Lists the values of the domain in ascending order.
    pub fn values(&self) -> Vec<i64> {
        match self {
            Domain::Range(l, u) => (*l..=*u).collect(),
            Domain::Values(v) => v.clone(),
        }
    }
}

/// A linear expression `Σ coefficient × variable + offset`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinearExpr {
    terms: Vec<(i64, Variable)>,
    offset: i64,
}

impl LinearExpr {
    /// Builds the sum of the provided variables.
    pub fn sum(vars: &[Variable]) -> Self {
        Self {
            terms: vars.iter().map(|v| (1, *v)).collect(),
            offset: 0,
        }
    }

    /// Builds a constant expression.
    pub fn constant(offset: i64) -> Self {
        Self {
            terms: Vec::new(),
            offset,
        }
    }

    /// Adds `coefficient × var` to this expression.
    pub fn add_term(mut self, coefficient: i64, var: Variable) -> Self {
        self.terms.push((coefficient, var));
        self
    }

    /// Adds a constant to this expression.
    pub fn add_constant(mut self, value: i64) -> Self {
        self.offset += value;
        self
    }

    /// The (coefficient, variable) couples of the expression.
    pub fn terms(&self) -> &[(i64, Variable)] {
        &self.terms
    }

    /// The constant part of the expression.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Returns the variable if this expression is exactly `1 × var`.
    pub fn as_single_var(&self) -> Option<Variable> {
        match self.terms.as_slice() {
            [(1, v)] if self.offset == 0 => Some(*v),
            _ => None,
        }
    }

    /// Evaluates the expression given the values of the variables (indexed from variable 1).
    pub fn evaluate(&self, values: &[i64]) -> i64 {
        self.terms
            .iter()
            .map(|(c, v)| c * values[v - 1])
            .sum::<i64>()
            + self.offset
    }
}

impl From<Variable> for LinearExpr {
    fn from(var: Variable) -> Self {
        LinearExpr::sum(&[var])
    }
}

/// The relation between a linear expression and a constant.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Relation {
    /// `expr == rhs`
    Eq,
    /// `expr <= rhs`
    Le,
    /// `expr >= rhs`
    Ge,
}

impl Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Relation::Eq => write!(f, "=="),
            Relation::Le => write!(f, "<="),
            Relation::Ge => write!(f, ">="),
        }
    }
}

/// A linear constraint `expr <relation> rhs`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearConstraint {
    /// The constrained expression.
    pub expr: LinearExpr,
    /// The relation between the expression and the right-hand side.
    pub relation: Relation,
    /// The right-hand side constant.
    pub rhs: i64,
}

impl LinearConstraint {
    /// Builds a new linear constraint.
    pub fn new(expr: LinearExpr, relation: Relation, rhs: i64) -> Self {
        Self {
            expr,
            relation,
            rhs,
        }
    }

    /// Checks the constraint against the values of the variables.
    pub fn is_satisfied(&self, values: &[i64]) -> bool {
        let value = self.expr.evaluate(values);
        match self.relation {
            Relation::Eq => value == self.rhs,
            Relation::Le => value <= self.rhs,
            Relation::Ge => value >= self.rhs,
        }
    }
}

/// A hard constraint of a [`Model`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Constraint {
    /// A linear constraint.
    Linear(LinearConstraint),
    /// At least one of the literals must hold.
    BoolOr(Clause),
    /// The linear constraint is only enforced if the condition literal holds.
    Implication {
        /// The enforcing literal.
        condition: Literal,
        /// The enforced constraint.
        consequence: LinearConstraint,
    },
    /// `target == max(exprs)`.
    MaxEquality {
        /// The variable equal to the maximum.
        target: Variable,
        /// The operands.
        exprs: Vec<LinearExpr>,
    },
}

impl Constraint {
    /// Iterates over the variables involved in the constraint (possibly with repetitions).
    pub fn vars(&self) -> Box<dyn Iterator<Item = Variable> + '_> {
        match self {
            Constraint::Linear(l) => Box::new(l.expr.terms().iter().map(|(_, v)| *v)),
            Constraint::BoolOr(cl) => Box::new(cl.iter().map(|l| l.unsigned_abs())),
            Constraint::Implication {
                condition,
                consequence,
            } => Box::new(
                std::iter::once(condition.unsigned_abs())
                    .chain(consequence.expr.terms().iter().map(|(_, v)| *v)),
            ),
            Constraint::MaxEquality { target, exprs } => Box::new(
                std::iter::once(*target)
                    .chain(exprs.iter().flat_map(|e| e.terms().iter().map(|(_, v)| *v))),
            ),
        }
    }

    /// Checks the constraint against a full assignment (indexed from variable 1).
    pub fn is_satisfied(&self, values: &[i64]) -> bool {
        match self {
            Constraint::Linear(l) => l.is_satisfied(values),
            Constraint::BoolOr(cl) => cl.iter().any(|l| literal_value(*l, values)),
            Constraint::Implication {
                condition,
                consequence,
            } => !literal_value(*condition, values) || consequence.is_satisfied(values),
            Constraint::MaxEquality { target, exprs } => exprs
                .iter()
                .map(|e| e.evaluate(values))
                .max()
                .is_some_and(|m| m == values[target - 1]),
        }
    }
}

/// Returns the truth value of a literal given the values of the variables.
pub fn literal_value(literal: Literal, values: &[i64]) -> bool {
    let value = values[literal.unsigned_abs() - 1] != 0;
    if literal > 0 {
        value
    } else {
        !value
    }
}

/// The description of a variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarInfo {
    name: String,
    domain: Domain,
    boolean: bool,
}

impl VarInfo {
    /// The name given to the variable at its creation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The domain of the variable.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Returns `true` iff the variable was created as a Boolean.
    pub fn is_boolean(&self) -> bool {
        self.boolean
    }
}

/// A solver-agnostic constraint model.
///
/// A model is made of Boolean and bounded integer variables, a set of hard constraints,
/// and an optional linear objective to minimize.
/// Models are built by the encoders, then handed to a [`Solver`](crate::Solver).
#[derive(Clone, Debug, Default)]
pub struct Model {
    vars: Vec<VarInfo>,
    constraints: Vec<Constraint>,
    objective: Option<LinearExpr>,
}

impl Model {
    /// Returns the number of variables of this model.
    pub fn n_vars(&self) -> usize {
        self.vars.len()
    }

    /// Returns the number of constraints of this model.
    pub fn n_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Creates a new Boolean variable.
    pub fn new_bool_var(&mut self, name: impl Into<String>) -> Variable {
        self.new_var(name.into(), Domain::Range(0, 1), true)
    }

    /// Creates a new integer variable which domain is `[lower, upper]`.
    ///
    /// # Panics
    ///
    /// This function panics if the domain is empty.
    pub fn new_int_var(&mut self, lower: i64, upper: i64, name: impl Into<String>) -> Variable {
        if lower > upper {
            panic!("empty domain [{}, {}]", lower, upper);
        }
        self.new_var(name.into(), Domain::Range(lower, upper), false)
    }

    /// Creates a new integer variable which domain is the provided set of values.
    ///
    /// # Panics
    ///
    /// This function panics if the set of values is empty.
    pub fn new_int_var_from_values(
        &mut self,
        values: Vec<i64>,
        name: impl Into<String>,
    ) -> Variable {
        if values.is_empty() {
            panic!("empty domain");
        }
        self.new_var(name.into(), Domain::from_values(values), false)
    }

    fn new_var(&mut self, name: String, domain: Domain, boolean: bool) -> Variable {
        self.vars.push(VarInfo {
            name,
            domain,
            boolean,
        });
        self.vars.len()
    }

    /// Returns the description of a variable.
    ///
    /// # Panics
    ///
    /// This function panics if the variable does not belong to this model.
    pub fn var_info(&self, var: Variable) -> &VarInfo {
        &self.vars[var - 1]
    }

    /// Iterates over the variables of this model, in creation order.
    pub fn iter_vars(&self) -> impl Iterator<Item = (Variable, &VarInfo)> + '_ {
        self.vars.iter().enumerate().map(|(i, v)| (i + 1, v))
    }

    /// Adds the constraint `expr <relation> rhs`.
    pub fn add_linear(&mut self, expr: LinearExpr, relation: Relation, rhs: i64) {
        self.add_constraint(Constraint::Linear(LinearConstraint::new(expr, relation, rhs)));
    }

    /// Adds a clause: at least one of the literals must hold.
    pub fn add_bool_or(&mut self, clause: Clause) {
        self.add_constraint(Constraint::BoolOr(clause));
    }

    /// Adds a linear constraint that is only enforced if the condition literal holds.
    pub fn add_implication(&mut self, condition: Literal, consequence: LinearConstraint) {
        self.add_constraint(Constraint::Implication {
            condition,
            consequence,
        });
    }

    /// Adds the constraint `target == max(exprs)`.
    pub fn add_max_equality(&mut self, target: Variable, exprs: Vec<LinearExpr>) {
        self.add_constraint(Constraint::MaxEquality { target, exprs });
    }

    /// Adds a constraint to the model.
    ///
    /// # Panics
    ///
    /// In case the constraint involves variables that do not belong to this model, this function panics.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        if constraint.vars().any(|v| v == 0 || v > self.vars.len()) {
            panic!("variable index is higher than n_vars");
        }
        self.constraints.push(constraint);
    }

    /// Iterates over the constraints of this model.
    pub fn iter_constraints(&self) -> impl Iterator<Item = &Constraint> + '_ {
        self.constraints.iter()
    }

    /// Sets the objective function to minimize, replacing the previous one if any.
    pub fn minimize(&mut self, objective: LinearExpr) {
        if objective.terms().iter().any(|(_, v)| *v == 0 || *v > self.vars.len()) {
            panic!("variable index is higher than n_vars");
        }
        self.objective = Some(objective);
    }

    /// Returns the objective function, if any.
    pub fn objective(&self) -> Option<&LinearExpr> {
        self.objective.as_ref()
    }

    /// Returns the lowest and highest values the expression may take given the variable domains.
    pub fn expr_bounds(&self, expr: &LinearExpr) -> (i64, i64) {
        expr.terms().iter().fold((expr.offset(), expr.offset()), |(lo, hi), (c, v)| {
            let domain = self.var_info(*v).domain();
            let (l, u) = (
                domain.lower().unwrap_or_default(),
                domain.upper().unwrap_or_default(),
            );
            if *c >= 0 {
                (lo + c * l, hi + c * u)
            } else {
                (lo + c * u, hi + c * l)
            }
        })
    }

    /// Checks a full assignment against the domains and the constraints of the model.
    pub fn is_satisfied_by(&self, values: &[i64]) -> bool {
        values.len() == self.vars.len()
            && self
                .vars
                .iter()
                .zip(values.iter())
                .all(|(v, x)| v.domain().contains(*x))
            && self.constraints.iter().all(|c| c.is_satisfied(values))
    }
}
