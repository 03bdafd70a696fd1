mod cp_solver;
pub use cp_solver::CpSolver;

mod error;
pub use error::ConfigurationError;

mod model;
pub use model::lit;
pub use model::not;
pub use model::Clause;
pub use model::Constraint;
pub use model::Domain;
pub use model::LinearConstraint;
pub use model::LinearExpr;
pub use model::Literal;
pub use model::Model;
pub use model::Relation;
pub use model::VarInfo;
pub use model::Variable;

mod penalty;
pub use penalty::Penalties;
pub use penalty::PenaltyTerm;

mod solution;
pub use solution::SolveStatus;
pub use solution::Solution;

mod solver;
pub use solver::ExternalFlatZincSolver;
pub use solver::Solver;
