//! A compiler turning shift scheduling rules into solver-agnostic constraint models.

mod compiler;
pub use compiler::compile;
pub use compiler::CompiledSchedule;
pub use compiler::Schedule;

mod core;
pub use crate::core::lit;
pub use crate::core::not;
pub use crate::core::Clause;
pub use crate::core::ConfigurationError;
pub use crate::core::Constraint;
pub use crate::core::CpSolver;
pub use crate::core::Domain;
pub use crate::core::ExternalFlatZincSolver;
pub use crate::core::LinearConstraint;
pub use crate::core::LinearExpr;
pub use crate::core::Literal;
pub use crate::core::Model;
pub use crate::core::Penalties;
pub use crate::core::PenaltyTerm;
pub use crate::core::Relation;
pub use crate::core::SolveStatus;
pub use crate::core::Solution;
pub use crate::core::Solver;
pub use crate::core::VarInfo;
pub use crate::core::Variable;

mod data;
pub use data::Bounds;
pub use data::CoverageRule;
pub use data::DemandTable;
pub use data::Employee;
pub use data::ExperienceRule;
pub use data::FixedAssignment;
pub use data::HoursDomain;
pub use data::HoursPolicy;
pub use data::HoursRule;
pub use data::PlanningHorizon;
pub use data::Request;
pub use data::Roster;
pub use data::RuleSet;
pub use data::SchedulingInstance;
pub use data::ShiftDomain;
pub use data::ShiftSelector;
pub use data::SpanRule;
pub use data::SumRule;
pub use data::TransitionRule;
pub use data::Window;
pub use data::DAYS_PER_WEEK;

mod encodings;
pub use encodings::CoverageEncoding;
pub use encodings::ExperienceEncoding;
pub use encodings::HoursEncoding;
pub use encodings::HoursGrid;
pub use encodings::ScheduleVars;
pub use encodings::SpanEncoding;
pub use encodings::SumEncoding;
pub use encodings::TransitionEncoding;
pub use encodings::VariableFactory;
pub use encodings::WorkGrid;

mod io;
pub use io::FlatZincWriter;
pub use io::InstanceJsonReader;
