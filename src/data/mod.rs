mod bounds;
pub use bounds::Bounds;

mod calendar;
pub use calendar::HoursDomain;
pub use calendar::PlanningHorizon;
pub use calendar::ShiftDomain;
pub use calendar::DAYS_PER_WEEK;

mod demand;
pub use demand::DemandTable;

mod employee;
pub use employee::Employee;
pub use employee::Roster;

mod instance;
pub use instance::FixedAssignment;
pub use instance::Request;
pub use instance::SchedulingInstance;

mod rules;
pub use rules::CoverageRule;
pub use rules::ExperienceRule;
pub use rules::HoursPolicy;
pub use rules::HoursRule;
pub use rules::RuleSet;
pub use rules::ShiftSelector;
pub use rules::SpanRule;
pub use rules::SumRule;
pub use rules::TransitionRule;
pub use rules::Window;
