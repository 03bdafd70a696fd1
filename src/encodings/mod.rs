mod demand_encoding;
pub use demand_encoding::CoverageEncoding;
pub use demand_encoding::ExperienceEncoding;

mod hours_encoding;
pub use hours_encoding::HoursEncoding;

mod span_encoding;
pub use span_encoding::SpanEncoding;

mod sum_encoding;
pub use sum_encoding::SumEncoding;

mod transition_encoding;
pub use transition_encoding::TransitionEncoding;

mod variable_factory;
pub use variable_factory::HoursGrid;
pub use variable_factory::ScheduleVars;
pub use variable_factory::VariableFactory;
pub use variable_factory::WorkGrid;
