use thiserror::Error;

/// An error raised when the scheduling data or the rule tables cannot be compiled.
///
/// These errors are detected before the faulty rule instance adds anything to the model,
/// and abort the whole compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A bound tuple violates `0 <= hard_min <= soft_min <= soft_max <= hard_max` or has a negative cost.
    #[error("invalid bounds (hard_min={hard_min}, soft_min={soft_min}, min_cost={min_cost}, soft_max={soft_max}, hard_max={hard_max}, max_cost={max_cost}): {reason}")]
    InvalidBounds {
        /// The given hard minimum.
        hard_min: i64,
        /// The given soft minimum.
        soft_min: i64,
        /// The given cost below the soft minimum.
        min_cost: i64,
        /// The given soft maximum.
        soft_max: i64,
        /// The given hard maximum.
        hard_max: i64,
        /// The given cost above the soft maximum.
        max_cost: i64,
        /// The violated condition.
        reason: &'static str,
    },

    /// An employee index is not lower than the number of employees.
    #[error("employee index {index} is out of range (number of employees is {len})")]
    EmployeeOutOfRange {
        /// The faulty index.
        index: usize,
        /// The number of employees.
        len: usize,
    },

    /// A shift index is not lower than the number of shifts.
    #[error("shift index {index} is out of range (number of shifts is {len})")]
    ShiftOutOfRange {
        /// The faulty index.
        index: usize,
        /// The number of shifts.
        len: usize,
    },

    /// A working shift was expected, but the off shift was given.
    #[error("shift index 0 is the off shift, a working shift is expected here")]
    OffShiftNotAllowed,

    /// A day index is not lower than the number of days.
    #[error("day index {index} is out of range (number of days is {len})")]
    DayOutOfRange {
        /// The faulty index.
        index: usize,
        /// The number of days.
        len: usize,
    },

    /// A demand table has no entry for the requested cell.
    #[error("missing demand for day {day}, column {column}")]
    MissingDemand {
        /// The day of the missing entry.
        day: usize,
        /// The shift or level of the missing entry.
        column: usize,
    },

    /// A demand is higher than the number of employees that could fulfill it.
    #[error("demand {demand} for day {day} exceeds the eligible headcount {headcount}")]
    DemandExceedsHeadcount {
        /// The day of the demand.
        day: usize,
        /// The required headcount.
        demand: u32,
        /// The number of eligible employees.
        headcount: usize,
    },

    /// The shift domain does not even contain the off shift.
    #[error("the shift domain must contain at least the off shift")]
    EmptyShiftDomain,

    /// The planning horizon has no day.
    #[error("the planning horizon must contain at least one day")]
    EmptyHorizon,

    /// A weekly rule was set on a horizon which is not made of whole weeks.
    #[error("weekly rules require a horizon made of whole weeks, got {num_days} days")]
    HorizonNotWeekly {
        /// The length of the horizon.
        num_days: usize,
    },

    /// A cost or a penalty rate is negative.
    #[error("costs must be non-negative, got {0}")]
    NegativeCost(i64),

    /// The set of legal daily lengths is not usable.
    #[error("invalid hours domain {values:?}: {reason}")]
    InvalidHoursDomain {
        /// The given lengths.
        values: Vec<u32>,
        /// The violated condition.
        reason: &'static str,
    },

    /// A request refers to an employee name that is not part of the roster.
    #[error(r#"unknown employee "{0}""#)]
    UnknownEmployee(String),

    /// Two employees share the same name, making references by name ambiguous.
    #[error(r#"several employees are named "{0}""#)]
    DuplicateEmployee(String),
}
