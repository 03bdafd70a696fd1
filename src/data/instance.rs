use super::{
    HoursDomain, PlanningHorizon, Roster, RuleSet, ShiftDomain, ShiftSelector, Window,
};
use crate::ConfigurationError;

/// A wish of an employee: a negative weight is a preference for the assignment, a positive one a penalty.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Request {
    /// The employee the request is about.
    pub employee: usize,
    /// The index of the shift.
    pub shift: usize,
    /// The index of the day.
    pub day: usize,
    /// The coefficient of the assignment in the objective.
    pub weight: i64,
}

/// An assignment decided beforehand.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FixedAssignment {
    /// The identifier of the employee.
    pub employee: usize,
    /// The index of the shift.
    pub shift: usize,
    /// The index of the day.
    pub day: usize,
}

/// All the data needed to compile a scheduling model.
#[derive(Clone, Debug)]
pub struct SchedulingInstance {
    /// The employees.
    pub roster: Roster,
    /// The shifts, starting with the off shift.
    pub shifts: ShiftDomain,
    /// The days to schedule.
    pub horizon: PlanningHorizon,
    /// The legal daily lengths of work.
    pub hours_domain: HoursDomain,
    /// The wishes of the employees.
    pub requests: Vec<Request>,
    /// The assignments decided beforehand.
    pub fixed_assignments: Vec<FixedAssignment>,
    /// The rules to compile.
    pub rules: RuleSet,
}

impl SchedulingInstance {
    /// Builds an instance with no request, no fixed assignment, no rule and the default hours domain.
    pub fn new(roster: Roster, shifts: ShiftDomain, horizon: PlanningHorizon) -> Self {
        Self {
            roster,
            shifts,
            horizon,
            hours_domain: HoursDomain::default(),
            requests: Vec::new(),
            fixed_assignments: Vec::new(),
            rules: RuleSet::default(),
        }
    }

    /// Checks every index and every cost of the instance.
    ///
    /// Demand tables are checked while they are encoded, since their shape depends on the horizon.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let check_cell = |employee: usize, shift: usize, day: usize| {
            self.roster.get(employee)?;
            self.shifts.check(shift)?;
            self.horizon.check(day)
        };
        self.requests
            .iter()
            .try_for_each(|r| check_cell(r.employee, r.shift, r.day))?;
        self.fixed_assignments
            .iter()
            .try_for_each(|f| check_cell(f.employee, f.shift, f.day))?;
        let rules = &self.rules;
        rules
            .span_rules
            .iter()
            .try_for_each(|r| self.shifts.check(r.shift))?;
        rules.sum_rules.iter().try_for_each(|r| {
            if let ShiftSelector::Shift(s) = r.shift {
                self.shifts.check(s)?;
            }
            self.check_window(r.window)
        })?;
        rules.transitions.iter().try_for_each(|t| {
            self.shifts.check(t.previous)?;
            self.shifts.check(t.next)?;
            check_cost(t.cost)
        })?;
        if let Some(coverage) = &rules.coverage {
            coverage
                .excess_penalties
                .iter()
                .try_for_each(|p| check_cost(*p))?;
        }
        rules.experience.iter().try_for_each(|e| {
            if let Some(s) = e.shift {
                self.shifts.check_working(s)?;
            }
            check_cost(e.excess_cost)
        })?;
        if let Some(hours) = &rules.hours {
            self.check_window(hours.window)?;
            if let super::HoursPolicy::Overtime { rate } = hours.policy {
                check_cost(rate)?;
            }
        }
        Ok(())
    }

    fn check_window(&self, window: Window) -> Result<(), ConfigurationError> {
        match window {
            Window::Weekly => self.horizon.check_weekly(),
            Window::Horizon => Ok(()),
        }
    }

    /// Returns the ranges of days matching a window.
    pub fn window_days(&self, window: Window) -> Vec<std::ops::Range<usize>> {
        match window {
            Window::Weekly => (0..self.horizon.num_weeks())
                .map(|w| self.horizon.week_days(w))
                .collect(),
            Window::Horizon => vec![self.horizon.days()],
        }
    }
}

fn check_cost(cost: i64) -> Result<(), ConfigurationError> {
    if cost < 0 {
        return Err(ConfigurationError::NegativeCost(cost));
    }
    Ok(())
}
