use super::{Bounds, DemandTable};
use serde::Deserialize;

/// The shifts taken into account by a rule.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftSelector {
    /// Any shift but the off shift.
    AnyWorking,
    /// A single shift (possibly the off shift).
    Shift(usize),
}

/// The periods on which a rule is applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Window {
    /// Each week of the horizon (the horizon must be made of whole weeks).
    Weekly,
    /// The whole horizon at once.
    Horizon,
}

/// Bounds on the length of the runs of consecutive days an employee is assigned to a shift.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SpanRule {
    /// The shift which runs are bounded.
    pub shift: usize,
    /// The bounds on the run lengths.
    pub bounds: Bounds,
}

/// Bounds on the number of days an employee is assigned to some shifts in each window.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SumRule {
    /// The counted shifts.
    pub shift: ShiftSelector,
    /// The periods the count is made on.
    pub window: Window,
    /// The bounds on the count.
    pub bounds: Bounds,
}

/// A penalized (or forbidden, when the cost is 0) succession of two shifts on consecutive days.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TransitionRule {
    /// The shift of the first day.
    pub previous: usize,
    /// The shift of the following day.
    pub next: usize,
    /// The cost of each occurrence, 0 forbidding the succession.
    pub cost: i64,
}

/// Minimal headcounts per day and working shift.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CoverageRule {
    /// Columns are working shifts, starting with shift 1.
    pub demands: DemandTable,
    /// The cost of each employee above the demand, per working shift; missing rates are 0.
    #[serde(default)]
    pub excess_penalties: Vec<i64>,
    /// A hard limit on the number of employees above the demand, if any.
    #[serde(default)]
    pub max_over_demand: Option<u32>,
}

/// Minimal headcounts per day and experience level.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ExperienceRule {
    /// The shift the demand applies to, or `None` for any working shift of the day.
    #[serde(default)]
    pub shift: Option<usize>,
    /// Columns are experience levels.
    pub demands: DemandTable,
    /// The cost of each employee above the demand.
    #[serde(default)]
    pub excess_cost: i64,
    /// The highest number of employees above the demand.
    #[serde(default = "default_max_over_demand")]
    pub max_over_demand: u32,
}

fn default_max_over_demand() -> u32 {
    3
}

/// How worked hours relate to the contract.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoursPolicy {
    /// Worked hours must match the contract.
    Exact,
    /// Worked hours may exceed the contract up to the employee overtime allowance, at a cost per hour.
    Overtime {
        /// The cost of each hour above the contract.
        #[serde(default = "default_overtime_rate")]
        rate: i64,
    },
}

fn default_overtime_rate() -> i64 {
    5
}

/// The link between worked hours and contracts.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct HoursRule {
    /// The periods the hours are summed on.
    pub window: Window,
    /// How the sums are bounded.
    pub policy: HoursPolicy,
}

/// The whole set of rules of a scheduling instance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Bounds on consecutive days on a shift.
    pub span_rules: Vec<SpanRule>,
    /// Bounds on the number of days on some shifts.
    pub sum_rules: Vec<SumRule>,
    /// Penalized or forbidden successions.
    pub transitions: Vec<TransitionRule>,
    /// Headcounts per shift.
    pub coverage: Option<CoverageRule>,
    /// Headcounts per experience level.
    pub experience: Vec<ExperienceRule>,
    /// Worked hours against contracts.
    pub hours: Option<HoursRule>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize() {
        let rules: RuleSet = serde_json::from_str(
            r#"{
                "span_rules": [{"shift": 3, "bounds": {"hard_min": 1, "soft_min": 2, "min_cost": 20, "soft_max": 3, "hard_max": 4, "max_cost": 5}}],
                "sum_rules": [{"shift": {"shift": 0}, "window": "weekly", "bounds": {"hard_min": 2, "soft_min": 2, "min_cost": 7, "soft_max": 2, "hard_max": 3, "max_cost": 4}},
                              {"shift": "any_working", "window": "horizon", "bounds": {"hard_min": 2, "soft_min": 2, "soft_max": 3, "hard_max": 3}}],
                "transitions": [{"previous": 2, "next": 3, "cost": 4}],
                "experience": [{"demands": [[1, 0]], "excess_cost": 5}],
                "hours": {"window": "horizon", "policy": {"overtime": {}}}
            }"#,
        )
        .unwrap();
        assert_eq!(1, rules.span_rules.len());
        assert_eq!(ShiftSelector::Shift(0), rules.sum_rules[0].shift);
        assert_eq!(ShiftSelector::AnyWorking, rules.sum_rules[1].shift);
        assert_eq!(Window::Horizon, rules.sum_rules[1].window);
        assert_eq!(None, rules.coverage);
        assert_eq!(3, rules.experience[0].max_over_demand);
        assert_eq!(None, rules.experience[0].shift);
        assert_eq!(
            Some(HoursRule {
                window: Window::Horizon,
                policy: HoursPolicy::Overtime { rate: 5 }
            }),
            rules.hours
        );
    }

    #[test]
    fn test_deserialize_invalid_bounds() {
        let result = serde_json::from_str::<RuleSet>(
            r#"{"span_rules": [{"shift": 0, "bounds": {"hard_min": 3, "soft_min": 1, "soft_max": 3, "hard_max": 3}}]}"#,
        );
        assert!(result.is_err());
    }
}
