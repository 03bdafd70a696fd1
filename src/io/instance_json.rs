use crate::{
    ConfigurationError, FixedAssignment, HoursDomain, PlanningHorizon, Request, Roster, RuleSet,
    SchedulingInstance, ShiftDomain,
};
use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::io::Read;

/// A structure used to read a scheduling instance written in JSON.
///
/// Employees are listed in the `employees` array, their identifiers being their positions in it.
/// Requests and fixed assignments refer to employees by name, and to shifts and days by index.
///
/// ```json
/// {
///     "employees": [{"name": "Logan", "contract_weekly_hours": 40, "level": 1}],
///     "shifts": ["O", "M", "A", "N"],
///     "num_days": 7,
///     "hours_domain": [0, 6, 8],
///     "requests": [{"employee": "Logan", "shift": 0, "day": 5, "weight": -2}],
///     "fixed_assignments": [{"employee": "Logan", "shift": 3, "day": 0}],
///     "rules": {"transitions": [{"previous": 3, "next": 1, "cost": 4}]}
/// }
/// ```
#[derive(Default)]
pub struct InstanceJsonReader;

impl InstanceJsonReader {
    /// Reads an instance, resolving the employee names.
    pub fn read<R>(&self, reader: R) -> Result<SchedulingInstance>
    where
        R: Read,
    {
        let context = "while reading a JSON scheduling instance";
        let raw: RawInstance = serde_json::from_reader(reader).context(context)?;
        raw.into_instance().context(context)
    }
}

#[derive(Deserialize)]
struct RawInstance {
    employees: Roster,
    shifts: ShiftDomain,
    num_days: PlanningHorizon,
    #[serde(default)]
    hours_domain: HoursDomain,
    #[serde(default)]
    requests: Vec<RawRequest>,
    #[serde(default)]
    fixed_assignments: Vec<RawFixedAssignment>,
    #[serde(default)]
    rules: RuleSet,
}

#[derive(Deserialize)]
struct RawRequest {
    employee: String,
    shift: usize,
    day: usize,
    weight: i64,
}

#[derive(Deserialize)]
struct RawFixedAssignment {
    employee: String,
    shift: usize,
    day: usize,
}

impl RawInstance {
    fn into_instance(self) -> Result<SchedulingInstance, ConfigurationError> {
        let mut ids = FxHashMap::default();
        for employee in self.employees.iter() {
            if ids.insert(employee.name(), employee.id()).is_some() {
                return Err(ConfigurationError::DuplicateEmployee(
                    employee.name().to_string(),
                ));
            }
        }
        let id_of = |name: &str| {
            ids.get(name)
                .copied()
                .ok_or_else(|| ConfigurationError::UnknownEmployee(name.to_string()))
        };
        let requests = self
            .requests
            .iter()
            .map(|r| {
                Ok(Request {
                    employee: id_of(&r.employee)?,
                    shift: r.shift,
                    day: r.day,
                    weight: r.weight,
                })
            })
            .collect::<Result<Vec<_>, ConfigurationError>>()?;
        let fixed_assignments = self
            .fixed_assignments
            .iter()
            .map(|f| {
                Ok(FixedAssignment {
                    employee: id_of(&f.employee)?,
                    shift: f.shift,
                    day: f.day,
                })
            })
            .collect::<Result<Vec<_>, ConfigurationError>>()?;
        drop(ids);
        let mut instance = SchedulingInstance::new(self.employees, self.shifts, self.num_days);
        instance.hours_domain = self.hours_domain;
        instance.requests = requests;
        instance.fixed_assignments = fixed_assignments;
        instance.rules = self.rules;
        Ok(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HoursPolicy, Window};

    #[test]
    fn test_read() {
        let json = r#"{
            "employees": [
                {"name": "Logan", "contract_weekly_hours": 40},
                {"name": "Dass", "contract_weekly_hours": 32, "level": 1, "maximum_overtime": 6}
            ],
            "shifts": ["O", "M", "A", "N"],
            "num_days": 14,
            "requests": [{"employee": "Dass", "shift": 0, "day": 5, "weight": -2}],
            "fixed_assignments": [{"employee": "Logan", "shift": 3, "day": 0}],
            "rules": {
                "transitions": [{"previous": 3, "next": 1, "cost": 4}],
                "coverage": {"demands": [[1, 1, 1], [1, 1, 1], [1, 1, 1], [1, 1, 1], [1, 1, 1], [1, 0, 1], [1, 0, 1]], "excess_penalties": [2, 2, 5]},
                "hours": {"window": "weekly", "policy": {"overtime": {"rate": 3}}}
            }
        }"#;
        let instance = InstanceJsonReader.read(json.as_bytes()).unwrap();
        assert_eq!(2, instance.roster.len());
        assert_eq!(4, instance.shifts.n_shifts());
        assert_eq!(2, instance.horizon.num_weeks());
        assert_eq!(&[0, 6, 8], instance.hours_domain.values());
        assert_eq!(
            vec![Request {
                employee: 1,
                shift: 0,
                day: 5,
                weight: -2
            }],
            instance.requests
        );
        assert_eq!(0, instance.fixed_assignments[0].employee);
        assert_eq!(
            Some(HoursPolicy::Overtime { rate: 3 }),
            instance.rules.hours.as_ref().map(|h| h.policy)
        );
        assert_eq!(Some(Window::Weekly), instance.rules.hours.as_ref().map(|h| h.window));
        assert!(instance.validate().is_ok());
    }

    #[test]
    fn test_unknown_employee() {
        let json = r#"{
            "employees": [{"name": "Logan", "contract_weekly_hours": 40}],
            "shifts": ["O", "M"],
            "num_days": 7,
            "requests": [{"employee": "Curro", "shift": 0, "day": 5, "weight": -2}]
        }"#;
        let error = InstanceJsonReader.read(json.as_bytes()).unwrap_err();
        assert_eq!(
            Some(&ConfigurationError::UnknownEmployee("Curro".to_string())),
            error.downcast_ref::<ConfigurationError>()
        );
    }

    #[test]
    fn test_duplicate_employee() {
        let json = r#"{
            "employees": [
                {"name": "Logan", "contract_weekly_hours": 40},
                {"name": "Logan", "contract_weekly_hours": 32}
            ],
            "shifts": ["O", "M"],
            "num_days": 7,
            "requests": [{"employee": "Logan", "shift": 1, "day": 0, "weight": 1}]
        }"#;
        let error = InstanceJsonReader.read(json.as_bytes()).unwrap_err();
        assert_eq!(
            Some(&ConfigurationError::DuplicateEmployee("Logan".to_string())),
            error.downcast_ref::<ConfigurationError>()
        );
    }

    #[test]
    fn test_invalid_data() {
        let json = r#"{
            "employees": [],
            "shifts": [],
            "num_days": 7
        }"#;
        assert!(InstanceJsonReader.read(json.as_bytes()).is_err());
        let json = r#"{
            "employees": [],
            "shifts": ["O"],
            "num_days": 0
        }"#;
        assert!(InstanceJsonReader.read(json.as_bytes()).is_err());
    }
}
