use crate::ConfigurationError;
use serde::Deserialize;
use std::collections::BTreeSet;

/// An employee, as seen by the scheduling rules.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Employee {
    #[serde(skip)]
    id: usize,
    name: String,
    contract_weekly_hours: u32,
    #[serde(default)]
    level: u32,
    #[serde(default)]
    maximum_overtime: u32,
}

impl Employee {
    /// Builds a new employee of level 0 without overtime allowance.
    ///
    /// The identifier is given by the [`Roster`] the employee is added to.
    pub fn new(name: impl Into<String>, contract_weekly_hours: u32) -> Self {
        Self {
            id: 0,
            name: name.into(),
            contract_weekly_hours,
            level: 0,
            maximum_overtime: 0,
        }
    }

    /// Sets the experience level.
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Sets the number of hours the employee may work above the contract.
    pub fn with_maximum_overtime(mut self, maximum_overtime: u32) -> Self {
        self.maximum_overtime = maximum_overtime;
        self
    }

    /// The position of the employee in its roster.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The name of the employee.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The number of hours the employee is contracted for each week.
    pub fn contract_weekly_hours(&self) -> u32 {
        self.contract_weekly_hours
    }

    /// The experience level of the employee.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// The number of hours the employee may work above the contract.
    pub fn maximum_overtime(&self) -> u32 {
        self.maximum_overtime
    }
}

/// The fixed set of employees of a scheduling run.
///
/// Employees get their identifiers from their position in the roster.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<Employee>")]
pub struct Roster {
    employees: Vec<Employee>,
}

impl Roster {
    /// Builds a roster, assigning sequential identifiers to the employees.
    pub fn new(mut employees: Vec<Employee>) -> Self {
        employees.iter_mut().enumerate().for_each(|(i, e)| e.id = i);
        Self { employees }
    }

    /// Returns the number of employees.
    pub fn len(&self) -> usize {
        self.employees.len()
    }

    /// Returns `true` iff the roster has no employee.
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Returns the employee with the provided identifier.
    pub fn get(&self, id: usize) -> Result<&Employee, ConfigurationError> {
        self.employees
            .get(id)
            .ok_or(ConfigurationError::EmployeeOutOfRange {
                index: id,
                len: self.employees.len(),
            })
    }

    /// Iterates over the employees in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Employee> + '_ {
        self.employees.iter()
    }

    /// Returns the identifier of the first employee with the provided name.
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.employees.iter().position(|e| e.name == name)
    }

    /// Returns the distinct levels of the employees, in ascending order.
    pub fn levels(&self) -> Vec<u32> {
        self.employees
            .iter()
            .map(|e| e.level)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl From<Vec<Employee>> for Roster {
    fn from(employees: Vec<Employee>) -> Self {
        Roster::new(employees)
    }
}
