use crate::{
    lit, not, ConfigurationError, FixedAssignment, HoursDomain, LinearConstraint, LinearExpr,
    Model, PlanningHorizon, Relation, ShiftDomain, Variable,
};

/// The Boolean variables telling whether an employee is assigned to a shift on a day.
///
/// The grid is dense: a variable exists for each (employee, shift, day), the off shift included.
#[derive(Clone, Debug)]
pub struct WorkGrid {
    n_employees: usize,
    n_shifts: usize,
    n_days: usize,
    vars: Vec<Variable>,
}

impl WorkGrid {
    /// The number of employees.
    pub fn n_employees(&self) -> usize {
        self.n_employees
    }

    /// The number of shifts, the off shift included.
    pub fn n_shifts(&self) -> usize {
        self.n_shifts
    }

    /// The number of days.
    pub fn n_days(&self) -> usize {
        self.n_days
    }

    /// Returns the variable of an (employee, shift, day) cell, checking the indices.
    pub fn get(
        &self,
        employee: usize,
        shift: usize,
        day: usize,
    ) -> Result<Variable, ConfigurationError> {
        check_index(employee, self.n_employees, |index, len| {
            ConfigurationError::EmployeeOutOfRange { index, len }
        })?;
        check_index(shift, self.n_shifts, |index, len| {
            ConfigurationError::ShiftOutOfRange { index, len }
        })?;
        check_index(day, self.n_days, |index, len| ConfigurationError::DayOutOfRange {
            index,
            len,
        })?;
        Ok(self.vars[(employee * self.n_shifts + shift) * self.n_days + day])
    }

    /// Returns the variables of an employee for a shift, ordered by day.
    pub fn shift_sequence(
        &self,
        employee: usize,
        shift: usize,
    ) -> Result<&[Variable], ConfigurationError> {
        self.get(employee, shift, 0)?;
        let start = (employee * self.n_shifts + shift) * self.n_days;
        Ok(&self.vars[start..start + self.n_days])
    }

    /// Returns the variables of an employee for a day, ordered by shift.
    pub fn day_vars(&self, employee: usize, day: usize) -> Result<Vec<Variable>, ConfigurationError> {
        (0..self.n_shifts)
            .map(|s| self.get(employee, s, day))
            .collect()
    }
}

/// The integer variables giving the number of hours an employee works on a day.
#[derive(Clone, Debug)]
pub struct HoursGrid {
    n_employees: usize,
    n_days: usize,
    vars: Vec<Variable>,
}

impl HoursGrid {
    /// Returns the variable of an (employee, day) cell, checking the indices.
    pub fn get(&self, employee: usize, day: usize) -> Result<Variable, ConfigurationError> {
        check_index(employee, self.n_employees, |index, len| {
            ConfigurationError::EmployeeOutOfRange { index, len }
        })?;
        check_index(day, self.n_days, |index, len| ConfigurationError::DayOutOfRange {
            index,
            len,
        })?;
        Ok(self.vars[employee * self.n_days + day])
    }

    /// Returns the variables of an employee, ordered by day.
    pub fn employee_sequence(&self, employee: usize) -> Result<&[Variable], ConfigurationError> {
        self.get(employee, 0)?;
        let start = employee * self.n_days;
        Ok(&self.vars[start..start + self.n_days])
    }
}

fn check_index<F>(index: usize, len: usize, error: F) -> Result<(), ConfigurationError>
where
    F: FnOnce(usize, usize) -> ConfigurationError,
{
    if index >= len {
        return Err(error(index, len));
    }
    Ok(())
}

/// The decision variables of a schedule.
#[derive(Clone, Debug)]
pub struct ScheduleVars {
    /// The Boolean assignment variables.
    pub work: WorkGrid,
    /// The daily worked hours variables.
    pub hours: HoursGrid,
}

/// Creates the decision variables of a schedule and the constraints linking them.
pub struct VariableFactory;

impl VariableFactory {
    /// Creates the work and hours grids.
    ///
    /// Each employee is assigned exactly one shift per day (possibly the off shift).
    /// An employee works 0 hours on a day off, and a positive number of hours otherwise.
    /// The fixed assignments are enforced.
    ///
    /// The fixed assignments are checked before any variable is created.
    pub fn build(
        model: &mut Model,
        n_employees: usize,
        shifts: &ShiftDomain,
        horizon: &PlanningHorizon,
        hours_domain: &HoursDomain,
        fixed_assignments: &[FixedAssignment],
    ) -> Result<ScheduleVars, ConfigurationError> {
        fixed_assignments.iter().try_for_each(|f| {
            check_index(f.employee, n_employees, |index, len| {
                ConfigurationError::EmployeeOutOfRange { index, len }
            })?;
            shifts.check(f.shift)?;
            horizon.check(f.day)
        })?;
        let n_shifts = shifts.n_shifts();
        let n_days = horizon.num_days();
        let mut work_vars = Vec::with_capacity(n_employees * n_shifts * n_days);
        for e in 0..n_employees {
            for s in 0..n_shifts {
                for d in 0..n_days {
                    work_vars.push(model.new_bool_var(format!("work{}_{}_{}", e, s, d)));
                }
            }
        }
        let work = WorkGrid {
            n_employees,
            n_shifts,
            n_days,
            vars: work_vars,
        };
        let hours_values = hours_domain
            .values()
            .iter()
            .map(|h| *h as i64)
            .collect::<Vec<_>>();
        let mut hours_vars = Vec::with_capacity(n_employees * n_days);
        for e in 0..n_employees {
            for d in 0..n_days {
                hours_vars.push(
                    model.new_int_var_from_values(hours_values.clone(), format!("workhours{}_{}", e, d)),
                );
            }
        }
        let hours = HoursGrid {
            n_employees,
            n_days,
            vars: hours_vars,
        };
        for e in 0..n_employees {
            for d in 0..n_days {
                model.add_linear(LinearExpr::sum(&work.day_vars(e, d)?), Relation::Eq, 1);
                let off = work.get(e, 0, d)?;
                let h = hours.get(e, d)?;
                model.add_implication(
                    lit(off),
                    LinearConstraint::new(LinearExpr::from(h), Relation::Eq, 0),
                );
                model.add_implication(
                    not(off),
                    LinearConstraint::new(LinearExpr::from(h), Relation::Ge, 1),
                );
            }
        }
        for f in fixed_assignments {
            model.add_linear(
                LinearExpr::from(work.get(f.employee, f.shift, f.day)?),
                Relation::Eq,
                1,
            );
        }
        Ok(ScheduleVars { work, hours })
    }
}
