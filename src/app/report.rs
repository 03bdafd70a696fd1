use anyhow::{Context, Result};
use shift_compiler::{CompiledSchedule, SchedulingInstance, Solution};
use std::{io::Write, time::Duration};

const DAY_LETTERS: [char; 7] = ['M', 'T', 'W', 'T', 'F', 'S', 'S'];

/// Writes a human-readable report of a solution: the schedule, the worked hours and the paid penalties.
pub(crate) fn write_report(
    writer: &mut dyn Write,
    instance: &SchedulingInstance,
    compiled: &CompiledSchedule,
    solution: &Solution,
    wall_time: Duration,
) -> Result<()> {
    let context = "while writing the report";
    writeln!(writer, "status: {}", solution.status()).context(context)?;
    if let Some(objective) = solution.objective() {
        writeln!(writer, "objective: {}", objective).context(context)?;
    }
    if let Some(schedule) = compiled.decode(solution) {
        let name_width = instance
            .roster
            .iter()
            .map(|e| e.name().len())
            .max()
            .unwrap_or_default();
        let cell_width = (0..instance.shifts.n_shifts())
            .map(|s| instance.shifts.name(s).len())
            .max()
            .unwrap_or_default();
        writeln!(writer).context(context)?;
        write!(writer, "{:name_width$}", "").context(context)?;
        instance
            .horizon
            .days()
            .try_for_each(|d| write!(writer, " {:>cell_width$}", DAY_LETTERS[d % DAY_LETTERS.len()]))
            .context(context)?;
        writeln!(writer).context(context)?;
        for employee in instance.roster.iter() {
            write!(writer, "{:name_width$}", employee.name()).context(context)?;
            schedule
                .employee_shifts(employee.id())
                .iter()
                .try_for_each(|s| write!(writer, " {:>cell_width$}", instance.shifts.name(*s)))
                .context(context)?;
            writeln!(writer).context(context)?;
        }
        writeln!(writer).context(context)?;
        writeln!(writer, "worked hours:").context(context)?;
        for employee in instance.roster.iter() {
            writeln!(
                writer,
                "  {}: {} hours (contract: {} hours per week)",
                employee.name(),
                schedule.total_hours(employee.id()),
                employee.contract_weekly_hours()
            )
            .context(context)?;
        }
        writeln!(writer).context(context)?;
        writeln!(writer, "penalties:").context(context)?;
        for term in compiled.penalties().iter() {
            let value = solution.value(term.var());
            if value == 0 {
                continue;
            }
            let info = compiled.model().var_info(term.var());
            let line = if !info.is_boolean() {
                format!(
                    "  {} violated by {}, linear penalty {}",
                    info.name(),
                    value,
                    value * term.coefficient()
                )
            } else if term.coefficient() < 0 {
                format!("  {} fulfilled, gain {}", info.name(), -term.coefficient())
            } else {
                format!("  {} violated, penalty {}", info.name(), term.coefficient())
            };
            writeln!(writer, "{}", line).context(context)?;
        }
    }
    writeln!(writer).context(context)?;
    writeln!(writer, "statistics:").context(context)?;
    writeln!(writer, "  variables: {}", compiled.model().n_vars()).context(context)?;
    writeln!(writer, "  constraints: {}", compiled.model().n_constraints()).context(context)?;
    writeln!(writer, "  penalty terms: {}", compiled.penalties().len()).context(context)?;
    writeln!(writer, "  wall time: {:.3}s", wall_time.as_secs_f64()).context(context)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shift_compiler::{
        compile, CpSolver, Employee, FixedAssignment, HoursDomain, PlanningHorizon, Request,
        Roster, ShiftDomain, SolveStatus, Solver,
    };

    #[test]
    fn test_report() {
        let mut instance = SchedulingInstance::new(
            Roster::new(vec![Employee::new("Logan", 8), Employee::new("Dass", 8)]),
            ShiftDomain::new(vec!["O".into(), "M".into()]).unwrap(),
            PlanningHorizon::new(2).unwrap(),
        );
        instance.hours_domain = HoursDomain::new(vec![0, 8]).unwrap();
        instance.requests.push(Request {
            employee: 1,
            shift: 1,
            day: 1,
            weight: -3,
        });
        instance.fixed_assignments = vec![
            FixedAssignment {
                employee: 0,
                shift: 0,
                day: 0,
            },
            FixedAssignment {
                employee: 0,
                shift: 0,
                day: 1,
            },
            FixedAssignment {
                employee: 1,
                shift: 0,
                day: 0,
            },
        ];
        let compiled = compile(&instance).unwrap();
        let solution = CpSolver
            .solve(compiled.model(), Duration::from_secs(10))
            .unwrap();
        let mut buffer = Vec::new();
        write_report(&mut buffer, &instance, &compiled, &solution, Duration::ZERO).unwrap();
        let report = String::from_utf8(buffer).unwrap();
        let expected = r#"status: OPTIMAL
objective: -3

      M T
Logan O O
Dass  O M

worked hours:
  Logan: 0 hours (contract: 8 hours per week)
  Dass: 8 hours (contract: 8 hours per week)

penalties:
  work1_1_1 fulfilled, gain 3

statistics:
"#;
        assert!(report.starts_with(expected), "{}", report);
    }

    #[test]
    fn test_report_without_solution() {
        let instance = SchedulingInstance::new(
            Roster::new(vec![Employee::new("Logan", 8)]),
            ShiftDomain::new(vec!["O".into()]).unwrap(),
            PlanningHorizon::new(1).unwrap(),
        );
        let compiled = compile(&instance).unwrap();
        let solution = Solution::without_assignment(SolveStatus::Unknown);
        let mut buffer = Vec::new();
        write_report(&mut buffer, &instance, &compiled, &solution, Duration::ZERO).unwrap();
        let report = String::from_utf8(buffer).unwrap();
        assert!(report.starts_with("status: UNKNOWN\n\nstatistics:\n"));
    }
}
