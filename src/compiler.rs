use crate::{
    encodings::{
        CoverageEncoding, ExperienceEncoding, HoursEncoding, ScheduleVars, SpanEncoding,
        SumEncoding, TransitionEncoding, VariableFactory,
    },
    ConfigurationError, HoursPolicy, Model, Penalties, PenaltyTerm, SchedulingInstance,
    ShiftSelector, Solution, Variable,
};
use itertools::iproduct;
use tracing::{debug, info};

/// A scheduling instance compiled into a constraint model.
#[derive(Clone, Debug)]
pub struct CompiledSchedule {
    model: Model,
    vars: ScheduleVars,
    penalties: Penalties,
}

impl CompiledSchedule {
    /// The model to hand to a [`Solver`](crate::Solver).
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The work and hours variables.
    pub fn vars(&self) -> &ScheduleVars {
        &self.vars
    }

    /// The terms of the objective function, in the order they were created.
    pub fn penalties(&self) -> &Penalties {
        &self.penalties
    }

    /// Reads the schedule from a solution of the model.
    ///
    /// Returns `None` if the solution comes with no assignment.
    pub fn decode(&self, solution: &Solution) -> Option<Schedule> {
        if !solution.status().is_solution_found() {
            return None;
        }
        let work = &self.vars.work;
        let hours = &self.vars.hours;
        let shifts = (0..work.n_employees())
            .map(|e| {
                (0..work.n_days())
                    .map(|d| {
                        (0..work.n_shifts())
                            .find(|s| work.get(e, *s, d).is_ok_and(|v| solution.value(v) != 0))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();
        let hours = (0..work.n_employees())
            .map(|e| {
                (0..work.n_days())
                    .map(|d| hours.get(e, d).map(|v| solution.value(v)).unwrap_or_default())
                    .collect()
            })
            .collect();
        Some(Schedule { shifts, hours })
    }
}

/// The shift and the number of hours of each employee on each day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    shifts: Vec<Vec<usize>>,
    hours: Vec<Vec<i64>>,
}

impl Schedule {
    /// The shifts of an employee, ordered by day.
    pub fn employee_shifts(&self, employee: usize) -> &[usize] {
        &self.shifts[employee]
    }

    /// The number of hours an employee works on each day.
    pub fn employee_hours(&self, employee: usize) -> &[i64] {
        &self.hours[employee]
    }

    /// The number of hours an employee works over the whole horizon.
    pub fn total_hours(&self, employee: usize) -> i64 {
        self.hours[employee].iter().sum()
    }
}

/// Compiles a scheduling instance into a constraint model which objective is the sum of the penalties.
///
/// The whole instance is checked before the model is built.
pub fn compile(instance: &SchedulingInstance) -> Result<CompiledSchedule, ConfigurationError> {
    instance.validate()?;
    let mut model = Model::default();
    let mut penalties = Penalties::default();
    let vars = VariableFactory::build(
        &mut model,
        instance.roster.len(),
        &instance.shifts,
        &instance.horizon,
        &instance.hours_domain,
        &instance.fixed_assignments,
    )?;
    debug!(
        "created the decision variables of {} employees, {} shifts and {} days",
        instance.roster.len(),
        instance.shifts.n_shifts(),
        instance.horizon.num_days()
    );
    for r in &instance.requests {
        penalties.push(PenaltyTerm::new(
            vars.work.get(r.employee, r.shift, r.day)?,
            r.weight,
        ));
    }
    encode_span_rules(instance, &vars, &mut model, &mut penalties)?;
    encode_sum_rules(instance, &vars, &mut model, &mut penalties)?;
    encode_transitions(instance, &vars, &mut model, &mut penalties)?;
    encode_coverage(instance, &vars, &mut model, &mut penalties)?;
    encode_experience(instance, &vars, &mut model, &mut penalties)?;
    encode_hours(instance, &vars, &mut model, &mut penalties)?;
    penalties.set_objective(&mut model);
    info!(
        "compiled a model with {} variables, {} constraints and {} penalty terms",
        model.n_vars(),
        model.n_constraints(),
        penalties.len()
    );
    Ok(CompiledSchedule {
        model,
        vars,
        penalties,
    })
}

fn encode_span_rules(
    instance: &SchedulingInstance,
    vars: &ScheduleVars,
    model: &mut Model,
    penalties: &mut Penalties,
) -> Result<(), ConfigurationError> {
    for (rule, e) in iproduct!(&instance.rules.span_rules, 0..instance.roster.len()) {
        let works = vars.work.shift_sequence(e, rule.shift)?;
        let prefix = format!("shift_constraint(employee {}, shift {})", e, rule.shift);
        penalties.extend(SpanEncoding::encode(model, works, &rule.bounds, &prefix));
    }
    debug!("encoded {} span rules", instance.rules.span_rules.len());
    Ok(())
}

fn encode_sum_rules(
    instance: &SchedulingInstance,
    vars: &ScheduleVars,
    model: &mut Model,
    penalties: &mut Penalties,
) -> Result<(), ConfigurationError> {
    for rule in &instance.rules.sum_rules {
        let selected = match rule.shift {
            ShiftSelector::Shift(s) => s..s + 1,
            ShiftSelector::AnyWorking => instance.shifts.working_shifts(),
        };
        let windows = instance.window_days(rule.window);
        for (e, (w, days)) in iproduct!(0..instance.roster.len(), windows.iter().enumerate()) {
            let works = iproduct!(days.clone(), selected.clone())
                .map(|(d, s)| vars.work.get(e, s, d))
                .collect::<Result<Vec<Variable>, _>>()?;
            let prefix = format!(
                "sum_constraint(employee {}, shift {:?}, window {})",
                e, rule.shift, w
            );
            penalties.extend(SumEncoding::encode_bool_sum(
                model,
                &works,
                &rule.bounds,
                &prefix,
            ));
        }
    }
    debug!("encoded {} sum rules", instance.rules.sum_rules.len());
    Ok(())
}

fn encode_transitions(
    instance: &SchedulingInstance,
    vars: &ScheduleVars,
    model: &mut Model,
    penalties: &mut Penalties,
) -> Result<(), ConfigurationError> {
    for (t, e) in iproduct!(&instance.rules.transitions, 0..instance.roster.len()) {
        let previous = vars.work.shift_sequence(e, t.previous)?;
        let next = vars.work.shift_sequence(e, t.next)?;
        let prefix = format!("employee={}, {}->{}", e, t.previous, t.next);
        penalties.extend(TransitionEncoding::encode(
            model, previous, next, t.cost, &prefix,
        ));
    }
    debug!("encoded {} transition rules", instance.rules.transitions.len());
    Ok(())
}

fn encode_coverage(
    instance: &SchedulingInstance,
    vars: &ScheduleVars,
    model: &mut Model,
    penalties: &mut Penalties,
) -> Result<(), ConfigurationError> {
    let coverage = match &instance.rules.coverage {
        Some(c) => c,
        None => return Ok(()),
    };
    let num_days = instance.horizon.num_days();
    for (d, s) in iproduct!(instance.horizon.days(), instance.shifts.working_shifts()) {
        let demand = coverage.demands.demand(d, s - 1, num_days)?;
        let works = (0..instance.roster.len())
            .map(|e| vars.work.get(e, s, d))
            .collect::<Result<Vec<_>, _>>()?;
        let rate = coverage
            .excess_penalties
            .get(s - 1)
            .copied()
            .unwrap_or_default();
        let prefix = format!("excess_demand(shift={}, day={})", s, d);
        penalties.extend(CoverageEncoding::encode(
            model,
            &works,
            d,
            demand,
            coverage.max_over_demand,
            rate,
            &prefix,
        )?);
    }
    debug!("encoded the coverage demands");
    Ok(())
}

fn encode_experience(
    instance: &SchedulingInstance,
    vars: &ScheduleVars,
    model: &mut Model,
    penalties: &mut Penalties,
) -> Result<(), ConfigurationError> {
    let num_days = instance.horizon.num_days();
    let levels = instance.roster.levels();
    for rule in &instance.rules.experience {
        let shifts = match rule.shift {
            Some(s) => s..s + 1,
            None => instance.shifts.working_shifts(),
        };
        for (d, level) in iproduct!(instance.horizon.days(), levels.iter().copied()) {
            let employees = instance
                .roster
                .iter()
                .filter(|e| e.level() == level)
                .map(|e| e.id())
                .collect::<Vec<_>>();
            let demand = rule.demands.demand(d, level as usize, num_days)?;
            let works = iproduct!(employees.iter().copied(), shifts.clone())
                .map(|(e, s)| vars.work.get(e, s, d))
                .collect::<Result<Vec<_>, _>>()?;
            let prefix = match rule.shift {
                Some(s) => format!("experience(day={}, shift={}, level={})", d, s, level),
                None => format!("daily_experience(day={}, level={})", d, level),
            };
            penalties.extend(ExperienceEncoding::encode(
                model,
                &works,
                employees.len(),
                d,
                demand,
                rule.max_over_demand,
                rule.excess_cost,
                &prefix,
            )?);
        }
    }
    debug!("encoded {} experience rules", instance.rules.experience.len());
    Ok(())
}

fn encode_hours(
    instance: &SchedulingInstance,
    vars: &ScheduleVars,
    model: &mut Model,
    penalties: &mut Penalties,
) -> Result<(), ConfigurationError> {
    let rule = match &instance.rules.hours {
        Some(r) => r,
        None => return Ok(()),
    };
    let windows = instance.window_days(rule.window);
    for employee in instance.roster.iter() {
        let sequence = vars.hours.employee_sequence(employee.id())?;
        for (w, days) in windows.iter().enumerate() {
            let hours = &sequence[days.clone()];
            match rule.policy {
                HoursPolicy::Exact => {
                    HoursEncoding::encode_exact(model, hours, employee.contract_weekly_hours())
                }
                HoursPolicy::Overtime { rate } => {
                    let prefix = format!("overtime(employee {}, window {})", employee.id(), w);
                    penalties.extend(HoursEncoding::encode_overtime(
                        model,
                        hours,
                        employee.contract_weekly_hours(),
                        employee.maximum_overtime(),
                        rate,
                        &prefix,
                    )?);
                }
            }
        }
    }
    debug!("encoded the hours rule");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Bounds, CoverageRule, CpSolver, DemandTable, Employee, ExperienceRule, HoursDomain,
        HoursRule, LinearExpr, PlanningHorizon, Relation, Request, Roster, ShiftDomain,
        SolveStatus, Solver, SpanRule, SumRule, TransitionRule, Window,
    };
    use rustc_hash::FxHashSet;
    use std::time::Duration;

    fn instance(n_employees: usize, n_shifts: usize, n_days: usize) -> SchedulingInstance {
        let mut instance = SchedulingInstance::new(
            Roster::new(
                (0..n_employees)
                    .map(|e| Employee::new(format!("e{}", e), 40))
                    .collect(),
            ),
            ShiftDomain::new((0..n_shifts).map(|s| format!("S{}", s)).collect()).unwrap(),
            PlanningHorizon::new(n_days).unwrap(),
        );
        instance.hours_domain = HoursDomain::new(vec![0, 8]).unwrap();
        instance
    }

    fn enumerate_schedules(compiled: &CompiledSchedule) -> Vec<Schedule> {
        let mut schedules = Vec::new();
        CpSolver
            .for_each_solution(compiled.model(), |values| {
                let solution = Solution::new(SolveStatus::Optimal, values.to_vec(), compiled.model());
                schedules.extend(compiled.decode(&solution));
                true
            })
            .unwrap();
        schedules
    }

    #[test]
    fn test_nurses_one_per_cell() {
        let mut instance = instance(4, 4, 3);
        instance.rules.coverage = Some(CoverageRule {
            demands: DemandTable::new(vec![vec![1, 1, 1]; 3]),
            excess_penalties: vec![],
            max_over_demand: Some(0),
        });
        instance.rules.sum_rules.push(SumRule {
            shift: ShiftSelector::AnyWorking,
            window: Window::Horizon,
            bounds: Bounds::new(2, 2, 0, 3, 3, 0).unwrap(),
        });
        let compiled = compile(&instance).unwrap();
        let found = enumerate_schedules(&compiled)
            .into_iter()
            .map(|s| (0..4).map(|e| s.employee_shifts(e).to_vec()).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let found_set = found.iter().cloned().collect::<FxHashSet<_>>();
        assert_eq!(found.len(), found_set.len());
        let mut expected = FxHashSet::default();
        for code in 0..4_usize.pow(9) {
            let mut grid = vec![vec![0; 3]; 4];
            let mut valid = true;
            for cell in 0..9 {
                let nurse = (code / 4_usize.pow(cell as u32)) % 4;
                let (day, shift) = (cell / 3, 1 + cell % 3);
                if grid[nurse][day] != 0 {
                    valid = false;
                    break;
                }
                grid[nurse][day] = shift;
            }
            let in_bounds = grid
                .iter()
                .all(|days| (2..=3).contains(&days.iter().filter(|s| **s != 0).count()));
            if valid && in_bounds {
                expected.insert(grid);
            }
        }
        assert_eq!(5184, expected.len());
        assert_eq!(expected, found_set);
    }

    #[test]
    fn test_overtime_week() {
        let mut instance = instance(1, 2, 7);
        instance.roster = Roster::new(vec![Employee::new("a", 40).with_maximum_overtime(6)]);
        instance.hours_domain = HoursDomain::default();
        instance.rules.hours = Some(HoursRule {
            window: Window::Horizon,
            policy: HoursPolicy::Overtime { rate: 5 },
        });
        let compiled = compile(&instance).unwrap();
        let hours = compiled.vars().hours.employee_sequence(0).unwrap().to_vec();
        for code in 0..3_usize.pow(7) {
            let day_hours = (0..7)
                .map(|d| [0, 6, 8][(code / 3_usize.pow(d)) % 3])
                .collect::<Vec<i64>>();
            let mut model = compiled.model().clone();
            hours
                .iter()
                .zip(day_hours.iter())
                .for_each(|(v, h)| model.add_linear(LinearExpr::from(*v), Relation::Eq, *h));
            let solution = CpSolver.solve(&model, Duration::from_secs(60)).unwrap();
            let total = day_hours.iter().sum::<i64>();
            if (40..=46).contains(&total) {
                assert_eq!(SolveStatus::Optimal, solution.status(), "{:?}", day_hours);
                assert_eq!(Some(5 * (total - 40)), solution.objective(), "{:?}", day_hours);
            } else {
                assert_eq!(SolveStatus::Infeasible, solution.status(), "{:?}", day_hours);
            }
        }
    }

    #[test]
    fn test_forbidden_transition() {
        let mut instance = instance(1, 4, 3);
        instance.rules.transitions.push(TransitionRule {
            previous: 2,
            next: 3,
            cost: 0,
        });
        let compiled = compile(&instance).unwrap();
        let schedules = enumerate_schedules(&compiled);
        assert_eq!(64 - 8, schedules.len());
        assert!(schedules
            .iter()
            .all(|s| TransitionEncoding::occurrences(s.employee_shifts(0), 2, 3).is_empty()));
    }

    #[test]
    fn test_penalized_transition() {
        let mut instance = instance(1, 4, 3);
        instance.rules.transitions.push(TransitionRule {
            previous: 2,
            next: 3,
            cost: 4,
        });
        instance.requests = vec![
            Request {
                employee: 0,
                shift: 2,
                day: 0,
                weight: -5,
            },
            Request {
                employee: 0,
                shift: 3,
                day: 1,
                weight: -5,
            },
        ];
        let compiled = compile(&instance).unwrap();
        assert_eq!(4, compiled.penalties().len());
        let solution = CpSolver
            .solve(compiled.model(), Duration::from_secs(60))
            .unwrap();
        assert_eq!(SolveStatus::Optimal, solution.status());
        assert_eq!(Some(-6), solution.objective());
        let schedule = compiled.decode(&solution).unwrap();
        assert_eq!(&[2, 3], &schedule.employee_shifts(0)[..2]);
    }

    #[test]
    fn test_decode() {
        let mut instance = instance(2, 2, 2);
        instance.fixed_assignments = vec![
            crate::FixedAssignment {
                employee: 0,
                shift: 1,
                day: 0,
            },
            crate::FixedAssignment {
                employee: 1,
                shift: 0,
                day: 1,
            },
        ];
        instance.requests.push(Request {
            employee: 0,
            shift: 1,
            day: 1,
            weight: 1,
        });
        instance.requests.push(Request {
            employee: 1,
            shift: 1,
            day: 0,
            weight: -1,
        });
        let compiled = compile(&instance).unwrap();
        let solution = CpSolver
            .solve(compiled.model(), Duration::from_secs(60))
            .unwrap();
        let schedule = compiled.decode(&solution).unwrap();
        assert_eq!(&[1, 0], schedule.employee_shifts(0));
        assert_eq!(&[1, 0], schedule.employee_shifts(1));
        assert_eq!(&[8, 0], schedule.employee_hours(1));
        assert_eq!(8, schedule.total_hours(0));
        assert_eq!(
            None,
            compiled.decode(&Solution::without_assignment(SolveStatus::Infeasible))
        );
    }

    #[test]
    fn test_demand_exceeds_headcount() {
        let mut instance = instance(2, 2, 7);
        instance.rules.coverage = Some(CoverageRule {
            demands: DemandTable::new(vec![vec![1], vec![1], vec![3], vec![1], vec![1], vec![1], vec![1]]),
            excess_penalties: vec![],
            max_over_demand: None,
        });
        assert_eq!(
            ConfigurationError::DemandExceedsHeadcount {
                day: 2,
                demand: 3,
                headcount: 2
            },
            compile(&instance).unwrap_err()
        );
    }

    #[test]
    fn test_missing_demand() {
        let mut instance = instance(2, 3, 3);
        instance.rules.coverage = Some(CoverageRule {
            demands: DemandTable::new(vec![vec![1, 1], vec![1], vec![1, 1]]),
            excess_penalties: vec![],
            max_over_demand: None,
        });
        assert_eq!(
            ConfigurationError::MissingDemand { day: 1, column: 1 },
            compile(&instance).unwrap_err()
        );
    }

    #[test]
    fn test_weekly_sum_rule() {
        let mut instance = instance(1, 2, 14);
        instance.rules.sum_rules.push(SumRule {
            shift: ShiftSelector::Shift(1),
            window: Window::Weekly,
            bounds: Bounds::new(0, 5, 3, 5, 7, 2).unwrap(),
        });
        let compiled = compile(&instance).unwrap();
        assert_eq!(4, compiled.penalties().len());
        let names = compiled
            .penalties()
            .iter()
            .map(|t| compiled.model().var_info(t.var()).name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            "sum_constraint(employee 0, shift Shift(1), window 1): over_sum",
            names[3]
        );
        let solution = CpSolver
            .solve(compiled.model(), Duration::from_secs(60))
            .unwrap();
        assert_eq!(Some(0), solution.objective());
        let schedule = compiled.decode(&solution).unwrap();
        assert_eq!(5, schedule.employee_shifts(0)[..7].iter().filter(|s| **s == 1).count());
        assert_eq!(5, schedule.employee_shifts(0)[7..].iter().filter(|s| **s == 1).count());
    }

    fn leveled_roster() -> Roster {
        Roster::new(vec![
            Employee::new("junior0", 40).with_level(1),
            Employee::new("junior1", 40).with_level(1),
            Employee::new("senior", 40).with_level(2),
        ])
    }

    fn request(employee: usize, shift: usize, weight: i64) -> Request {
        Request {
            employee,
            shift,
            day: 0,
            weight,
        }
    }

    fn optimize(instance: &SchedulingInstance) -> (Solution, CompiledSchedule) {
        let compiled = compile(instance).unwrap();
        let solution = CpSolver
            .solve(compiled.model(), Duration::from_secs(60))
            .unwrap();
        (solution, compiled)
    }

    #[test]
    fn test_daily_experience() {
        let mut instance = instance(3, 2, 1);
        instance.roster = leveled_roster();
        instance.requests = (0..3).map(|e| request(e, 1, -10)).collect();
        instance.rules.experience.push(ExperienceRule {
            shift: None,
            demands: DemandTable::new(vec![vec![0, 1, 1]]),
            excess_cost: 4,
            max_over_demand: 1,
        });
        let (solution, compiled) = optimize(&instance);
        assert_eq!(SolveStatus::Optimal, solution.status());
        assert_eq!(Some(-30 + 4), solution.objective());
        let schedule = compiled.decode(&solution).unwrap();
        assert!((0..3).all(|e| schedule.employee_shifts(e) == [1]));
        instance.rules.experience[0].max_over_demand = 0;
        let (solution, compiled) = optimize(&instance);
        assert_eq!(SolveStatus::Optimal, solution.status());
        assert_eq!(Some(-20), solution.objective());
        let schedule = compiled.decode(&solution).unwrap();
        let juniors = (0..2).filter(|e| schedule.employee_shifts(*e) == [1]).count();
        assert_eq!(1, juniors);
        assert_eq!(&[1], schedule.employee_shifts(2));
    }

    #[test]
    fn test_shift_experience() {
        let mut instance = instance(3, 3, 1);
        instance.roster = leveled_roster();
        instance.requests = vec![request(0, 1, -10), request(2, 2, -10)];
        instance.rules.experience.push(ExperienceRule {
            shift: Some(2),
            demands: DemandTable::new(vec![vec![0, 2, 0]]),
            excess_cost: 0,
            max_over_demand: 0,
        });
        let (solution, compiled) = optimize(&instance);
        assert_eq!(SolveStatus::Optimal, solution.status());
        assert_eq!(Some(0), solution.objective());
        let schedule = compiled.decode(&solution).unwrap();
        assert_eq!(&[2], schedule.employee_shifts(0));
        assert_eq!(&[2], schedule.employee_shifts(1));
        assert_ne!(&[2], schedule.employee_shifts(2));
        instance.rules.experience[0].demands = DemandTable::new(vec![vec![0, 0, 2]]);
        assert_eq!(
            ConfigurationError::DemandExceedsHeadcount {
                day: 0,
                demand: 2,
                headcount: 1
            },
            compile(&instance).unwrap_err()
        );
    }

    #[test]
    fn test_span_rule() {
        let mut instance = instance(1, 2, 5);
        instance.rules.span_rules.push(SpanRule {
            shift: 1,
            bounds: Bounds::new(2, 2, 0, 3, 3, 0).unwrap(),
        });
        let compiled = compile(&instance).unwrap();
        let found = enumerate_schedules(&compiled)
            .into_iter()
            .map(|s| s.employee_shifts(0).to_vec())
            .collect::<FxHashSet<_>>();
        let expected = (0..32_usize)
            .map(|code| (0..5).map(|d| (code >> d) & 1).collect::<Vec<_>>())
            .filter(|shifts| {
                shifts
                    .split(|s| *s == 0)
                    .filter(|run| !run.is_empty())
                    .all(|run| (2..=3).contains(&run.len()))
            })
            .collect::<FxHashSet<_>>();
        assert_eq!(expected, found);
        let solution = CpSolver
            .solve(compiled.model(), Duration::from_secs(60))
            .unwrap();
        assert_eq!(SolveStatus::Optimal, solution.status());
        assert_eq!(Some(0), solution.objective());
    }

    #[test]
    fn test_weekly_exact_hours() {
        let mut instance = instance(1, 2, 14);
        instance.roster = Roster::new(vec![Employee::new("a", 16)]);
        instance.requests = (0..3)
            .map(|d| Request {
                employee: 0,
                shift: 1,
                day: d,
                weight: -1,
            })
            .collect();
        instance.rules.hours = Some(HoursRule {
            window: Window::Weekly,
            policy: HoursPolicy::Exact,
        });
        let (solution, compiled) = optimize(&instance);
        assert_eq!(SolveStatus::Optimal, solution.status());
        assert_eq!(Some(-2), solution.objective());
        let schedule = compiled.decode(&solution).unwrap();
        assert_eq!(16, schedule.employee_hours(0)[..7].iter().sum::<i64>());
        assert_eq!(16, schedule.employee_hours(0)[7..].iter().sum::<i64>());
        assert_eq!(2, schedule.employee_shifts(0)[7..].iter().filter(|s| **s == 1).count());
        instance.roster = Roster::new(vec![Employee::new("a", 20)]);
        let (solution, _) = optimize(&instance);
        assert_eq!(SolveStatus::Infeasible, solution.status());
    }
}
