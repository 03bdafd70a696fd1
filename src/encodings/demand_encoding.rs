use super::SumEncoding;
use crate::{Bounds, ConfigurationError, LinearExpr, Model, PenaltyTerm, Relation, Variable};

/// Encodes a minimal headcount on the employees working a shift on a day.
pub struct CoverageEncoding;

impl CoverageEncoding {
    /// Constrains the number of true variables among `works` to be at least `min_demand`.
    ///
    /// `works` must contain one variable per eligible employee.
    /// The headcount is stored in an auxiliary variable which upper bound is the number of eligible employees,
    /// or `min_demand + max_over_demand` if it is lower.
    /// If `excess_rate` is positive, each employee above the demand costs `excess_rate`.
    ///
    /// A demand higher than the number of eligible employees is a configuration error; the day is used to report it.
    pub fn encode(
        model: &mut Model,
        works: &[Variable],
        day: usize,
        min_demand: u32,
        max_over_demand: Option<u32>,
        excess_rate: i64,
        prefix: &str,
    ) -> Result<Vec<PenaltyTerm>, ConfigurationError> {
        check_headcount(day, min_demand, works.len())?;
        let min_demand = min_demand as i64;
        let headcount = works.len() as i64;
        let ceiling = match max_over_demand {
            Some(m) => i64::min(headcount, min_demand + m as i64),
            None => headcount,
        };
        let worked = model.new_int_var(min_demand, ceiling, format!("{}: worked", prefix));
        model.add_linear(LinearExpr::sum(works).add_term(-1, worked), Relation::Eq, 0);
        if excess_rate <= 0 || ceiling == min_demand {
            return Ok(Vec::new());
        }
        let excess = model.new_int_var(0, ceiling - min_demand, format!("{}: excess", prefix));
        model.add_linear(
            LinearExpr::from(worked).add_term(-1, excess),
            Relation::Eq,
            min_demand,
        );
        Ok(vec![PenaltyTerm::new(excess, excess_rate)])
    }
}

/// Encodes a minimal headcount on the employees of an experience level working on a day.
pub struct ExperienceEncoding;

impl ExperienceEncoding {
    /// Constrains the number of true variables among `works` to be in `[demand, demand + max_over_demand]`,
    /// each employee above the demand costing `excess_cost`.
    ///
    /// `eligible` is the number of employees `works` refer to; a demand higher than this number is a configuration error.
    #[allow(clippy::too_many_arguments)]
    pub fn encode(
        model: &mut Model,
        works: &[Variable],
        eligible: usize,
        day: usize,
        demand: u32,
        max_over_demand: u32,
        excess_cost: i64,
        prefix: &str,
    ) -> Result<Vec<PenaltyTerm>, ConfigurationError> {
        check_headcount(day, demand, eligible)?;
        let demand = demand as i64;
        let bounds = Bounds::new(
            demand,
            demand,
            0,
            demand,
            demand + max_over_demand as i64,
            excess_cost,
        )?;
        Ok(SumEncoding::encode_bool_sum(model, works, &bounds, prefix))
    }
}

fn check_headcount(day: usize, demand: u32, headcount: usize) -> Result<(), ConfigurationError> {
    if demand as usize > headcount {
        return Err(ConfigurationError::DemandExceedsHeadcount {
            day,
            demand,
            headcount,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CpSolver, Penalties, SolveStatus, Solver};
    use std::time::Duration;

    fn bool_vars(model: &mut Model, n: usize) -> Vec<Variable> {
        (0..n).map(|i| model.new_bool_var(format!("w{}", i))).collect()
    }

    #[test]
    fn test_coverage_counts() {
        let mut model = Model::default();
        let works = bool_vars(&mut model, 4);
        let terms = CoverageEncoding::encode(&mut model, &works, 0, 2, None, 3, "cover").unwrap();
        assert_eq!(1, terms.len());
        let mut counts = Vec::new();
        let n = CpSolver
            .for_each_solution(&model, |values| {
                counts.push(values[..4].iter().sum::<i64>());
                assert_eq!(values[4] - 2, values[5]);
                true
            })
            .unwrap();
        assert_eq!(6 + 4 + 1, n);
        assert!(counts.iter().all(|c| *c >= 2));
    }

    #[test]
    fn test_coverage_objective() {
        let mut model = Model::default();
        let works = bool_vars(&mut model, 3);
        let terms = CoverageEncoding::encode(&mut model, &works, 0, 1, Some(1), 2, "cover").unwrap();
        model.add_linear(LinearExpr::sum(&works), Relation::Eq, 2);
        let mut penalties = Penalties::default();
        penalties.extend(terms);
        penalties.set_objective(&mut model);
        let solution = CpSolver.solve(&model, Duration::from_secs(10)).unwrap();
        assert_eq!(SolveStatus::Optimal, solution.status());
        assert_eq!(Some(2), solution.objective());
    }

    #[test]
    fn test_coverage_cap() {
        let mut model = Model::default();
        let works = bool_vars(&mut model, 3);
        let terms = CoverageEncoding::encode(&mut model, &works, 0, 1, Some(0), 5, "cover").unwrap();
        assert!(terms.is_empty());
        assert_eq!(3, CpSolver.for_each_solution(&model, |_| true).unwrap());
    }

    #[test]
    fn test_coverage_demand_too_high() {
        let mut model = Model::default();
        let works = bool_vars(&mut model, 2);
        assert_eq!(
            Err(ConfigurationError::DemandExceedsHeadcount {
                day: 4,
                demand: 3,
                headcount: 2
            }),
            CoverageEncoding::encode(&mut model, &works, 4, 3, None, 0, "cover")
        );
        assert_eq!(2, model.n_vars());
    }

    #[test]
    fn test_experience() {
        let mut model = Model::default();
        let works = bool_vars(&mut model, 6);
        let terms = ExperienceEncoding::encode(&mut model, &works, 6, 0, 1, 3, 5, "xp").unwrap();
        assert_eq!(1, terms.len());
        assert_eq!(5, terms[0].coefficient());
        let mut penalties = Penalties::default();
        penalties.extend(terms);
        for (n_working, expected) in [(0, None), (1, Some(0)), (3, Some(10)), (4, Some(15)), (5, None)] {
            let mut fixed = model.clone();
            works.iter().enumerate().for_each(|(i, w)| {
                fixed.add_linear(LinearExpr::from(*w), Relation::Eq, (i < n_working) as i64)
            });
            penalties.set_objective(&mut fixed);
            let solution = CpSolver.solve(&fixed, Duration::from_secs(10)).unwrap();
            assert_eq!(expected, solution.objective(), "{}", n_working);
        }
    }

    #[test]
    fn test_experience_demand_too_high() {
        let mut model = Model::default();
        let works = bool_vars(&mut model, 4);
        assert!(ExperienceEncoding::encode(&mut model, &works, 2, 1, 3, 3, 0, "xp").is_err());
    }
}
