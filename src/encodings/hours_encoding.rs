use super::SumEncoding;
use crate::{Bounds, ConfigurationError, LinearExpr, Model, PenaltyTerm, Relation, Variable};

/// Encodes the link between the worked hours of an employee and their contract.
pub struct HoursEncoding;

impl HoursEncoding {
    /// Constrains the sum of `hours` to be in `[contract, contract + max_overtime]`,
    /// each hour above the contract costing `rate`.
    ///
    /// With no overtime allowance, the sum must equal the contract and no penalty term is created.
    pub fn encode_overtime(
        model: &mut Model,
        hours: &[Variable],
        contract: u32,
        max_overtime: u32,
        rate: i64,
        prefix: &str,
    ) -> Result<Vec<PenaltyTerm>, ConfigurationError> {
        let contract = contract as i64;
        let bounds = Bounds::new(
            contract,
            contract,
            0,
            contract,
            contract + max_overtime as i64,
            rate,
        )?;
        Ok(SumEncoding::encode(
            model,
            LinearExpr::sum(hours),
            &bounds,
            prefix,
        ))
    }

    /// Constrains the sum of `hours` to equal the contract.
    pub fn encode_exact(model: &mut Model, hours: &[Variable], contract: u32) {
        model.add_linear(LinearExpr::sum(hours), Relation::Eq, contract as i64);
    }
}
