use super::DAYS_PER_WEEK;
use crate::ConfigurationError;
use serde::Deserialize;

/// A table of minimal headcounts, with a row per day.
///
/// The table either has one row per day of the horizon, or one row per day of the week
/// (in which case the rows are repeated each week).
/// Columns are working shifts (the first column being shift 1) or experience levels, depending on the rule.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct DemandTable {
    rows: Vec<Vec<u32>>,
}

impl DemandTable {
    /// Builds a table from its rows, one per day.
    pub fn new(rows: Vec<Vec<u32>>) -> Self {
        Self { rows }
    }

    /// Returns the demand for a day and a column, given the number of days of the horizon.
    pub fn demand(&self, day: usize, column: usize, num_days: usize) -> Result<u32, ConfigurationError> {
        let row = if self.rows.len() == num_days {
            self.rows.get(day)
        } else if self.rows.len() == DAYS_PER_WEEK {
            self.rows.get(day % DAYS_PER_WEEK)
        } else {
            None
        };
        row.and_then(|r| r.get(column).copied())
            .ok_or(ConfigurationError::MissingDemand { day, column })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekly_rows() {
        let table = DemandTable::new((0..7).map(|d| vec![d, 10 + d]).collect());
        assert_eq!(Ok(3), table.demand(3, 0, 14));
        assert_eq!(Ok(13), table.demand(10, 1, 14));
        assert_eq!(
            Err(ConfigurationError::MissingDemand { day: 2, column: 2 }),
            table.demand(2, 2, 14)
        );
    }

    #[test]
    fn test_daily_rows() {
        let table = DemandTable::new(vec![vec![1], vec![2], vec![3]]);
        assert_eq!(Ok(3), table.demand(2, 0, 3));
        assert!(table.demand(2, 0, 4).is_err());
    }
}
