use crate::ConfigurationError;
use serde::Deserialize;
use std::ops::Range;

/// The number of days of a week.
pub const DAYS_PER_WEEK: usize = 7;

/// The ordered set of shifts; the shift at index 0 is the off shift.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct ShiftDomain {
    names: Vec<String>,
}

impl ShiftDomain {
    /// Builds a shift domain from the names of the shifts, the first one being the off shift.
    pub fn new(names: Vec<String>) -> Result<Self, ConfigurationError> {
        if names.is_empty() {
            return Err(ConfigurationError::EmptyShiftDomain);
        }
        Ok(Self { names })
    }

    /// Returns the number of shifts, the off shift included.
    pub fn n_shifts(&self) -> usize {
        self.names.len()
    }

    /// Returns the indices of the working shifts.
    pub fn working_shifts(&self) -> Range<usize> {
        1..self.names.len()
    }

    /// Returns the name of a shift.
    pub fn name(&self, shift: usize) -> &str {
        &self.names[shift]
    }

    /// Checks the shift index is in range.
    pub fn check(&self, shift: usize) -> Result<(), ConfigurationError> {
        if shift >= self.names.len() {
            return Err(ConfigurationError::ShiftOutOfRange {
                index: shift,
                len: self.names.len(),
            });
        }
        Ok(())
    }

    /// Checks the shift index is in range and is not the off shift.
    pub fn check_working(&self, shift: usize) -> Result<(), ConfigurationError> {
        self.check(shift)?;
        if shift == 0 {
            return Err(ConfigurationError::OffShiftNotAllowed);
        }
        Ok(())
    }
}

impl TryFrom<Vec<String>> for ShiftDomain {
    type Error = ConfigurationError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        ShiftDomain::new(names)
    }
}

/// The days covered by a schedule.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "usize")]
pub struct PlanningHorizon {
    num_days: usize,
}

impl PlanningHorizon {
    /// Builds a horizon of the provided (positive) number of days.
    pub fn new(num_days: usize) -> Result<Self, ConfigurationError> {
        if num_days == 0 {
            return Err(ConfigurationError::EmptyHorizon);
        }
        Ok(Self { num_days })
    }

    /// Returns the number of days of the horizon.
    pub fn num_days(&self) -> usize {
        self.num_days
    }

    /// Returns the number of complete weeks of the horizon.
    pub fn num_weeks(&self) -> usize {
        self.num_days / DAYS_PER_WEEK
    }

    /// Returns the range of the day indices.
    pub fn days(&self) -> Range<usize> {
        0..self.num_days
    }

    /// Returns the days of the provided week.
    pub fn week_days(&self, week: usize) -> Range<usize> {
        week * DAYS_PER_WEEK..(week + 1) * DAYS_PER_WEEK
    }

    /// Checks the day index is in range.
    pub fn check(&self, day: usize) -> Result<(), ConfigurationError> {
        if day >= self.num_days {
            return Err(ConfigurationError::DayOutOfRange {
                index: day,
                len: self.num_days,
            });
        }
        Ok(())
    }

    /// Checks the horizon is made of whole weeks.
    pub fn check_weekly(&self) -> Result<(), ConfigurationError> {
        if self.num_days % DAYS_PER_WEEK != 0 {
            return Err(ConfigurationError::HorizonNotWeekly {
                num_days: self.num_days,
            });
        }
        Ok(())
    }
}

impl TryFrom<usize> for PlanningHorizon {
    type Error = ConfigurationError;

    fn try_from(num_days: usize) -> Result<Self, Self::Error> {
        PlanningHorizon::new(num_days)
    }
}

/// The legal lengths of a working day, in hours.
///
/// The domain contains 0 (the length of an off day) and at least one positive length.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<u32>")]
pub struct HoursDomain {
    values: Vec<u32>,
}

impl HoursDomain {
    /// Builds a domain from a set of lengths.
    pub fn new(mut values: Vec<u32>) -> Result<Self, ConfigurationError> {
        values.sort_unstable();
        values.dedup();
        let error = |reason| ConfigurationError::InvalidHoursDomain {
            values: values.clone(),
            reason,
        };
        if values.first() != Some(&0) {
            return Err(error("the domain must contain 0"));
        }
        if values.len() < 2 {
            return Err(error("the domain must contain a positive length"));
        }
        Ok(Self { values })
    }

    /// The legal lengths, in ascending order.
    pub fn values(&self) -> &[u32] {
        &self.values
    }
}

impl Default for HoursDomain {
    fn default() -> Self {
        Self {
            values: vec![0, 6, 8],
        }
    }
}

impl TryFrom<Vec<u32>> for HoursDomain {
    type Error = ConfigurationError;

    fn try_from(values: Vec<u32>) -> Result<Self, Self::Error> {
        HoursDomain::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_domain() {
        let shifts = ShiftDomain::new(vec!["O".into(), "M".into(), "A".into(), "C".into()]).unwrap();
        assert_eq!(4, shifts.n_shifts());
        assert_eq!(1..4, shifts.working_shifts());
        assert_eq!("A", shifts.name(2));
        assert!(shifts.check(3).is_ok());
        assert_eq!(
            Err(ConfigurationError::ShiftOutOfRange { index: 4, len: 4 }),
            shifts.check(4)
        );
        assert_eq!(Err(ConfigurationError::OffShiftNotAllowed), shifts.check_working(0));
        assert_eq!(Err(ConfigurationError::EmptyShiftDomain), ShiftDomain::new(vec![]));
    }

    #[test]
    fn test_horizon() {
        let horizon = PlanningHorizon::new(14).unwrap();
        assert_eq!(2, horizon.num_weeks());
        assert_eq!(7..14, horizon.week_days(1));
        assert!(horizon.check_weekly().is_ok());
        assert!(horizon.check(14).is_err());
        assert_eq!(
            Err(ConfigurationError::HorizonNotWeekly { num_days: 3 }),
            PlanningHorizon::new(3).unwrap().check_weekly()
        );
        assert_eq!(Err(ConfigurationError::EmptyHorizon), PlanningHorizon::new(0));
    }

    #[test]
    fn test_hours_domain() {
        assert_eq!(&[0, 6, 8], HoursDomain::new(vec![8, 0, 6, 6]).unwrap().values());
        assert!(HoursDomain::new(vec![6, 8]).is_err());
        assert!(HoursDomain::new(vec![0]).is_err());
        assert_eq!(&[0, 6, 8], HoursDomain::default().values());
    }

    #[test]
    fn test_deserialize() {
        assert!(serde_json::from_str::<PlanningHorizon>("0").is_err());
        assert_eq!(7, serde_json::from_str::<PlanningHorizon>("7").unwrap().num_days());
        assert!(serde_json::from_str::<ShiftDomain>("[]").is_err());
        assert!(serde_json::from_str::<HoursDomain>("[6, 8]").is_err());
    }
}
