use crate::ConfigurationError;
use serde::Deserialize;

/// Hard and soft bounds on a quantity (a run length, a sum), with the linear costs of the soft bounds.
///
/// Any value outside `[hard_min, hard_max]` is forbidden.
/// A value `v < soft_min` costs `min_cost × (soft_min - v)`, a value `v > soft_max` costs `max_cost × (v - soft_max)`.
/// The fields are checked at construction: `0 <= hard_min <= soft_min <= soft_max <= hard_max`, and the costs are non-negative.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BoundsFields")]
pub struct Bounds {
    hard_min: i64,
    soft_min: i64,
    min_cost: i64,
    soft_max: i64,
    hard_max: i64,
    max_cost: i64,
}

impl Bounds {
    /// Builds new bounds, checking their consistency.
    pub fn new(
        hard_min: i64,
        soft_min: i64,
        min_cost: i64,
        soft_max: i64,
        hard_max: i64,
        max_cost: i64,
    ) -> Result<Self, ConfigurationError> {
        let error = |reason| ConfigurationError::InvalidBounds {
            hard_min,
            soft_min,
            min_cost,
            soft_max,
            hard_max,
            max_cost,
            reason,
        };
        if hard_min < 0 {
            return Err(error("hard_min must be non-negative"));
        }
        if hard_min > soft_min || soft_min > soft_max || soft_max > hard_max {
            return Err(error("bounds must satisfy hard_min <= soft_min <= soft_max <= hard_max"));
        }
        if min_cost < 0 || max_cost < 0 {
            return Err(error("costs must be non-negative"));
        }
        Ok(Self {
            hard_min,
            soft_min,
            min_cost,
            soft_max,
            hard_max,
            max_cost,
        })
    }

    /// Builds bounds that only allow the provided value, with no soft part.
    pub fn exactly(value: u32) -> Self {
        let v = value as i64;
        Self {
            hard_min: v,
            soft_min: v,
            min_cost: 0,
            soft_max: v,
            hard_max: v,
            max_cost: 0,
        }
    }

    /// The lowest allowed value.
    pub fn hard_min(&self) -> i64 {
        self.hard_min
    }

    /// The lowest value that is not penalized.
    pub fn soft_min(&self) -> i64 {
        self.soft_min
    }

    /// The cost of each unit below `soft_min`.
    pub fn min_cost(&self) -> i64 {
        self.min_cost
    }

    /// The highest value that is not penalized.
    pub fn soft_max(&self) -> i64 {
        self.soft_max
    }

    /// The highest allowed value.
    pub fn hard_max(&self) -> i64 {
        self.hard_max
    }

    /// The cost of each unit above `soft_max`.
    pub fn max_cost(&self) -> i64 {
        self.max_cost
    }

    /// Returns `true` iff values below `soft_min` are allowed and charged.
    pub fn penalizes_under(&self) -> bool {
        self.soft_min > self.hard_min && self.min_cost > 0
    }

    /// Returns `true` iff values above `soft_max` are allowed and charged.
    pub fn penalizes_over(&self) -> bool {
        self.soft_max < self.hard_max && self.max_cost > 0
    }
}

#[derive(Deserialize)]
struct BoundsFields {
    hard_min: i64,
    soft_min: i64,
    #[serde(default)]
    min_cost: i64,
    soft_max: i64,
    hard_max: i64,
    #[serde(default)]
    max_cost: i64,
}

impl TryFrom<BoundsFields> for Bounds {
    type Error = ConfigurationError;

    fn try_from(f: BoundsFields) -> Result<Self, Self::Error> {
        Bounds::new(
            f.hard_min, f.soft_min, f.min_cost, f.soft_max, f.hard_max, f.max_cost,
        )
    }
}
