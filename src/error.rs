// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Probability Boundary Suite ("The Odds Lab") - Configuration Errors

//! Construction-time validation failures.
//!
//! Every simulator validates its configuration once, when it is built.
//! After that all transitions are plain arithmetic over validated state and
//! cannot fail, so this is the only error type in the crate.

/// A configuration that would produce NaN, a division by zero, or a
/// distribution that is not a distribution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("outcome '{label}' has weight {weight}, expected a value in [0, 1]")]
    WeightOutOfRange { label: String, weight: f64 },

    #[error("outcome weights sum to {0}, which exceeds 1")]
    WeightSumExceedsOne(f64),

    #[error("distribution table has no outcomes")]
    EmptyTable,

    #[error("pity threshold must be greater than zero")]
    NonPositiveThreshold,

    #[error("rare outcome index {index} is out of range for a table of {len} outcomes")]
    RareIndexOutOfRange { index: usize, len: usize },

    #[error("target trials is {0}, at least 2 are required")]
    TargetTrialsTooSmall(u64),

    #[error("costs must be finite and positive (expected {expected}, unit {unit})")]
    InvalidCost { expected: f64, unit: f64 },

    #[error("baseline probability {0} is outside [0, 100]")]
    BaselineOutOfRange(f64),

    #[error("no 5% critical value is tabulated for {0} categories")]
    UnsupportedCategoryCount(usize),

    #[error("hazard '{name}' has annual probability {p}, expected a value in [0, 1]")]
    ProbabilityOutOfRange { name: String, p: f64 },

    #[error("aggregate annual probability {0} exceeds 1")]
    AggregateExceedsOne(f64),

    #[error("parameter '{0}' must be finite")]
    NonFiniteParameter(&'static str),

    #[error("parameter '{0}' must be greater than zero")]
    NonPositiveParameter(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let e = ConfigError::WeightOutOfRange { label: "SSR".into(), weight: 1.5 };
        assert_eq!(e.to_string(), "outcome 'SSR' has weight 1.5, expected a value in [0, 1]");

        let e = ConfigError::TargetTrialsTooSmall(1);
        assert!(e.to_string().contains("at least 2"));
    }
}
