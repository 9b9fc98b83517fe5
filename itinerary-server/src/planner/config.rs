//! Engine configuration for the itinerary planner.

use chrono::Duration;

/// Largest accepted drive multiplier.
pub const MAX_DRIVE_MULTIPLIER: f64 = 10.0;

/// Most drive multipliers one request may list.
pub const MAX_DRIVE_MULTIPLIERS: usize = 5;

/// Upper bound for `max_ferry_options`.
pub const MAX_FERRY_OPTIONS: usize = 10;

/// Longest accepted disembark buffer (one day).
pub const MAX_DISEMBARK_MINS: u32 = 24 * 60;

/// Error returned when engine parameters are unusable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// No drive multipliers given
    #[error("at least one drive multiplier is required")]
    NoMultipliers,

    /// Multiplier is zero, negative, or not finite
    #[error("drive multiplier must be a positive finite number, got {0}")]
    InvalidMultiplier(f64),

    /// Multiplier above [`MAX_DRIVE_MULTIPLIER`]
    #[error("drive multiplier must be at most 10, got {0}")]
    MultiplierTooLarge(f64),

    /// More multipliers than [`MAX_DRIVE_MULTIPLIERS`]
    #[error("at most 5 drive multipliers are allowed, got {0}")]
    TooManyMultipliers(usize),

    /// Option cap below one
    #[error("max ferry options must be at least 1")]
    NoFerryOptions,

    /// Option cap above [`MAX_FERRY_OPTIONS`]
    #[error("max ferry options must be at most 10, got {0}")]
    TooManyFerryOptions(usize),

    /// Disembark buffer above [`MAX_DISEMBARK_MINS`]
    #[error("disembark time must be at most 1440 minutes, got {0}")]
    DisembarkTooLong(u32),
}

/// Configuration parameters for itinerary expansion.
///
/// Passed explicitly to every expansion, so engines with different
/// configurations can run side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Factors applied to drive durations on connecting segments
    /// (e.g. 1.5 for heavy traffic). The final segment of a route is
    /// always evaluated at 1.0 only.
    pub drive_multipliers: Vec<f64>,

    /// Time to get off a ferry, added to its scheduled arrival (minutes).
    pub disembark_time_mins: u32,

    /// Maximum number of scheduled trips offered for one stop pair.
    pub max_ferry_options: usize,
}

impl EngineConfig {
    /// Create a new configuration, validating it.
    pub fn new(
        drive_multipliers: Vec<f64>,
        disembark_time_mins: u32,
        max_ferry_options: usize,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            drive_multipliers,
            disembark_time_mins,
            max_ferry_options,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the parameters.
    ///
    /// The upper bounds keep every expansion within a fixed branching factor
    /// and every computed instant within the calendar.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.drive_multipliers.is_empty() {
            return Err(ConfigError::NoMultipliers);
        }
        if self.drive_multipliers.len() > MAX_DRIVE_MULTIPLIERS {
            return Err(ConfigError::TooManyMultipliers(self.drive_multipliers.len()));
        }
        for &m in &self.drive_multipliers {
            if !m.is_finite() || m <= 0.0 {
                return Err(ConfigError::InvalidMultiplier(m));
            }
            if m > MAX_DRIVE_MULTIPLIER {
                return Err(ConfigError::MultiplierTooLarge(m));
            }
        }
        if self.max_ferry_options == 0 {
            return Err(ConfigError::NoFerryOptions);
        }
        if self.max_ferry_options > MAX_FERRY_OPTIONS {
            return Err(ConfigError::TooManyFerryOptions(self.max_ferry_options));
        }
        if self.disembark_time_mins > MAX_DISEMBARK_MINS {
            return Err(ConfigError::DisembarkTooLong(self.disembark_time_mins));
        }
        Ok(())
    }

    /// Drive multipliers with duplicates removed, in first-seen order.
    pub fn unique_multipliers(&self) -> Vec<f64> {
        let mut unique: Vec<f64> = Vec::with_capacity(self.drive_multipliers.len());
        for &m in &self.drive_multipliers {
            if !unique.contains(&m) {
                unique.push(m);
            }
        }
        unique
    }

    /// Returns the disembark buffer as a Duration.
    pub fn disembark_time(&self) -> Duration {
        Duration::minutes(i64::from(self.disembark_time_mins))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            drive_multipliers: vec![1.0],
            disembark_time_mins: 0,
            max_ferry_options: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = EngineConfig::default();

        assert_eq!(config.drive_multipliers, vec![1.0]);
        assert_eq!(config.disembark_time_mins, 0);
        assert_eq!(config.max_ferry_options, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn custom_config() {
        let config = EngineConfig::new(vec![1.0, 1.5], 3, 2).unwrap();

        assert_eq!(config.drive_multipliers, vec![1.0, 1.5]);
        assert_eq!(config.disembark_time(), Duration::minutes(3));
        assert_eq!(config.max_ferry_options, 2);
    }

    #[test]
    fn unique_multipliers_keep_order() {
        let config = EngineConfig::new(vec![1.5, 1.0, 1.5, 2.0, 1.0], 0, 5).unwrap();
        assert_eq!(config.unique_multipliers(), vec![1.5, 1.0, 2.0]);
    }

    #[test]
    fn rejects_empty_multipliers() {
        assert_eq!(
            EngineConfig::new(Vec::new(), 0, 5),
            Err(ConfigError::NoMultipliers)
        );
    }

    #[test]
    fn rejects_bad_multipliers() {
        assert!(EngineConfig::new(vec![1.0, 0.0], 0, 5).is_err());
        assert!(EngineConfig::new(vec![-1.0], 0, 5).is_err());
        assert!(EngineConfig::new(vec![f64::INFINITY], 0, 5).is_err());
        assert!(EngineConfig::new(vec![f64::NAN], 0, 5).is_err());
    }

    #[test]
    fn rejects_zero_ferry_options() {
        assert_eq!(
            EngineConfig::new(vec![1.0], 0, 0),
            Err(ConfigError::NoFerryOptions)
        );
    }

    #[test]
    fn rejects_oversized_multipliers() {
        assert_eq!(
            EngineConfig::new(vec![1.0, 1e13], 0, 5),
            Err(ConfigError::MultiplierTooLarge(1e13))
        );
        assert!(EngineConfig::new(vec![MAX_DRIVE_MULTIPLIER], 0, 5).is_ok());
    }

    #[test]
    fn rejects_long_multiplier_lists() {
        let many: Vec<f64> = (1..=MAX_DRIVE_MULTIPLIERS + 1).map(|i| i as f64).collect();
        assert_eq!(
            EngineConfig::new(many, 0, 5),
            Err(ConfigError::TooManyMultipliers(MAX_DRIVE_MULTIPLIERS + 1))
        );

        let enough: Vec<f64> = (1..=MAX_DRIVE_MULTIPLIERS).map(|i| i as f64).collect();
        assert!(EngineConfig::new(enough, 0, 5).is_ok());
    }

    #[test]
    fn rejects_large_ferry_cap() {
        assert_eq!(
            EngineConfig::new(vec![1.0], 0, usize::MAX),
            Err(ConfigError::TooManyFerryOptions(usize::MAX))
        );
        assert!(EngineConfig::new(vec![1.0], 0, MAX_FERRY_OPTIONS).is_ok());
    }

    #[test]
    fn rejects_long_disembark() {
        assert_eq!(
            EngineConfig::new(vec![1.0], u32::MAX, 5),
            Err(ConfigError::DisembarkTooLong(u32::MAX))
        );
        assert!(EngineConfig::new(vec![1.0], MAX_DISEMBARK_MINS, 5).is_ok());
    }

    #[test]
    fn error_display() {
        assert_eq!(
            ConfigError::InvalidMultiplier(-2.0).to_string(),
            "drive multiplier must be a positive finite number, got -2"
        );
        assert_eq!(
            ConfigError::TooManyFerryOptions(50).to_string(),
            "max ferry options must be at most 10, got 50"
        );
    }
}
