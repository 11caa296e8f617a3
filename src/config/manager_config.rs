//! Limits applied by a [`PoolManager`](crate::manager::PoolManager).

use serde::{Deserialize, Serialize};

use crate::domain::{MAX_TICK_SPACING, PIPS_DENOMINATOR};
use crate::error::{FlashError, Result};

/// Manager-wide limits.
///
/// # Validation
///
/// - `1 <= min_tick_spacing <= max_tick_spacing <= 32767`.
/// - `max_lp_fee` must not exceed 1 000 000 pips (100%).
/// - `max_swap_steps` must be greater than zero.
///
/// # Examples
///
/// ```
/// use hydra_flash::config::ManagerConfig;
///
/// let config = ManagerConfig::from_toml_str("max_lp_fee = 10000").expect("valid");
/// assert_eq!(config.max_lp_fee(), 10_000);
/// assert_eq!(config.min_tick_spacing(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManagerConfig {
    min_tick_spacing: i32,
    max_tick_spacing: i32,
    max_lp_fee: u32,
    max_swap_steps: u32,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            min_tick_spacing: 1,
            max_tick_spacing: MAX_TICK_SPACING,
            max_lp_fee: PIPS_DENOMINATOR,
            max_swap_steps: 8_192,
        }
    }
}

impl ManagerConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidConfiguration`] if a limit is out of
    /// range.
    pub fn new(
        min_tick_spacing: i32,
        max_tick_spacing: i32,
        max_lp_fee: u32,
        max_swap_steps: u32,
    ) -> Result<Self> {
        let config = Self {
            min_tick_spacing,
            max_tick_spacing,
            max_lp_fee,
            max_swap_steps,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a TOML document. Missing keys take their
    /// defaults; unknown keys are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidConfiguration`] if the document does not
    /// parse or a limit is out of range.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)
            .map_err(|e| FlashError::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidConfiguration`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| FlashError::InvalidConfiguration(e.to_string()))
    }

    /// Validates every limit.
    ///
    /// # Errors
    ///
    /// Returns [`FlashError::InvalidConfiguration`] naming the first
    /// violation.
    pub fn validate(&self) -> Result<()> {
        if self.min_tick_spacing < 1 {
            return Err(FlashError::InvalidConfiguration(
                "min_tick_spacing must be at least 1".to_owned(),
            ));
        }
        if self.max_tick_spacing < self.min_tick_spacing {
            return Err(FlashError::InvalidConfiguration(
                "max_tick_spacing must not be below min_tick_spacing".to_owned(),
            ));
        }
        if self.max_tick_spacing > MAX_TICK_SPACING {
            return Err(FlashError::InvalidConfiguration(format!(
                "max_tick_spacing must not exceed {MAX_TICK_SPACING}"
            )));
        }
        if self.max_lp_fee > PIPS_DENOMINATOR {
            return Err(FlashError::InvalidConfiguration(format!(
                "max_lp_fee must not exceed {PIPS_DENOMINATOR} pips"
            )));
        }
        if self.max_swap_steps == 0 {
            return Err(FlashError::InvalidConfiguration(
                "max_swap_steps must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }

    /// Smallest accepted tick spacing.
    #[must_use]
    pub const fn min_tick_spacing(&self) -> i32 {
        self.min_tick_spacing
    }

    /// Largest accepted tick spacing.
    #[must_use]
    pub const fn max_tick_spacing(&self) -> i32 {
        self.max_tick_spacing
    }

    /// Highest accepted LP fee in pips.
    #[must_use]
    pub const fn max_lp_fee(&self) -> u32 {
        self.max_lp_fee
    }

    /// Upper bound on curve segments walked by one swap.
    #[must_use]
    pub const fn max_swap_steps(&self) -> u32 {
        self.max_swap_steps
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ManagerConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.max_tick_spacing(), 32_767);
        assert_eq!(config.max_lp_fee(), 1_000_000);
        assert_eq!(config.max_swap_steps(), 8_192);
    }

    #[test]
    fn new_rejects_inverted_spacing_bounds() {
        let result = ManagerConfig::new(60, 10, 3_000, 100);
        assert!(matches!(result, Err(FlashError::InvalidConfiguration(_))));
    }

    #[test]
    fn new_rejects_zero_spacing_and_steps() {
        assert!(ManagerConfig::new(0, 10, 3_000, 100).is_err());
        assert!(ManagerConfig::new(1, 10, 3_000, 0).is_err());
        assert!(ManagerConfig::new(1, 40_000, 3_000, 10).is_err());
        assert!(ManagerConfig::new(1, 10, 1_000_001, 10).is_err());
    }

    #[test]
    fn toml_partial_document_uses_defaults() {
        let Ok(config) = ManagerConfig::from_toml_str("min_tick_spacing = 10\nmax_swap_steps = 64")
        else {
            panic!("valid toml");
        };
        assert_eq!(config.min_tick_spacing(), 10);
        assert_eq!(config.max_swap_steps(), 64);
        assert_eq!(config.max_lp_fee(), 1_000_000);
    }

    #[test]
    fn toml_rejects_unknown_keys_and_bad_limits() {
        assert!(ManagerConfig::from_toml_str("protocol_fee = 5").is_err());
        assert!(ManagerConfig::from_toml_str("max_swap_steps = 0").is_err());
        assert!(ManagerConfig::from_toml_str("max_lp_fee = \"high\"").is_err());
    }

    #[test]
    fn toml_round_trip() {
        let Ok(config) = ManagerConfig::new(2, 200, 50_000, 1_000) else {
            panic!("valid config");
        };
        let Ok(text) = config.to_toml_string() else {
            panic!("serializable");
        };
        assert_eq!(ManagerConfig::from_toml_str(&text), Ok(config));
    }
}
