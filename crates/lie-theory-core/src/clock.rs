//! Simulation clock for headless runs.
//!
//! The host normally owns time and passes `elapsed_time` into every tick. In
//! a headless run the clock plays that role: it counts ticks and accumulates
//! game seconds at a fixed step scaled by the speed multiplier.
//!
//! Elapsed game time is derived from the tick counter, never accumulated
//! independently, so it cannot drift.

use rust_decimal::Decimal;

use crate::config::SimulationConfig;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Invalid time configuration (e.g. a zero step).
    #[error("invalid time configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Tick counter plus the fixed step each tick represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickClock {
    /// Ticks completed so far.
    tick: u64,

    /// Game seconds per tick, before the speed multiplier.
    tick_seconds: Decimal,

    /// Host speed multiplier.
    speed_multiplier: Decimal,
}

impl TickClock {
    /// Create a clock at tick 0 from the simulation settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the step is not positive or
    /// the multiplier is negative.
    pub fn new(config: &SimulationConfig) -> Result<Self, ClockError> {
        Self::from_parts(0, config.tick_seconds, config.speed_multiplier)
    }

    /// Create a clock from explicit parameters (useful for testing and
    /// resuming from a snapshot).
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the step is not positive or
    /// the multiplier is negative.
    pub fn from_parts(
        tick: u64,
        tick_seconds: Decimal,
        speed_multiplier: Decimal,
    ) -> Result<Self, ClockError> {
        if tick_seconds <= Decimal::ZERO {
            return Err(ClockError::InvalidConfig {
                reason: "tick_seconds must be positive".to_owned(),
            });
        }
        if speed_multiplier.is_sign_negative() && !speed_multiplier.is_zero() {
            return Err(ClockError::InvalidConfig {
                reason: "speed_multiplier must not be negative".to_owned(),
            });
        }
        Ok(Self {
            tick,
            tick_seconds,
            speed_multiplier,
        })
    }

    /// Advance the clock by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Return the current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Game seconds per tick, passed to the theory as `elapsed_time`.
    pub const fn tick_seconds(&self) -> Decimal {
        self.tick_seconds
    }

    /// Host speed multiplier, passed to the theory as `multiplier`.
    pub const fn speed_multiplier(&self) -> Decimal {
        self.speed_multiplier
    }

    /// Game seconds elapsed so far, unscaled by the multiplier.
    ///
    /// Returns `None` if the product is not representable.
    pub fn elapsed_seconds(&self) -> Option<Decimal> {
        self.tick_seconds.checked_mul(Decimal::from(self.tick))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn new_clock_starts_at_zero() {
        let clock = TickClock::new(&SimulationConfig::default()).unwrap();
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.tick_seconds(), dec!(0.1));
        assert_eq!(clock.speed_multiplier(), dec!(1));
        assert_eq!(clock.elapsed_seconds(), Some(Decimal::ZERO));
    }

    #[test]
    fn advance_accumulates_time() {
        let mut clock = TickClock::from_parts(0, dec!(0.1), dec!(1)).unwrap();
        for _ in 0..25 {
            clock.advance().unwrap();
        }
        assert_eq!(clock.tick(), 25);
        assert_eq!(clock.elapsed_seconds(), Some(dec!(2.5)));
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(matches!(
            TickClock::from_parts(0, Decimal::ZERO, dec!(1)),
            Err(ClockError::InvalidConfig { .. })
        ));
        assert!(matches!(
            TickClock::from_parts(0, dec!(1), dec!(-1)),
            Err(ClockError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn overflow_detected() {
        let mut clock = TickClock::from_parts(u64::MAX, dec!(1), dec!(1)).unwrap();
        assert!(matches!(clock.advance(), Err(ClockError::TickOverflow)));
    }
}
