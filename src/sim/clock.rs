//! Day/night clock
//!
//! The tornado only exists at night. Hours advance with simulation time and
//! wrap at midnight.

use serde::{Deserialize, Serialize};

use crate::wrap_hour;

/// Hour after which night begins
pub const DUSK_HOUR: f32 = 18.0;
/// Hour at which night ends
pub const DAWN_HOUR: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayPhase {
    Day,
    Night,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayClock {
    /// Hour of day in [0, 24)
    pub hour: f32,
    /// In-game hours per simulated second
    pub hours_per_second: f32,
}

impl DayClock {
    pub fn new(hour: f32, hours_per_second: f32) -> Self {
        Self {
            hour: wrap_hour(hour),
            hours_per_second,
        }
    }

    /// Advance by `dt` seconds, returning the new phase if it changed
    pub fn advance(&mut self, dt: f32) -> Option<DayPhase> {
        let before = self.phase();
        self.hour = wrap_hour(self.hour + dt * self.hours_per_second);
        let after = self.phase();
        (before != after).then_some(after)
    }

    pub fn phase(&self) -> DayPhase {
        phase_at(self.hour)
    }

    pub fn is_night(&self) -> bool {
        self.phase() == DayPhase::Night
    }
}

/// Phase for a given hour
pub fn phase_at(hour: f32) -> DayPhase {
    if hour > DUSK_HOUR || hour < DAWN_HOUR {
        DayPhase::Night
    } else {
        DayPhase::Day
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_boundaries() {
        assert_eq!(phase_at(12.0), DayPhase::Day);
        assert_eq!(phase_at(18.0), DayPhase::Day);
        assert_eq!(phase_at(18.01), DayPhase::Night);
        assert_eq!(phase_at(0.0), DayPhase::Night);
        assert_eq!(phase_at(5.99), DayPhase::Night);
        assert_eq!(phase_at(6.0), DayPhase::Day);
    }

    #[test]
    fn test_advance_wraps_midnight() {
        let mut clock = DayClock::new(23.9, 0.3);
        assert_eq!(clock.advance(1.0), None);
        assert!((clock.hour - 0.2).abs() < 1e-3);
        assert!(clock.is_night());
    }

    #[test]
    fn test_advance_reports_transitions() {
        let mut clock = DayClock::new(17.9, 0.3);
        assert_eq!(clock.advance(1.0), Some(DayPhase::Night));

        let mut clock = DayClock::new(5.9, 0.3);
        assert_eq!(clock.advance(1.0), Some(DayPhase::Day));
    }

    #[test]
    fn test_new_wraps_hour() {
        assert!((DayClock::new(26.0, 0.3).hour - 2.0).abs() < 1e-4);
        assert!((DayClock::new(-1.0, 0.3).hour - 23.0).abs() < 1e-4);
    }
}
