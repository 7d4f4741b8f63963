//! Initial-condition commitment state
//!
//! A unit that entered the horizon on (or off) may still owe part of its
//! minimum up (or down) time. The outstanding amount is the *deficit*:
//!
//! ```text
//! initially on,  min_on  > hours  →  MustRun     { until: min_on  - hours }
//! initially off, min_off > hours  →  MustStayOff { until: min_off - hours }
//! otherwise                       →  Free
//! ```
//!
//! Hours `h` with `1 ≤ h < until` are forced. The forced window is strict:
//! a unit that has been on 2 hours with a 4-hour minimum is forced at
//! hour 1 only, and window constraints take over from hour 2.

use dauc_core::Generator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialCommitment {
    Free,
    MustRun { until: u32 },
    MustStayOff { until: u32 },
}

impl InitialCommitment {
    pub fn of(gen: &Generator) -> Self {
        let init = &gen.initial;
        if init.status && gen.min_on_hours > init.hours {
            InitialCommitment::MustRun {
                until: gen.min_on_hours - init.hours,
            }
        } else if !init.status && gen.min_off_hours > init.hours {
            InitialCommitment::MustStayOff {
                until: gen.min_off_hours - init.hours,
            }
        } else {
            InitialCommitment::Free
        }
    }

    /// Forced on/off state at 1-based `hour`, if any
    pub fn forced_at(&self, hour: usize) -> Option<bool> {
        match *self {
            InitialCommitment::MustRun { until } if hour >= 1 && hour < until as usize => Some(true),
            InitialCommitment::MustStayOff { until } if hour >= 1 && hour < until as usize => {
                Some(false)
            }
            _ => None,
        }
    }

    pub fn is_forced(&self, hour: usize) -> bool {
        self.forced_at(hour).is_some()
    }

    /// Forced hours within a horizon of `hours`
    pub fn forced_hours(&self, hours: usize) -> impl Iterator<Item = usize> + '_ {
        (1..=hours).filter(move |&h| self.is_forced(h))
    }
}

/// First and last hour covered by a minimum up/down window starting at `hour`.
///
/// Windows that would run past the horizon are truncated at `horizon`, and
/// the required count shrinks to the hours that remain.
pub fn window(hour: usize, min_hours: u32, horizon: usize) -> (usize, usize) {
    let min = min_hours as usize;
    if hour + min > horizon + 1 {
        (hour, horizon)
    } else {
        (hour, hour + min - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dauc_core::{BusId, CostBlock, GenId, InitialCondition, ReservePrices};

    fn unit(min_on: u32, min_off: u32, initial: InitialCondition) -> Generator {
        Generator {
            id: GenId::new(1),
            name: "G1".into(),
            bus: BusId::new(1),
            pmin_mw: 10.0,
            pmax_mw: vec![50.0; 6],
            blocks: [CostBlock::new(1.0, 10.0); 4],
            startup_cost: 0.0,
            shutdown_cost: 0.0,
            no_load_cost: 0.0,
            min_on_hours: min_on,
            min_off_hours: min_off,
            initial,
            ramp_rate_mw_per_min: 1.0,
            droop: 0.01,
            deadband_hz: 0.0,
            prices: ReservePrices::default(),
        }
    }

    #[test]
    fn test_must_run_forces_strictly_before_deficit() {
        let g = unit(4, 1, InitialCondition::online(2, 20.0));
        let state = InitialCommitment::of(&g);
        assert_eq!(state, InitialCommitment::MustRun { until: 2 });
        let forced: Vec<_> = state.forced_hours(6).collect();
        assert_eq!(forced, vec![1]);
        assert_eq!(state.forced_at(1), Some(true));
        assert_eq!(state.forced_at(2), None);
    }

    #[test]
    fn test_must_stay_off() {
        let g = unit(1, 5, InitialCondition::offline(1));
        let state = InitialCommitment::of(&g);
        assert_eq!(state, InitialCommitment::MustStayOff { until: 4 });
        assert_eq!(state.forced_hours(6).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(state.forced_at(3), Some(false));
    }

    #[test]
    fn test_satisfied_minimum_is_free() {
        let g = unit(3, 3, InitialCondition::online(3, 20.0));
        assert_eq!(InitialCommitment::of(&g), InitialCommitment::Free);
        let g = unit(0, 0, InitialCondition::offline(0));
        assert_eq!(InitialCommitment::of(&g), InitialCommitment::Free);
    }

    #[test]
    fn test_forced_off_ignores_min_on() {
        // no min-on restriction, but the unit still owes down time
        let g = unit(0, 3, InitialCondition::offline(1));
        assert_eq!(InitialCommitment::of(&g), InitialCommitment::MustStayOff { until: 2 });
    }

    #[test]
    fn test_window_truncation() {
        assert_eq!(window(1, 3, 4), (1, 3));
        assert_eq!(window(2, 3, 4), (2, 4));
        assert_eq!(window(3, 3, 4), (3, 4));
        assert_eq!(window(4, 1, 4), (4, 4));
    }
}
