//! Velocity regulator
//!
//! Maintains the persistent target speed, one update per cycle: a
//! logarithmic decay while a leading vehicle or a slow lane binds, a
//! capped logarithmic approach toward the cruise ceiling otherwise, and a
//! small fixed settle step once the ceiling is reached.

use tracing::debug;

use crate::common::PlannerState;
use crate::planning::config::PlannerConfig;
use crate::planning::traffic::TrafficDigest;

/// Gain on both logarithmic speed terms
const LOG_GAIN: f64 = 0.2;
/// Offset in the approach term `LOG_GAIN * (LOG_OFFSET - ln v)`
const LOG_OFFSET: f64 = 5.0;
/// Decay applied at the ceiling to settle just below it [speed units]
const SETTLE_STEP: f64 = 0.124;

/// Update the target speed in place.
///
/// Runs after lane selection: the constraint check reads the lane the
/// behavior planner just settled on.
pub fn regulate_speed(
    state: &mut PlannerState,
    digest: &TrafficDigest,
    config: &PlannerConfig,
) {
    let v = state.target_speed;

    if digest.too_close {
        let lane_avg = digest.lane_speeds[state.target_lane];
        if v > lane_avg || v > digest.constraint_speed {
            let dec = LOG_GAIN * v.ln();
            state.target_speed = v - dec;
            debug!(dec, speed = state.target_speed, "decreasing target speed");
        }
    } else if v < config.cruise_speed {
        let gap = config.cruise_speed - v;
        let inc = (LOG_GAIN * (LOG_OFFSET - v.ln())).min(gap);
        state.target_speed = v + inc;
        debug!(inc, speed = state.target_speed, "increasing target speed");
    } else {
        state.target_speed = v - SETTLE_STEP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::TrackedVehicle;

    fn config() -> PlannerConfig {
        PlannerConfig::default()
    }

    fn free_road_digest() -> TrafficDigest {
        TrafficDigest::new(&[], 1, 100.0, 0, &config())
    }

    fn constrained_digest(leader_speed: f64) -> TrafficDigest {
        let leader = TrackedVehicle::new(1, 0.0, 0.0, leader_speed, 0.0, 115.0, 6.0);
        TrafficDigest::new(&[leader], 1, 100.0, 0, &config())
    }

    #[test]
    fn test_speed_climbs_toward_ceiling() {
        let cfg = config();
        let digest = free_road_digest();
        let mut state = PlannerState::new(1, 2.0);
        for _ in 0..500 {
            regulate_speed(&mut state, &digest, &cfg);
            assert!(state.target_speed > 0.0);
            assert!(state.target_speed <= cfg.cruise_speed + 1e-9);
        }
        // Settled at the ceiling, dipping at most one settle step below it
        assert!(state.target_speed > cfg.cruise_speed - 0.2);
    }

    #[test]
    fn test_increment_never_overshoots() {
        let cfg = config();
        let digest = free_road_digest();
        // One step away from the ceiling the increment is clipped to the gap
        let mut state = PlannerState::new(1, 48.9);
        regulate_speed(&mut state, &digest, &cfg);
        assert!(state.target_speed <= cfg.cruise_speed + 1e-12);
    }

    #[test]
    fn test_settles_at_ceiling() {
        let cfg = config();
        let digest = free_road_digest();
        let mut state = PlannerState::new(1, cfg.cruise_speed);
        regulate_speed(&mut state, &digest, &cfg);
        assert!((state.target_speed - (cfg.cruise_speed - 0.124)).abs() < 1e-12);
    }

    #[test]
    fn test_decays_when_faster_than_leader() {
        let cfg = config();
        let digest = constrained_digest(8.0);
        assert!(digest.too_close);
        let mut state = PlannerState::new(1, 30.0);
        regulate_speed(&mut state, &digest, &cfg);
        let expected = 30.0 - 0.2 * 30.0f64.ln();
        assert!((state.target_speed - expected).abs() < 1e-12);
    }

    #[test]
    fn test_holds_when_slower_than_leader() {
        let cfg = config();
        let digest = constrained_digest(8.0);
        // Already below both the lane average and the constraint speed
        let mut state = PlannerState::new(1, 5.0);
        regulate_speed(&mut state, &digest, &cfg);
        assert!((state.target_speed - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_decay_stays_positive() {
        let cfg = config();
        let digest = constrained_digest(0.5);
        let mut state = PlannerState::new(1, 30.0);
        for _ in 0..2000 {
            regulate_speed(&mut state, &digest, &cfg);
            assert!(state.target_speed > 0.0);
        }
        // The log decay has a fixed point at 1: it never drives the
        // target non-positive
        assert!(state.target_speed >= 1.0 - 1e-6);
    }
}
