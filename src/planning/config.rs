//! Planner configuration
//!
//! Every tunable that is part of the external contract lives here; nothing
//! in the planning modules hard-wires these values.

use serde::{Deserialize, Serialize};

use crate::common::{PlannerError, PlannerResult};

/// Tunable constants for one planning session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Number of modeled lanes
    pub lane_count: usize,
    /// Lane band width [road units]
    pub lane_width: f64,
    /// Aggregate speed assigned to unoccupied lanes, and the default
    /// binding constraint speed [speed units]
    pub speed_ceiling: f64,
    /// Target speed the regulator approaches and never exceeds
    /// [speed units]
    pub cruise_speed: f64,
    /// Time between consecutive output waypoints [time units]
    pub cycle_duration: f64,
    /// Spacing of the lookahead anchor points [road units]
    pub lookahead_step: f64,
    /// Forward gap below which a leading vehicle is "too close"
    /// [road units]
    pub gap_threshold: f64,
    /// Longitudinal buffer for the collision cost term [road units]
    pub safety_buffer: f64,
    /// Output horizon: waypoint count per cycle
    pub horizon: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            lane_count: 3,
            lane_width: 4.0,
            speed_ceiling: 49.5,
            cruise_speed: 49.0,
            cycle_duration: 0.02,
            lookahead_step: 30.0,
            gap_threshold: 30.0,
            safety_buffer: 10.0,
            horizon: 50,
        }
    }
}

impl PlannerConfig {
    /// Reject configurations no session could plan with
    pub fn validate(&self) -> PlannerResult<()> {
        if self.lane_count == 0 {
            return Err(PlannerError::InvalidParameter(
                "lane_count must be at least 1".to_string(),
            ));
        }
        if self.lane_width <= 0.0 {
            return Err(PlannerError::InvalidParameter(format!(
                "lane_width must be positive, got {}",
                self.lane_width
            )));
        }
        if self.cycle_duration <= 0.0 {
            return Err(PlannerError::InvalidParameter(format!(
                "cycle_duration must be positive, got {}",
                self.cycle_duration
            )));
        }
        if self.lookahead_step <= 0.0 {
            return Err(PlannerError::InvalidParameter(format!(
                "lookahead_step must be positive, got {}",
                self.lookahead_step
            )));
        }
        if self.cruise_speed <= 0.0 || self.speed_ceiling <= 0.0 {
            return Err(PlannerError::InvalidParameter(
                "speed ceilings must be positive".to_string(),
            ));
        }
        if self.horizon == 0 {
            return Err(PlannerError::InvalidParameter(
                "horizon must be at least 1 waypoint".to_string(),
            ));
        }
        Ok(())
    }

    /// Lane index for a lateral offset, or None when the offset falls
    /// outside the modeled roadway. Lane `i` spans the half-open band
    /// [i * width, (i + 1) * width).
    pub fn lane_index(&self, d: f64) -> Option<usize> {
        let lane = (d / self.lane_width).floor();
        if lane >= 0.0 && lane < self.lane_count as f64 {
            Some(lane as usize)
        } else {
            None
        }
    }

    /// Lateral offset of a lane's center line
    pub fn lane_center(&self, lane: usize) -> f64 {
        self.lane_width / 2.0 + self.lane_width * lane as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(PlannerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_lanes() {
        let config = PlannerConfig {
            lane_count: 0,
            ..PlannerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_widths() {
        let config = PlannerConfig {
            lane_width: 0.0,
            ..PlannerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_lane_index_bands() {
        let config = PlannerConfig::default();
        assert_eq!(config.lane_index(0.0), Some(0));
        assert_eq!(config.lane_index(3.999), Some(0));
        assert_eq!(config.lane_index(4.0), Some(1));
        assert_eq!(config.lane_index(11.9), Some(2));
        assert_eq!(config.lane_index(12.0), None);
        assert_eq!(config.lane_index(-0.1), None);
    }

    #[test]
    fn test_lane_center() {
        let config = PlannerConfig::default();
        assert!((config.lane_center(0) - 2.0).abs() < 1e-12);
        assert!((config.lane_center(1) - 6.0).abs() < 1e-12);
        assert!((config.lane_center(2) - 10.0).abs() < 1e-12);
    }
}
