//! Traffic digest
//!
//! Reduces the raw sensor-fusion list to the two aggregates the rest of
//! the cycle runs on: per-lane mean speeds and the ego-lane "too close"
//! signal with its binding constraint speed. Vehicles whose lateral offset
//! falls outside the modeled roadway are ignored everywhere, never treated
//! as an error.

use tracing::debug;

use crate::common::TrackedVehicle;
use crate::planning::config::PlannerConfig;

/// Per-lane aggregates plus the ego-lane proximity signal for one cycle
#[derive(Debug, Clone)]
pub struct TrafficDigest {
    /// Mean speed per lane; unoccupied lanes read as the speed ceiling
    pub lane_speeds: Vec<f64>,
    /// Tracked-vehicle count per lane
    pub lane_occupancy: Vec<usize>,
    /// A vehicle ahead in the ego lane is inside the gap threshold
    pub too_close: bool,
    /// Speed of the vehicle raising the signal; ceiling when none does
    pub constraint_speed: f64,
}

impl TrafficDigest {
    /// Digest one cycle's tracked vehicles.
    ///
    /// `ego_s` is the arc length the new trajectory will start from (the
    /// end of the unconsumed leftovers when any exist); each ego-lane
    /// vehicle is projected forward by `leftover_count` cycles of its own
    /// speed before the gap check so both positions refer to the same
    /// instant.
    pub fn new(
        vehicles: &[TrackedVehicle],
        ego_lane: usize,
        ego_s: f64,
        leftover_count: usize,
        config: &PlannerConfig,
    ) -> Self {
        let mut speed_sums = vec![0.0; config.lane_count];
        let mut lane_occupancy = vec![0usize; config.lane_count];

        for vehicle in vehicles {
            if let Some(lane) = config.lane_index(vehicle.d) {
                speed_sums[lane] += vehicle.speed();
                lane_occupancy[lane] += 1;
            }
        }

        let lane_speeds: Vec<f64> = speed_sums
            .iter()
            .zip(lane_occupancy.iter())
            .map(|(&sum, &n)| {
                if n == 0 {
                    // Free lane reads as the ceiling
                    config.speed_ceiling
                } else {
                    sum / n as f64
                }
            })
            .collect();

        let mut too_close = false;
        let mut constraint_speed = config.speed_ceiling;

        for vehicle in vehicles {
            if config.lane_index(vehicle.d) != Some(ego_lane) {
                continue;
            }
            let speed = vehicle.speed();
            let projected_s =
                vehicle.s + leftover_count as f64 * config.cycle_duration * speed;
            if projected_s > ego_s && (projected_s - ego_s) < config.gap_threshold {
                too_close = true;
                constraint_speed = speed;
            }
        }

        if too_close {
            debug!(
                ego_lane,
                constraint_speed, "vehicle ahead inside gap threshold"
            );
        }

        Self {
            lane_speeds,
            lane_occupancy,
            too_close,
            constraint_speed,
        }
    }
}
