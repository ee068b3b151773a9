//! Behavior planner: cost-based lane selection
//!
//! Runs only on cycles where the traffic digest raised "too close";
//! otherwise the target lane holds. Candidates are the current lane and
//! its immediate neighbors, scored by a lane-change penalty, a saturating
//! speed term, and a collision-proximity term, with the strictly cheapest
//! candidate winning.

use tracing::debug;

use crate::common::TrackedVehicle;
use crate::planning::config::PlannerConfig;
use crate::planning::traffic::TrafficDigest;

/// Flat penalty for leaving the working lane
const LANE_CHANGE_PENALTY: f64 = 1000.0;
/// Scale applied to both saturating cost terms
const COST_SCALE: f64 = 1000.0;
/// Fixed penalty when the nearest gap is inside the safety buffer
const COLLISION_PENALTY: f64 = 1e4;
/// Cost a candidate must beat before it is ever selected
const INITIAL_BEST_COST: f64 = 5000.0;
/// Nearest-gap accumulator start value [road units]
const NEAREST_INIT: f64 = 5000.0;

/// Logistic squash of an unbounded scalar into (-1, 1). Both the speed and
/// proximity cost terms go through this exact shape; it sets their weight
/// relative to the flat penalties.
pub fn saturate(x: f64) -> f64 {
    2.0 / (1.0 + (-x).exp()) - 1.0
}

/// Pick the target lane for this cycle.
///
/// The working lane is updated the moment a candidate beats the running
/// best, so candidates evaluated later are scored against the updated
/// working lane: both the lane-change penalty and the collision scan's
/// lane filter follow it. Comparison is strict, so ties keep the earlier
/// winner.
pub fn select_target_lane(
    current_lane: usize,
    digest: &TrafficDigest,
    vehicles: &[TrackedVehicle],
    ego_s: f64,
    leftover_count: usize,
    config: &PlannerConfig,
) -> usize {
    let last_lane = config.lane_count.saturating_sub(1);
    let lo = current_lane.saturating_sub(1);
    let hi = (current_lane + 1).min(last_lane);

    let mut working_lane = current_lane;
    let mut best_lane = current_lane;
    let mut best_cost = INITIAL_BEST_COST;

    for candidate in lo..=hi {
        let mut cost = 0.0;

        if candidate != working_lane {
            cost += LANE_CHANGE_PENALTY;
        }

        let lane_avg = digest.lane_speeds[candidate];
        cost += saturate(2.0 * (lane_avg - config.cruise_speed / lane_avg)) * COST_SCALE;

        cost += proximity_cost(vehicles, working_lane, ego_s, leftover_count, config);

        debug!(candidate, cost, best_cost, "lane candidate scored");

        if cost < best_cost {
            best_lane = candidate;
            best_cost = cost;
            working_lane = candidate;
        }
    }

    best_lane
}

/// Collision-proximity term: the nearest absolute longitudinal gap to any
/// vehicle in `lane`, measured both now and at the projected end of the
/// unconsumed trajectory, squashed against the safety buffer.
fn proximity_cost(
    vehicles: &[TrackedVehicle],
    lane: usize,
    ego_s: f64,
    leftover_count: usize,
    config: &PlannerConfig,
) -> f64 {
    let mut nearest = NEAREST_INIT;

    for vehicle in vehicles {
        if config.lane_index(vehicle.d) != Some(lane) {
            continue;
        }
        let start_s = vehicle.s;
        let end_s =
            start_s + leftover_count as f64 * config.cycle_duration * vehicle.speed();

        nearest = nearest.min((start_s - ego_s).abs());
        nearest = nearest.min((end_s - ego_s).abs());
    }

    let mut cost = 0.0;
    if nearest < config.safety_buffer {
        cost += COLLISION_PENALTY;
    }
    cost + saturate(2.0 * config.safety_buffer / nearest) * COST_SCALE
}
