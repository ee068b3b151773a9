//! Trajectory generator
//!
//! Stitches the new cycle's waypoints onto the unconsumed tail of the
//! previous output: a continuity pair plus three Frenet lookahead anchors
//! define a cubic spline in a local frame aligned with the reference
//! heading, and the spline is sampled so the spacing matches the target
//! speed at the fixed cycle cadence.

use tracing::warn;

use crate::common::{PlannerState, Trajectory, VehiclePose};
use crate::map::ReferencePath;
use crate::planning::config::PlannerConfig;
use crate::planning::spline::CubicSpline;

/// Number of Frenet lookahead anchors past the continuity pair
const LOOKAHEAD_ANCHORS: usize = 3;

/// Build this cycle's output waypoint list.
///
/// `ego_s` is the arc length the new segment starts from (the end of the
/// leftovers when any exist). The leftovers are always re-emitted
/// unchanged ahead of any new samples; on numerically degenerate geometry
/// the leftovers alone are returned and the trajectory shape carries over
/// to the next cycle.
pub fn generate(
    path: &ReferencePath,
    pose: &VehiclePose,
    ego_s: f64,
    state: &PlannerState,
    prev_x: &[f64],
    prev_y: &[f64],
    config: &PlannerConfig,
) -> Trajectory {
    let prev_size = prev_x.len();

    // Reference pose for path continuity, plus the first two anchors
    let mut anchors_x: Vec<f64> = Vec::with_capacity(2 + LOOKAHEAD_ANCHORS);
    let mut anchors_y: Vec<f64> = Vec::with_capacity(2 + LOOKAHEAD_ANCHORS);

    let (ref_x, ref_y, ref_yaw);
    if prev_size < 2 {
        // Synthesize a predecessor one unit behind the pose so the spline
        // leaves the vehicle tangent to its heading
        ref_x = pose.x;
        ref_y = pose.y;
        ref_yaw = pose.yaw;
        anchors_x.push(pose.x - pose.yaw.cos());
        anchors_y.push(pose.y - pose.yaw.sin());
        anchors_x.push(pose.x);
        anchors_y.push(pose.y);
    } else {
        ref_x = prev_x[prev_size - 1];
        ref_y = prev_y[prev_size - 1];
        let ref_x_prev = prev_x[prev_size - 2];
        let ref_y_prev = prev_y[prev_size - 2];
        ref_yaw = (ref_y - ref_y_prev).atan2(ref_x - ref_x_prev);
        anchors_x.push(ref_x_prev);
        anchors_y.push(ref_y_prev);
        anchors_x.push(ref_x);
        anchors_y.push(ref_y);
    }

    // Lookahead anchors on the target lane center
    let target_d = config.lane_center(state.target_lane);
    for k in 1..=LOOKAHEAD_ANCHORS {
        let p = path.to_cartesian(ego_s + k as f64 * config.lookahead_step, target_d);
        anchors_x.push(p.x);
        anchors_y.push(p.y);
    }

    // Shift into the local frame: reference pose at the origin, reference
    // heading along +x, so the anchors are monotonic in local x
    for i in 0..anchors_x.len() {
        let shift_x = anchors_x[i] - ref_x;
        let shift_y = anchors_y[i] - ref_y;
        anchors_x[i] = shift_x * (-ref_yaw).cos() - shift_y * (-ref_yaw).sin();
        anchors_y[i] = shift_x * (-ref_yaw).sin() + shift_y * (-ref_yaw).cos();
    }

    // Previously unconsumed waypoints are re-emitted first, unchanged
    let mut out = Trajectory::with_capacity(config.horizon);
    for i in 0..prev_size {
        out.push(prev_x[i], prev_y[i]);
    }

    let spline = match CubicSpline::new(&anchors_x, &anchors_y) {
        Ok(spline) => spline,
        Err(err) => {
            warn!(%err, "degenerate anchor geometry, reusing previous trajectory");
            return out;
        }
    };

    // Sample spacing along the chord to the lookahead distance that
    // matches the target speed over one cycle per waypoint
    let target_x = config.lookahead_step;
    let target_y = spline.eval(target_x);
    let target_dist = (target_x * target_x + target_y * target_y).sqrt();
    let n_steps = target_dist / (config.cycle_duration * state.target_speed);
    if !n_steps.is_finite() || n_steps <= 0.0 {
        warn!(n_steps, "degenerate sample step, reusing previous trajectory");
        return out;
    }

    let mut x_add_on = 0.0;
    for _ in prev_size..config.horizon {
        let x_local = x_add_on + target_x / n_steps;
        let y_local = spline.eval(x_local);
        x_add_on = x_local;

        // Back to the global frame
        let x_point = x_local * ref_yaw.cos() - y_local * ref_yaw.sin() + ref_x;
        let y_point = x_local * ref_yaw.sin() + y_local * ref_yaw.cos() + ref_y;
        out.push(x_point, y_point);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ReferenceWaypoint;

    fn straight_path() -> ReferencePath {
        let waypoints = (0..30)
            .map(|i| {
                let x = 10.0 * i as f64;
                ReferenceWaypoint::new(x, 0.0, x, 0.0, -1.0)
            })
            .collect();
        ReferencePath::new(waypoints, 300.0).unwrap()
    }

    fn pose_at(x: f64, d: f64, speed: f64) -> VehiclePose {
        VehiclePose {
            x,
            y: -d,
            yaw: 0.0,
            s: x,
            d,
            speed,
        }
    }

    #[test]
    fn test_fills_exact_horizon_from_scratch() {
        let path = straight_path();
        let config = PlannerConfig::default();
        let state = PlannerState::new(0, 20.0);
        let pose = pose_at(50.0, 2.0, 20.0);
        let traj = generate(&path, &pose, 50.0, &state, &[], &[], &config);
        assert_eq!(traj.len(), 50);
    }

    #[test]
    fn test_leftovers_re_emitted_first() {
        let path = straight_path();
        let config = PlannerConfig::default();
        let state = PlannerState::new(0, 20.0);
        let pose = pose_at(50.0, 2.0, 20.0);
        let prev_x: Vec<f64> = (0..10).map(|i| 50.0 + 0.4 * i as f64).collect();
        let prev_y: Vec<f64> = vec![-2.0; 10];
        let end_s = prev_x[9];
        let traj = generate(&path, &pose, end_s, &state, &prev_x, &prev_y, &config);
        assert_eq!(traj.len(), 50);
        for i in 0..10 {
            assert!((traj.x[i] - prev_x[i]).abs() < 1e-12);
            assert!((traj.y[i] - prev_y[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_straight_continuation_stays_on_lane_center() {
        let path = straight_path();
        let config = PlannerConfig::default();
        let state = PlannerState::new(0, 20.0);
        let pose = pose_at(50.0, 2.0, 20.0);
        let traj = generate(&path, &pose, 50.0, &state, &[], &[], &config);
        // Lane 0 center is d = 2, which is y = -2 on this path
        for i in 0..traj.len() {
            assert!(
                (traj.y[i] + 2.0).abs() < 1e-6,
                "sample {} drifted to y = {}",
                i,
                traj.y[i]
            );
            assert!(traj.x[i] > 50.0);
        }
    }

    #[test]
    fn test_sample_spacing_matches_target_speed() {
        let path = straight_path();
        let config = PlannerConfig::default();
        let state = PlannerState::new(0, 20.0);
        let pose = pose_at(50.0, 2.0, 20.0);
        let traj = generate(&path, &pose, 50.0, &state, &[], &[], &config);
        // Straight geometry: every step advances cycle_duration * speed
        let expect = config.cycle_duration * state.target_speed;
        for w in traj.x.windows(2) {
            assert!(((w[1] - w[0]) - expect).abs() < 1e-6);
        }
    }

    #[test]
    fn test_full_leftover_produces_no_new_points() {
        let path = straight_path();
        let config = PlannerConfig::default();
        let state = PlannerState::new(0, 20.0);
        let pose = pose_at(50.0, 2.0, 20.0);
        let prev_x: Vec<f64> = (0..50).map(|i| 50.0 + 0.4 * i as f64).collect();
        let prev_y: Vec<f64> = vec![-2.0; 50];
        let traj = generate(&path, &pose, 70.0, &state, &prev_x, &prev_y, &config);
        assert_eq!(traj.len(), 50);
        assert!((traj.x[49] - prev_x[49]).abs() < 1e-12);
    }

    #[test]
    fn test_zero_speed_falls_back_to_leftovers() {
        let path = straight_path();
        let config = PlannerConfig::default();
        let state = PlannerState::new(0, 0.0);
        let pose = pose_at(50.0, 2.0, 0.0);
        let prev_x = vec![50.0, 50.4, 50.8];
        let prev_y = vec![-2.0; 3];
        let traj = generate(&path, &pose, 50.8, &state, &prev_x, &prev_y, &config);
        // Division by a zero target speed must not poison the output
        assert_eq!(traj.len(), 3);
        assert!((traj.x[2] - 50.8).abs() < 1e-12);
    }

    #[test]
    fn test_lane_change_converges_to_new_center() {
        let path = straight_path();
        let config = PlannerConfig::default();
        // Vehicle on lane 0 center, target lane 1
        let state = PlannerState::new(1, 20.0);
        let pose = pose_at(50.0, 2.0, 20.0);
        let traj = generate(&path, &pose, 50.0, &state, &[], &[], &config);
        assert_eq!(traj.len(), 50);
        // Early samples stay near the old center, the tail approaches the
        // new one (d = 6 -> y = -6)
        assert!(traj.y[0] > -3.0);
        let last = *traj.y.last().unwrap();
        assert!(last < -4.0, "tail at y = {} has not moved over", last);
    }
}
