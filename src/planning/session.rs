//! Planning session
//!
//! One session per vehicle: owns the reference path, the configuration
//! and the cross-cycle planner state, and turns each snapshot into a
//! waypoint list. Cycles run strictly in arrival order; a malformed
//! snapshot skips its cycle with the state untouched.

use tracing::debug;

use crate::common::{PlannerError, PlannerResult, PlannerState, Snapshot, Trajectory, VehiclePose};
use crate::map::ReferencePath;
use crate::planning::behavior::select_target_lane;
use crate::planning::config::PlannerConfig;
use crate::planning::traffic::TrafficDigest;
use crate::planning::trajectory;
use crate::planning::velocity::regulate_speed;

/// A single vehicle's planning session
#[derive(Debug, Clone)]
pub struct PlanningSession {
    path: ReferencePath,
    config: PlannerConfig,
    state: PlannerState,
}

impl PlanningSession {
    pub fn new(
        path: ReferencePath,
        config: PlannerConfig,
        initial: PlannerState,
    ) -> PlannerResult<Self> {
        config.validate()?;
        if initial.target_lane >= config.lane_count {
            return Err(PlannerError::InvalidParameter(format!(
                "initial lane {} outside the {} modeled lanes",
                initial.target_lane, config.lane_count
            )));
        }
        Ok(Self { path, config, state: initial })
    }

    pub fn state(&self) -> &PlannerState {
        &self.state
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn reference_path(&self) -> &ReferencePath {
        &self.path
    }

    /// Run one planning cycle.
    ///
    /// On error the snapshot is rejected before any state is written, so a
    /// skipped cycle leaves the lane and speed exactly as the previous one
    /// set them; the transport layer maps the error to a "no plan" reply.
    pub fn step(&mut self, snapshot: &Snapshot) -> PlannerResult<Trajectory> {
        snapshot.validate()?;

        let pose = VehiclePose {
            x: snapshot.x,
            y: snapshot.y,
            yaw: snapshot.yaw_deg.to_radians(),
            s: snapshot.s,
            d: snapshot.d,
            speed: snapshot.speed,
        };

        // The new segment starts where the unconsumed leftovers end
        let leftover_count = snapshot.previous_path_x.len();
        let ego_s = if leftover_count > 0 {
            snapshot.end_path_s
        } else {
            snapshot.s
        };

        let digest = TrafficDigest::new(
            &snapshot.tracked,
            self.state.target_lane,
            ego_s,
            leftover_count,
            &self.config,
        );

        // Lane holds unless a leading vehicle forces a decision
        if digest.too_close {
            self.state.target_lane = select_target_lane(
                self.state.target_lane,
                &digest,
                &snapshot.tracked,
                ego_s,
                leftover_count,
                &self.config,
            );
        }

        regulate_speed(&mut self.state, &digest, &self.config);

        debug!(
            lane = self.state.target_lane,
            speed = self.state.target_speed,
            too_close = digest.too_close,
            "cycle planned"
        );

        Ok(trajectory::generate(
            &self.path,
            &pose,
            ego_s,
            &self.state,
            &snapshot.previous_path_x,
            &snapshot.previous_path_y,
            &self.config,
        ))
    }
}
