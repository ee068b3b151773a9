//! Common types used throughout highway_planner

use serde::{Deserialize, Serialize};

use crate::common::error::{PlannerError, PlannerResult};

/// 2D point representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl From<(f64, f64)> for Point2D {
    fn from(tuple: (f64, f64)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}

/// Road-relative coordinates: arc length along the reference path and
/// signed lateral offset from it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrenetCoord {
    pub s: f64,
    pub d: f64,
}

impl FrenetCoord {
    pub fn new(s: f64, d: f64) -> Self {
        Self { s, d }
    }
}

/// One row of the reference path table: position, cumulative arc length
/// and the lateral unit normal at that point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceWaypoint {
    pub x: f64,
    pub y: f64,
    pub s: f64,
    pub dx: f64,
    pub dy: f64,
}

impl ReferenceWaypoint {
    pub fn new(x: f64, y: f64, s: f64, dx: f64, dy: f64) -> Self {
        Self { x, y, s, dx, dy }
    }

    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// Ego vehicle state for one planning cycle, read-only within the cycle.
/// Heading is in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehiclePose {
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
    pub s: f64,
    pub d: f64,
    pub speed: f64,
}

impl VehiclePose {
    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// A nearby vehicle reported by sensor fusion, transient per cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedVehicle {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub s: f64,
    pub d: f64,
}

impl TrackedVehicle {
    pub fn new(id: u64, x: f64, y: f64, vx: f64, vy: f64, s: f64, d: f64) -> Self {
        Self { id, x, y, vx, vy, s, d }
    }

    /// Speed magnitude of the velocity vector
    pub fn speed(&self) -> f64 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }
}

/// The only state carried across cycles: the current target lane and the
/// current target speed. Owned by the planning session; the lane is written
/// by the behavior planner and the speed by the velocity regulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerState {
    pub target_lane: usize,
    pub target_speed: f64,
}

impl PlannerState {
    pub fn new(target_lane: usize, target_speed: f64) -> Self {
        Self { target_lane, target_speed }
    }
}

/// Per-cycle input delivered by the transport layer. Schema only; the wire
/// encoding is the transport's concern. Heading arrives in degrees.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub x: f64,
    pub y: f64,
    pub s: f64,
    pub d: f64,
    pub yaw_deg: f64,
    pub speed: f64,
    /// Unconsumed waypoints from the previous cycle's output
    pub previous_path_x: Vec<f64>,
    pub previous_path_y: Vec<f64>,
    /// Road-relative end of the previous path
    pub end_path_s: f64,
    pub end_path_d: f64,
    pub tracked: Vec<TrackedVehicle>,
}

impl Snapshot {
    /// Check the snapshot is well formed. A failure skips the cycle and
    /// leaves the planner state untouched.
    pub fn validate(&self) -> PlannerResult<()> {
        if self.previous_path_x.len() != self.previous_path_y.len() {
            return Err(PlannerError::InvalidSnapshot(format!(
                "previous path lengths differ: {} vs {}",
                self.previous_path_x.len(),
                self.previous_path_y.len()
            )));
        }
        let ego = [self.x, self.y, self.s, self.d, self.yaw_deg, self.speed];
        if ego.iter().any(|v| !v.is_finite()) {
            return Err(PlannerError::InvalidSnapshot(
                "non-finite ego state".to_string(),
            ));
        }
        Ok(())
    }
}

/// Per-cycle output: parallel waypoint coordinate sequences, one fixed
/// cycle duration apart along the intended path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trajectory {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self { x: Vec::new(), y: Vec::new() }
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.x.push(x);
        self.y.push(y);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point2d_distance() {
        let p1 = Point2D::new(0.0, 0.0);
        let p2 = Point2D::new(3.0, 4.0);
        assert!((p1.distance(&p2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_tracked_vehicle_speed() {
        let v = TrackedVehicle::new(7, 0.0, 0.0, 3.0, 4.0, 100.0, 6.0);
        assert!((v.speed() - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_snapshot_validate_mismatched_paths() {
        let snapshot = Snapshot {
            previous_path_x: vec![0.0, 1.0],
            previous_path_y: vec![0.0],
            ..Snapshot::default()
        };
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_snapshot_validate_non_finite() {
        let snapshot = Snapshot {
            x: f64::NAN,
            ..Snapshot::default()
        };
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_trajectory_push() {
        let mut traj = Trajectory::new();
        traj.push(1.0, 2.0);
        traj.push(3.0, 4.0);
        assert_eq!(traj.len(), 2);
        assert!(!traj.is_empty());
        assert!((traj.y[1] - 4.0).abs() < 1e-12);
    }
}
