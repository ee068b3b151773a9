//! Reference path store
//!
//! Holds the closed, piecewise-linear centerline of the roadway as an
//! ordered waypoint table and answers the lookup queries the rest of the
//! planner is built on. Loaded once before any cycle runs; immutable
//! afterwards.

use itertools::Itertools;
use ordered_float::OrderedFloat;
use std::f64::consts::PI;

use crate::common::{Point2D, PlannerError, PlannerResult, ReferenceWaypoint};

/// Closed reference path: ordered waypoints plus the total loop length
/// `max_s` at which arc length wraps back to zero.
#[derive(Debug, Clone)]
pub struct ReferencePath {
    waypoints: Vec<ReferenceWaypoint>,
    /// Chord-length prefix sums: `cum_len[i]` is the summed segment length
    /// before waypoint `i`
    cum_len: Vec<f64>,
    max_s: f64,
    /// Off-path point fixing the sign convention of the lateral offset
    sign_reference: Point2D,
}

impl ReferencePath {
    /// Build the store from an already-parsed waypoint table. The on-disk
    /// format is the loader's concern, not this crate's.
    pub fn new(waypoints: Vec<ReferenceWaypoint>, max_s: f64) -> PlannerResult<Self> {
        if waypoints.len() < 2 {
            return Err(PlannerError::InvalidMap(format!(
                "reference path needs at least 2 waypoints, got {}",
                waypoints.len()
            )));
        }
        if !max_s.is_finite() || max_s <= 0.0 {
            return Err(PlannerError::InvalidMap(format!(
                "loop length must be positive and finite, got {}",
                max_s
            )));
        }

        let mut cum_len = Vec::with_capacity(waypoints.len());
        let mut acc = 0.0;
        cum_len.push(0.0);
        for (a, b) in waypoints.iter().tuple_windows() {
            acc += a.position().distance(&b.position());
            cum_len.push(acc);
        }

        Ok(Self {
            waypoints,
            cum_len,
            max_s,
            sign_reference: Point2D::new(1000.0, 2000.0),
        })
    }

    /// Override the off-path reference point used to resolve the sign of
    /// the lateral offset
    pub fn with_sign_reference(mut self, point: Point2D) -> Self {
        self.sign_reference = point;
        self
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn max_s(&self) -> f64 {
        self.max_s
    }

    pub fn sign_reference(&self) -> Point2D {
        self.sign_reference
    }

    pub fn waypoint(&self, i: usize) -> &ReferenceWaypoint {
        &self.waypoints[i]
    }

    pub fn waypoints(&self) -> &[ReferenceWaypoint] {
        &self.waypoints
    }

    /// Summed chord length of all segments before waypoint `i`
    pub(crate) fn cum_len(&self, i: usize) -> f64 {
        self.cum_len[i]
    }

    /// Index of the waypoint nearest to (x, y). Linear scan over the table.
    pub fn closest_waypoint(&self, x: f64, y: f64) -> usize {
        let here = Point2D::new(x, y);
        self.waypoints
            .iter()
            .enumerate()
            .min_by_key(|(_, wp)| OrderedFloat(here.distance(&wp.position())))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Index of the waypoint ahead of (x, y) for a vehicle with heading
    /// `theta`: the nearest waypoint, advanced by one (wrapping) when the
    /// bearing to it differs from the heading by more than 45 degrees.
    pub fn next_waypoint(&self, x: f64, y: f64, theta: f64) -> usize {
        let mut closest = self.closest_waypoint(x, y);
        let wp = &self.waypoints[closest];

        let heading = (wp.y - y).atan2(wp.x - x);
        let mut angle = (theta - heading).abs();
        angle = angle.min(2.0 * PI - angle);

        if angle > PI / 4.0 {
            closest += 1;
            if closest == self.waypoints.len() {
                closest = 0;
            }
        }

        closest
    }
}
