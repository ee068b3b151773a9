//! Cartesian <-> road-relative coordinate transform
//!
//! Both directions work on the piecewise-linear reference path: `to_frenet`
//! projects a Cartesian pose onto the bracketing segment, `to_cartesian`
//! walks the arc-length table and offsets along the segment normal. Both
//! are linear scans over the waypoint table and deterministic; the only
//! failure mode (an empty table) is fatal at `ReferencePath` construction,
//! not here.

use std::f64::consts::PI;

use crate::common::{FrenetCoord, Point2D};
use crate::map::reference_path::ReferencePath;

impl ReferencePath {
    /// Transform a Cartesian pose into road-relative (s, d) coordinates.
    ///
    /// `theta` is the vehicle heading in radians; it disambiguates which of
    /// the two segments touching the nearest waypoint the vehicle is on.
    pub fn to_frenet(&self, x: f64, y: f64, theta: f64) -> FrenetCoord {
        let next_wp = self.next_waypoint(x, y, theta);
        let prev_wp = if next_wp == 0 { self.len() - 1 } else { next_wp - 1 };

        let prev = self.waypoint(prev_wp).position();
        let next = self.waypoint(next_wp).position();

        let n_x = next.x - prev.x;
        let n_y = next.y - prev.y;
        let x_x = x - prev.x;
        let x_y = y - prev.y;

        // Projection of the position offset onto the segment direction.
        // A zero-length segment would divide by zero; project to the
        // segment start instead.
        let denom = n_x * n_x + n_y * n_y;
        let proj_norm = if denom > f64::EPSILON {
            (x_x * n_x + x_y * n_y) / denom
        } else {
            0.0
        };
        let proj_x = proj_norm * n_x;
        let proj_y = proj_norm * n_y;

        let pos = Point2D::new(x_x, x_y);
        let proj = Point2D::new(proj_x, proj_y);
        let mut frenet_d = pos.distance(&proj);

        // Resolve the sign of d against a fixed point off the path: being
        // closer to it than the projection means negative d.
        let reference = self.sign_reference();
        let center = Point2D::new(reference.x - prev.x, reference.y - prev.y);
        let center_to_pos = center.distance(&pos);
        let center_to_ref = center.distance(&proj);
        if center_to_pos <= center_to_ref {
            frenet_d = -frenet_d;
        }

        let frenet_s = self.cum_len(prev_wp) + Point2D::origin().distance(&proj);

        FrenetCoord::new(frenet_s, frenet_d)
    }

    /// Transform road-relative (s, d) back to Cartesian coordinates.
    ///
    /// `s` is folded into [0, max_s) first, so lookahead offsets past the
    /// end of the loop land near its start instead of running off the table.
    pub fn to_cartesian(&self, s: f64, d: f64) -> Point2D {
        let s = s.rem_euclid(self.max_s());

        let mut prev_wp = 0;
        while prev_wp < self.len() - 1 && s > self.waypoint(prev_wp + 1).s {
            prev_wp += 1;
        }
        let wp2 = (prev_wp + 1) % self.len();

        let prev = self.waypoint(prev_wp);
        let next = self.waypoint(wp2);

        let heading = (next.y - prev.y).atan2(next.x - prev.x);
        let seg_s = s - prev.s;

        let seg_x = prev.x + seg_s * heading.cos();
        let seg_y = prev.y + seg_s * heading.sin();

        let perp_heading = heading - PI / 2.0;
        Point2D::new(
            seg_x + d * perp_heading.cos(),
            seg_y + d * perp_heading.sin(),
        )
    }
}
