//! Utility modules for highway_planner

pub mod visualization;

pub use visualization::{PathStyle, PointStyle, Visualizer};
