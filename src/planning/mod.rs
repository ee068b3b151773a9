//! Planning pipeline: per-cycle traffic digestion, lane selection, speed
//! regulation and trajectory synthesis, orchestrated by the session

pub mod config;
pub mod traffic;
pub mod behavior;
pub mod velocity;
pub mod spline;
pub mod trajectory;
pub mod session;

pub use config::PlannerConfig;
pub use traffic::TrafficDigest;
pub use session::PlanningSession;
pub use spline::CubicSpline;
