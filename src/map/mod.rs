//! Road geometry: the reference path store and the Cartesian <-> Frenet
//! coordinate transform built on it

pub mod reference_path;
pub mod frenet;

pub use reference_path::ReferencePath;
