//! Camera system for free-flight scene viewing.
//!
//! Provides the yaw/pitch/roll orientation basis, a free-flight camera
//! controller, and the viewpoint rig (free / top / follow modes).

/// Orientation basis derivation from Euler angles.
pub mod basis;
/// Free-flight camera controller: movement, look, zoom, roll.
pub mod controller;
/// Core camera struct and GPU uniform types.
pub mod core;
/// Viewpoint selection: free flight, fixed top-down, car follow.
pub mod rig;
