//! Interpolation helpers.
//!
//! Component-wise lerp for vectors and a quaternion NLERP with shortest-arc
//! sign correction.

pub mod functions;
