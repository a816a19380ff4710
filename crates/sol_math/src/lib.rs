// Re-export glam for convenience
pub use glam::DVec3;

// sol math types
mod interval;
mod ray;
pub mod random;
mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::{degrees_to_radians, near_zero, reflect, refract, unit_vector};

/// Three doubles used as a direction or displacement.
pub type Vec3 = DVec3;
/// Points share their representation with vectors.
pub type Point3 = DVec3;
/// Linear RGB, nominally in [0, 1] per channel.
pub type Color = DVec3;
