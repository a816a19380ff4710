//! sol renderer - CPU path tracing
//!
//! A Monte Carlo path tracer over a flat, name-keyed world of spheres lit
//! only by a sky gradient.

mod bands;
mod camera;
mod hittable;
mod material;
mod progress;
mod render_target;
mod renderer;
mod sphere;
mod world;

pub use bands::{partition_rows, RowBand};
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable};
pub use material::{Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use progress::RenderProgress;
pub use render_target::{ExportError, ExportFormat, ExportResult, RenderTarget};
pub use renderer::{linear_to_gamma, ray_color, render_pixel, sky_gradient, EXHAUSTED_COLOR};
pub use sphere::Sphere;
pub use world::{Object, World, WorldError};

/// Re-export the math kernel for convenience
pub use sol_math::{Color, Interval, Point3, Ray, Vec3};
