//! Core path tracing integrator.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - A sky gradient as the only light source
//! - Anti-aliasing via multi-sampling

use crate::{Camera, Hittable};
use rand::RngCore;
use sol_math::{unit_vector, Color, Interval, Ray};

/// Returned when recursion runs out or a surface absorbs the ray.
///
/// Mid-gray rather than black keeps fully occluded regions from going dark.
pub const EXHAUSTED_COLOR: Color = Color::new(0.5, 0.5, 0.5);

/// Lower bound on hit parameters, avoids self-intersection acne.
const RAY_T_MIN: f64 = 0.001;

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the world, bouncing off surfaces and accumulating attenuation.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    if depth == 0 {
        return EXHAUSTED_COLOR;
    }

    let Some(rec) = world.hit(ray, Interval::new(RAY_T_MIN, f64::INFINITY)) else {
        return sky_gradient(ray);
    };

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => result.attenuation * ray_color(&result.scattered, world, depth - 1, rng),
        None => EXHAUSTED_COLOR,
    }
}

/// White at the horizon blending to sky blue at the zenith.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = unit_vector(ray.direction());
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    (1.0 - a) * white + a * blue
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Average `samples_per_pixel` ray samples through pixel (i, j).
///
/// The camera must already be initialized.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    i: u32,
    j: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel.max(1) {
        let ray = camera.get_ray(i, j, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth, rng);
    }

    camera.samples_scale() * pixel_color
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Material, Sphere, World};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use sol_math::{Point3, Vec3};
    use std::sync::Arc;

    #[test]
    fn test_sky_gradient() {
        let up = sky_gradient(&Ray::new(Point3::ZERO, Vec3::Y));
        let down = sky_gradient(&Ray::new(Point3::ZERO, -Vec3::Y));
        let level = sky_gradient(&Ray::new(Point3::ZERO, Vec3::new(3.0, 0.0, 0.0)));

        assert!((up - Color::new(0.5, 0.7, 1.0)).length() < 1e-12);
        assert!((down - Color::ONE).length() < 1e-12);
        assert!((level - Color::new(0.75, 0.85, 1.0)).length() < 1e-12);
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-0.3), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-12);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_depth_zero_is_mid_gray() {
        let world = World::new();
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Point3::ZERO, Vec3::Y);
        assert_eq!(ray_color(&ray, &world, 0, &mut rng), EXHAUSTED_COLOR);
    }

    #[test]
    fn test_miss_returns_sky() {
        let world = World::new();
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Point3::ZERO, Vec3::new(0.2, 0.5, -1.0));
        assert_eq!(ray_color(&ray, &world, 1, &mut rng), sky_gradient(&ray));
    }

    #[test]
    fn test_single_bounce_attenuates_terminal_gray() {
        // With depth 1 the scattered ray hits the depth floor immediately.
        let albedo = Color::new(0.2, 0.4, 0.8);
        let mut world = World::new();
        world.add(Sphere::new(
            "ball",
            Point3::new(0.0, 0.0, -3.0),
            1.0,
            Arc::new(Material::lambertian(albedo)),
        ));

        let mut rng = StdRng::seed_from_u64(9);
        let ray = Ray::new(Point3::ZERO, -Vec3::Z);
        let color = ray_color(&ray, &world, 1, &mut rng);
        assert!((color - albedo * EXHAUSTED_COLOR).length() < 1e-12);
    }
}
