//! Sphere primitive for ray tracing.

use std::sync::Arc;

use crate::{HitRecord, Hittable, Material};
use sol_math::{Interval, Point3, Ray};

/// Rejects near-parallel quadratics and drifting normals.
const TOLERANCE: f64 = 1e-6;

/// A named sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    name: String,
    pub center: Point3,
    pub radius: f64,
    material: Arc<Material>,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(
        name: impl Into<String>,
        center: Point3,
        radius: f64,
        material: Arc<Material>,
    ) -> Self {
        Self {
            name: name.into(),
            center,
            radius,
            material,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renaming goes through `World::rename` so the key stays in sync.
    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    pub fn set_material(&mut self, material: Arc<Material>) {
        self.material = material;
    }
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 || a.abs() < TOLERANCE {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        let len = outward_normal.length();
        // Also false for NaN, which a zero radius produces
        if !(len >= 1.0 - TOLERANCE && len <= 1.0 + TOLERANCE) {
            return None;
        }

        Some(HitRecord::new(ray, root, outward_normal, &self.material))
    }
}
