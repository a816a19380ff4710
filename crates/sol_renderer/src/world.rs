//! The world: every intersectable in the scene, keyed by unique name.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::{HitRecord, Hittable, Material, Sphere};
use sol_math::{Interval, Ray};

/// Errors from name-keyed world edits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    #[error("No object named {0}")]
    UnknownObject(String),

    #[error("An object named {0} already exists")]
    NameTaken(String),
}

/// A scene object. Spheres are the only shape for now.
#[derive(Debug, Clone)]
pub enum Object {
    Sphere(Sphere),
}

impl Object {
    pub fn name(&self) -> &str {
        match self {
            Self::Sphere(s) => s.name(),
        }
    }

    fn set_name(&mut self, name: String) {
        match self {
            Self::Sphere(s) => s.set_name(name),
        }
    }

    pub fn material(&self) -> &Arc<Material> {
        match self {
            Self::Sphere(s) => s.material(),
        }
    }

    pub fn set_material(&mut self, material: Arc<Material>) {
        match self {
            Self::Sphere(s) => s.set_material(material),
        }
    }
}

impl From<Sphere> for Object {
    fn from(sphere: Sphere) -> Self {
        Self::Sphere(sphere)
    }
}

impl Hittable for Object {
    #[inline]
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        match self {
            Self::Sphere(s) => s.hit(ray, ray_t),
        }
    }
}

/// Name-ordered collection of objects, itself hittable.
///
/// Intersection is a linear scan in name order.
#[derive(Debug, Clone, Default)]
pub struct World {
    objects: BTreeMap<String, Object>,
}

impl World {
    /// Create a new empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object, replacing and returning any object with the same name.
    pub fn add(&mut self, object: impl Into<Object>) -> Option<Object> {
        let object = object.into();
        self.objects.insert(object.name().to_string(), object)
    }

    pub fn remove(&mut self, name: &str) -> Option<Object> {
        self.objects.remove(name)
    }

    /// Clear all objects from the world.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn get(&self, name: &str) -> Option<&Object> {
        self.objects.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Object> {
        self.objects.get_mut(name)
    }

    /// Object names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.objects.keys().cloned().collect()
    }

    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.objects.values()
    }

    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut Object> {
        self.objects.values_mut()
    }

    /// Move an object to a new name, keeping its material and shape.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<(), WorldError> {
        if !self.objects.contains_key(old_name) {
            return Err(WorldError::UnknownObject(old_name.to_string()));
        }
        if old_name == new_name {
            return Ok(());
        }
        if self.objects.contains_key(new_name) {
            return Err(WorldError::NameTaken(new_name.to_string()));
        }

        if let Some(mut object) = self.objects.remove(old_name) {
            object.set_name(new_name.to_string());
            self.objects.insert(new_name.to_string(), object);
        }
        Ok(())
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the world is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for World {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let mut closest: Option<HitRecord<'a>> = None;
        let mut closest_so_far = ray_t.max;

        for object in self.objects.values() {
            // Later objects may only win by being strictly closer
            if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }
}
