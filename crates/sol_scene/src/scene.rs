//! The editable scene: world, camera and a named material table.

use std::collections::BTreeMap;
use std::sync::Arc;

use sol_math::{Color, Point3, Vec3};
use sol_renderer::{Camera, Material, Object, RenderProgress, RenderTarget, Sphere, World, WorldError};
use thiserror::Error;

use crate::{FrameSlot, RenderJob};

/// Name of the material every scene starts with. It can never be deleted.
pub const DEFAULT_MATERIAL: &str = "default";

/// Errors from scene edits.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("No object named {0}")]
    UnknownObject(String),

    #[error("No material named {0}")]
    UnknownMaterial(String),

    #[error("The default material cannot be deleted")]
    DefaultMaterial,

    #[error("A material named {0} already exists")]
    MaterialNameTaken(String),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error("Could not start render thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// A world, the camera looking at it and the materials its objects use.
///
/// Objects share materials by `Arc`; the table only names them, so
/// renaming a material never touches an object.
#[derive(Debug)]
pub struct Scene {
    world: World,
    camera: Camera,
    materials: BTreeMap<String, Arc<Material>>,
    frames: Arc<FrameSlot>,
}

impl Scene {
    /// An empty scene holding only the default white Lambertian.
    pub fn new(aspect_ratio_width: f64, aspect_ratio_height: f64) -> Self {
        let mut materials = BTreeMap::new();
        materials.insert(
            DEFAULT_MATERIAL.to_string(),
            Arc::new(Material::lambertian(Color::ONE)),
        );

        Self {
            world: World::new(),
            camera: Camera::new(aspect_ratio_width, aspect_ratio_height),
            materials,
            frames: Arc::new(FrameSlot::new()),
        }
    }

    /// Three spheres on a large ground sphere, seen from slightly above.
    pub fn demo(aspect_ratio_width: f64, aspect_ratio_height: f64) -> Self {
        let mut scene = Self::new(aspect_ratio_width, aspect_ratio_height);

        let ground = scene.add_material("ground", Material::lambertian(Color::new(0.5, 0.8, 0.2)));
        let matte = scene.add_material("matte", Material::lambertian(Color::new(0.1, 0.2, 0.5)));
        let glass = scene.add_material("glass", Material::dielectric(Color::ONE, 1.5));
        let metal = scene.add_material("metal", Material::metal(Color::new(0.8, 0.8, 0.8), 0.2));

        scene.add_object(Sphere::new("ground_sphere", Point3::new(0.0, -1000.0, 0.0), 1000.0, ground));
        scene.add_object(Sphere::new("center_sphere", Point3::new(0.0, 1.0, 0.0), 1.0, matte));
        scene.add_object(Sphere::new("glass_sphere", Point3::new(-3.0, 1.0, 0.0), 1.0, glass));
        scene.add_object(Sphere::new("metal_sphere", Point3::new(3.0, 1.0, 0.0), 1.0, metal));

        scene.set_look_from(Point3::new(0.0, 2.0, 8.0));
        scene.set_look_at(Point3::new(0.0, 1.0, 0.0));
        scene.set_up(Vec3::Y);

        log::debug!(
            "Demo scene: {} objects, {} materials",
            scene.world.len(),
            scene.materials.len()
        );
        scene
    }

    // Camera

    pub fn set_look_from(&mut self, look_from: Point3) {
        self.camera.look_from = look_from;
    }

    pub fn set_look_at(&mut self, look_at: Point3) {
        self.camera.look_at = look_at;
    }

    pub fn set_up(&mut self, vup: Vec3) {
        self.camera.vup = vup;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn image_width(&self) -> u32 {
        self.camera.image_width
    }

    /// Height from the last render, 0 before the first.
    pub fn image_height(&self) -> u32 {
        self.camera.image_height()
    }

    // World

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Add an object, replacing any object with the same name.
    pub fn add_object(&mut self, object: impl Into<Object>) -> Option<Object> {
        self.world.add(object)
    }

    pub fn remove_object(&mut self, name: &str) -> SceneResult<Object> {
        self.world
            .remove(name)
            .ok_or_else(|| SceneError::UnknownObject(name.to_string()))
    }

    pub fn rename_object(&mut self, old_name: &str, new_name: &str) -> SceneResult<()> {
        Ok(self.world.rename(old_name, new_name)?)
    }

    // Materials

    /// Register a material under `name`, replacing an existing entry.
    ///
    /// Objects using a replaced material are moved to the new one.
    pub fn add_material(&mut self, name: impl Into<String>, material: impl Into<Material>) -> Arc<Material> {
        let material = Arc::new(material.into());
        if let Some(replaced) = self.materials.insert(name.into(), Arc::clone(&material)) {
            for object in self.world.objects_mut() {
                if Arc::ptr_eq(object.material(), &replaced) {
                    object.set_material(Arc::clone(&material));
                }
            }
        }
        material
    }

    pub fn material(&self, name: &str) -> Option<&Arc<Material>> {
        self.materials.get(name)
    }

    pub fn default_material(&self) -> Arc<Material> {
        match self.materials.get(DEFAULT_MATERIAL) {
            Some(material) => Arc::clone(material),
            None => Arc::new(Material::lambertian(Color::ONE)),
        }
    }

    /// Material names in sorted order.
    pub fn material_names(&self) -> Vec<String> {
        self.materials.keys().cloned().collect()
    }

    /// Position of `name` in `material_names`.
    pub fn material_index(&self, name: &str) -> Option<usize> {
        self.materials.keys().position(|key| key == name)
    }

    /// Name under which the object's current material is registered.
    pub fn material_name_for_object(&self, object_name: &str) -> Option<&str> {
        let object = self.world.get(object_name)?;
        self.materials
            .iter()
            .find(|(_, material)| Arc::ptr_eq(material, object.material()))
            .map(|(name, _)| name.as_str())
    }

    pub fn is_default_material(name: &str) -> bool {
        name == DEFAULT_MATERIAL
    }

    pub fn set_material_for_object(&mut self, object_name: &str, material_name: &str) -> SceneResult<()> {
        let material = self
            .materials
            .get(material_name)
            .cloned()
            .ok_or_else(|| SceneError::UnknownMaterial(material_name.to_string()))?;
        let object = self
            .world
            .get_mut(object_name)
            .ok_or_else(|| SceneError::UnknownObject(object_name.to_string()))?;
        object.set_material(material);
        Ok(())
    }

    /// Remove a material, moving every object that used it to the default.
    pub fn delete_material(&mut self, name: &str) -> SceneResult<()> {
        if Self::is_default_material(name) {
            return Err(SceneError::DefaultMaterial);
        }
        let removed = self
            .materials
            .remove(name)
            .ok_or_else(|| SceneError::UnknownMaterial(name.to_string()))?;

        let fallback = self.default_material();
        let mut reassigned = 0;
        for object in self.world.objects_mut() {
            if Arc::ptr_eq(object.material(), &removed) {
                object.set_material(Arc::clone(&fallback));
                reassigned += 1;
            }
        }
        log::debug!("Deleted material {name}, {reassigned} objects now use {DEFAULT_MATERIAL}");
        Ok(())
    }

    /// Move a material to a new name. Objects keep using it.
    pub fn rename_material(&mut self, old_name: &str, new_name: &str) -> SceneResult<()> {
        if !self.materials.contains_key(old_name) {
            return Err(SceneError::UnknownMaterial(old_name.to_string()));
        }
        if old_name == new_name {
            return Ok(());
        }
        if Self::is_default_material(old_name) {
            return Err(SceneError::DefaultMaterial);
        }
        if self.materials.contains_key(new_name) {
            return Err(SceneError::MaterialNameTaken(new_name.to_string()));
        }

        if let Some(material) = self.materials.remove(old_name) {
            self.materials.insert(new_name.to_string(), material);
        }
        Ok(())
    }

    // Rendering

    /// Slot the finished frames of this scene are published into.
    pub fn frames(&self) -> &Arc<FrameSlot> {
        &self.frames
    }

    /// Render on the calling thread's behalf and publish the frame.
    pub fn render(&mut self, thread_count: usize, progress: &RenderProgress) -> Arc<RenderTarget> {
        log::info!("Rendering...");
        let pixels = self.camera.render(&self.world, thread_count, progress);
        let target = RenderTarget::new(pixels, self.camera.image_width, self.camera.image_height());
        let frame = self.frames.publish(target);
        log::info!("Rendering complete.");
        frame
    }

    /// Render a snapshot of the current world and camera on another thread.
    ///
    /// Edits made after this call do not affect the running render.
    pub fn render_in_background(&self, thread_count: usize) -> SceneResult<RenderJob> {
        Ok(RenderJob::spawn(
            self.world.clone(),
            self.camera.clone(),
            thread_count,
            Arc::clone(&self.frames),
        )?)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(16.0, 9.0)
    }
}
