//! Render settings loaded from JSON.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sol_math::{Point3, Vec3};
use sol_renderer::Camera;

/// Camera framing and quality overrides. Every field is optional; missing
/// fields leave the scene's camera untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    /// Width:height pair
    pub aspect_ratio: Option<[f64; 2]>,
    pub image_width: Option<u32>,
    pub samples_per_pixel: Option<u32>,
    pub max_depth: Option<u32>,
    pub look_from: Option<[f64; 3]>,
    pub look_at: Option<[f64; 3]>,
    pub vup: Option<[f64; 3]>,
    /// Vertical field of view in degrees
    pub vfov: Option<f64>,
    pub defocus_angle: Option<f64>,
    pub focus_dist: Option<f64>,
    pub jitter: Option<f64>,
    pub threads: Option<usize>,
}

impl RenderSettings {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Invalid render settings")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("In {}", path.display()))
    }

    /// Copy every field that is set onto `camera`.
    pub fn apply(&self, camera: &mut Camera) {
        if let Some([w, h]) = self.aspect_ratio {
            camera.aspect_ratio_width = w;
            camera.aspect_ratio_height = h;
        }
        if let Some(width) = self.image_width {
            camera.image_width = width;
        }
        if let Some(samples) = self.samples_per_pixel {
            camera.samples_per_pixel = samples;
        }
        if let Some(depth) = self.max_depth {
            camera.max_depth = depth;
        }
        if let Some(p) = self.look_from {
            camera.look_from = Point3::from_array(p);
        }
        if let Some(p) = self.look_at {
            camera.look_at = Point3::from_array(p);
        }
        if let Some(v) = self.vup {
            camera.vup = Vec3::from_array(v);
        }
        if let Some(vfov) = self.vfov {
            camera.vfov = vfov;
        }
        if let Some(angle) = self.defocus_angle {
            camera.defocus_angle = angle;
        }
        if let Some(dist) = self.focus_dist {
            camera.focus_dist = dist;
        }
        if let Some(jitter) = self.jitter {
            camera.jitter = jitter;
        }
    }
}
