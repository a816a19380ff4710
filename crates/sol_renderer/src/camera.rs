//! Camera for ray generation and whole-frame rendering.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use sol_math::random::{gen_f64, random_in_unit_disk};
use sol_math::{degrees_to_radians, unit_vector, Color, Point3, Ray, Vec3};

use crate::renderer::render_pixel;
use crate::{partition_rows, Hittable, RenderProgress, RowBand};

/// Camera framing, quality settings and the viewport derived from them.
///
/// Framing fields are public for the editing side; the derived viewport is
/// rebuilt by `initialize` at the start of every render.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub aspect_ratio_width: f64,
    pub aspect_ratio_height: f64,
    pub image_width: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,

    // Framing
    pub look_from: Point3,
    pub look_at: Point3,
    pub vup: Vec3,

    // Lens settings
    pub vfov: f64,          // Vertical field of view in degrees
    pub defocus_angle: f64, // Variation angle of rays through each pixel
    pub focus_dist: f64,    // Distance from camera to plane of perfect focus
    /// Scale of the per-sample pixel jitter, 0 samples pixel centers only
    pub jitter: f64,

    // Derived by initialize()
    image_height: u32,
    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
    samples_scale: f64,
}

impl Camera {
    /// Create a camera whose image keeps the given aspect ratio.
    pub fn new(aspect_ratio_width: f64, aspect_ratio_height: f64) -> Self {
        Self {
            aspect_ratio_width,
            aspect_ratio_height,
            image_width: 1080,
            samples_per_pixel: 1,
            max_depth: 10,
            look_from: Point3::ZERO,
            look_at: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            jitter: 1.0,
            image_height: 0,
            center: Point3::ZERO,
            pixel00_loc: Point3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
            samples_scale: 1.0,
        }
    }

    /// Set the aspect ratio as a width:height pair.
    pub fn with_aspect_ratio(mut self, width: f64, height: f64) -> Self {
        self.aspect_ratio_width = width;
        self.aspect_ratio_height = height;
        self
    }

    /// Set image width; the height follows from the aspect ratio.
    pub fn with_image_width(mut self, width: u32) -> Self {
        self.image_width = width;
        self
    }

    /// Samples per pixel and bounce limit.
    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples;
        self.max_depth = max_depth;
        self
    }

    /// Eye point, target and up direction.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Field of view in degrees, defocus cone angle in degrees and focus distance.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    /// Image height as of the last `initialize`.
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Weight of one sample, `1 / samples_per_pixel` after `initialize`.
    pub fn samples_scale(&self) -> f64 {
        self.samples_scale
    }

    /// Derive the viewport from the current framing. Idempotent.
    pub fn initialize(&mut self) {
        let aspect_ratio = self.aspect_ratio_width / self.aspect_ratio_height;
        // A NaN height casts to 0 and is then lifted to 1
        self.image_height = ((self.image_width as f64 / aspect_ratio) as u32).max(1);

        if self.samples_per_pixel == 0 {
            log::warn!("samples_per_pixel is 0, taking 1 sample per pixel");
        }
        self.samples_scale = 1.0 / self.samples_per_pixel.max(1) as f64;
        self.center = self.look_from;

        // Viewport on the focus plane
        let theta = degrees_to_radians(self.vfov);
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width = viewport_height * (self.image_width as f64 / self.image_height as f64);

        self.w = unit_vector(self.look_from - self.look_at);
        self.u = unit_vector(self.vup.cross(self.w));
        self.v = self.w.cross(self.u);

        // Vectors across the horizontal and down the vertical viewport edges
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        self.pixel_delta_u = viewport_u / self.image_width as f64;
        self.pixel_delta_v = viewport_v / self.image_height as f64;

        let viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        let defocus_radius = self.focus_dist * degrees_to_radians(self.defocus_angle / 2.0).tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;
    }

    /// Center of pixel (i, j) on the focus plane.
    pub fn pixel_center(&self, i: u32, j: u32) -> Point3 {
        self.pixel00_loc + (i as f64) * self.pixel_delta_u + (j as f64) * self.pixel_delta_v
    }

    /// Position of the eye (before aperture sampling).
    pub fn center(&self) -> Point3 {
        self.center
    }

    /// A sample ray through pixel (i, j), jittered and defocused as configured.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = self.jitter * sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f64) + offset.x) * self.pixel_delta_u
            + ((j as f64) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new(ray_origin, pixel_sample - ray_origin)
    }

    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    fn pixel_count(&self) -> usize {
        self.image_width as usize * self.image_height as usize
    }

    /// Render the world into a row-major `image_width * image_height` buffer.
    ///
    /// `thread_count` is clamped to `[1, hardware concurrency]`. A zero image
    /// width yields an empty buffer.
    pub fn render(
        &mut self,
        world: &dyn Hittable,
        thread_count: usize,
        progress: &RenderProgress,
    ) -> Vec<Color> {
        self.initialize();
        if self.image_width == 0 || self.image_height == 0 {
            log::error!(
                "Invalid image dimensions: {}x{}",
                self.image_width,
                self.image_height
            );
            progress.reset(0);
            return Vec::new();
        }

        let threads = clamp_thread_count(thread_count, num_cpus::get());
        log::info!(
            "Rendering {}x{} @ {} spp, depth {}",
            self.image_width,
            self.image_height,
            self.samples_per_pixel,
            self.max_depth
        );

        let mut image_buffer = vec![Color::ZERO; self.pixel_count()];
        if threads > 1 {
            self.render_multi_thread(world, &mut image_buffer, threads, progress);
        } else {
            self.render_single_thread(world, &mut image_buffer, progress);
        }
        image_buffer
    }

    /// Render every row on the calling thread.
    ///
    /// `initialize` must have run and `image_buffer` must hold one entry
    /// per pixel. Progress advances once per completed row.
    pub fn render_single_thread(
        &self,
        world: &dyn Hittable,
        image_buffer: &mut [Color],
        progress: &RenderProgress,
    ) {
        log::info!("Running on a single thread");
        debug_assert_eq!(image_buffer.len(), self.pixel_count());
        progress.reset(self.pixel_count());

        let mut rng = StdRng::from_entropy();
        let width = self.image_width as usize;
        for (j, row) in image_buffer.chunks_mut(width).enumerate() {
            for (i, pixel) in row.iter_mut().enumerate() {
                *pixel = render_pixel(self, world, i as u32, j as u32, &mut rng);
            }
            progress.advance(width);
        }
    }

    /// Render with one worker per contiguous row band.
    ///
    /// Workers run on a pool built for this call only and all of them have
    /// finished when this returns. Progress advances once per pixel. Falls
    /// back to the single-threaded path if the pool cannot be built.
    pub fn render_multi_thread(
        &self,
        world: &dyn Hittable,
        image_buffer: &mut [Color],
        threads: usize,
        progress: &RenderProgress,
    ) {
        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("sol-render-{i}"))
            .build()
        {
            Ok(pool) => pool,
            Err(err) => {
                log::warn!("Could not start {threads} render threads ({err}), falling back");
                return self.render_single_thread(world, image_buffer, progress);
            }
        };

        log::info!("Running on {threads} threads");
        debug_assert_eq!(image_buffer.len(), self.pixel_count());
        progress.reset(self.pixel_count());

        let width = self.image_width as usize;
        let bands = partition_rows(self.image_height, threads);

        pool.scope(|scope| {
            let mut remaining = image_buffer;
            for band in bands {
                let (rows, rest) =
                    std::mem::take(&mut remaining).split_at_mut(band.row_count() as usize * width);
                remaining = rest;
                scope.spawn(move |_| self.render_band(world, band, rows, progress));
            }
        });
    }

    /// Render the rows of one band into that band's slice of the image.
    fn render_band(
        &self,
        world: &dyn Hittable,
        band: RowBand,
        rows: &mut [Color],
        progress: &RenderProgress,
    ) {
        let mut rng = StdRng::from_entropy();
        let width = self.image_width as usize;

        for (j, row) in band.rows().zip(rows.chunks_mut(width)) {
            for (i, pixel) in row.iter_mut().enumerate() {
                *pixel = render_pixel(self, world, i as u32, j, &mut rng);
                progress.advance(1);
            }
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(16.0, 9.0)
    }
}

/// Clamp a requested worker count to `[1, available]`.
fn clamp_thread_count(requested: usize, available: usize) -> usize {
    let available = available.max(1);
    if requested > available {
        log::warn!("{requested} threads requested, but only {available} available");
        available
    } else if requested == 0 {
        log::warn!("0 threads requested, using 1");
        1
    } else {
        requested
    }
}

/// Uniform offset in [-0.5, 0.5) on x and y.
fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f64(rng) - 0.5, gen_f64(rng) - 0.5, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{sky_gradient, Material, Sphere, World};
    use std::sync::Arc;

    fn gradient_camera() -> Camera {
        Camera::new(2.0, 1.0)
            .with_image_width(16)
            .with_quality(1, 1)
            .with_position(Point3::ZERO, Point3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
            .with_jitter(0.0)
    }

    #[test]
    fn test_camera_initialize() {
        let mut camera = Camera::new(2.0, 1.0).with_image_width(400);
        camera.initialize();

        assert_eq!(camera.image_height(), 200);
        assert_eq!(camera.center(), Point3::ZERO);
        assert!((camera.w - Vec3::Z).length() < 1e-12);
        assert!((camera.u - Vec3::X).length() < 1e-12);
        assert!((camera.v - Vec3::Y).length() < 1e-12);
    }

    #[test]
    fn test_height_is_at_least_one() {
        let mut camera = Camera::new(1000.0, 1.0).with_image_width(10);
        camera.initialize();
        assert_eq!(camera.image_height(), 1);
    }

    #[test]
    fn test_initialize_is_idempotent_and_tracks_edits() {
        let mut camera = Camera::default().with_image_width(64);
        camera.initialize();
        let first = camera.pixel_center(3, 4);
        camera.initialize();
        assert_eq!(camera.pixel_center(3, 4), first);

        camera.look_from = Point3::new(0.0, 0.0, 2.0);
        camera.initialize();
        assert!((camera.pixel_center(3, 4) - first - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-9);
    }

    #[test]
    fn test_center_ray_points_forward() {
        let mut camera = Camera::new(1.0, 1.0)
            .with_image_width(101)
            .with_lens(90.0, 0.0, 1.0)
            .with_jitter(0.0);
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(42);
        let ray = camera.get_ray(50, 50, &mut rng);
        assert_eq!(ray.origin(), Point3::ZERO);
        assert!((unit_vector(ray.direction()) - (-Vec3::Z)).length() < 1e-9);
    }

    #[test]
    fn test_defocus_origin_stays_on_disk() {
        let mut camera = Camera::new(1.0, 1.0)
            .with_image_width(10)
            .with_lens(40.0, 10.0, 3.4);
        camera.initialize();

        let radius = 3.4 * 5f64.to_radians().tan();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let ray = camera.get_ray(5, 5, &mut rng);
            let offset = ray.origin() - camera.center();
            assert!(offset.length() <= radius + 1e-12);
            assert!(offset.z.abs() < 1e-12);
        }
    }

    #[test]
    fn test_jitter_stays_in_pixel_footprint() {
        let mut camera = Camera::new(1.0, 1.0).with_image_width(10).with_lens(90.0, 0.0, 1.0);
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(5);
        let center = camera.pixel_center(2, 7);
        for _ in 0..200 {
            let ray = camera.get_ray(2, 7, &mut rng);
            let on_plane = ray.at(1.0) - center;
            assert!(on_plane.x.abs() <= 0.5 * camera.pixel_delta_u.length() + 1e-12);
            assert!(on_plane.y.abs() <= 0.5 * camera.pixel_delta_v.length() + 1e-12);
        }
    }

    #[test]
    fn test_empty_world_reproduces_sky_gradient() {
        let world = World::new();
        let mut camera = gradient_camera();
        let progress = RenderProgress::new();

        let image = camera.render(&world, 1, &progress);
        let (width, height) = (camera.image_width, camera.image_height());
        assert_eq!(image.len(), (width * height) as usize);

        for j in 0..height {
            for i in 0..width {
                let ray = Ray::new(camera.center(), camera.pixel_center(i, j) - camera.center());
                let expected = sky_gradient(&ray);
                let got = image[(j * width + i) as usize];
                assert!((got - expected).length() < 1e-12, "pixel ({i}, {j})");
            }
        }
        assert_eq!(progress.message(), "Progress 100%");
    }

    #[test]
    fn test_multi_thread_covers_every_pixel() {
        let mut world = World::new();
        world.add(Sphere::new(
            "ball",
            Point3::new(0.0, 0.0, -2.0),
            0.5,
            Arc::new(Material::lambertian(Color::new(0.4, 0.4, 0.4))),
        ));

        let mut camera = Camera::new(4.0, 3.0).with_image_width(40).with_quality(2, 3);
        camera.initialize();
        let pixels = (camera.image_width * camera.image_height()) as usize;

        let single_progress = RenderProgress::new();
        let mut single = vec![Color::splat(-1.0); pixels];
        camera.render_single_thread(&world, &mut single, &single_progress);

        let multi_progress = RenderProgress::new();
        let mut multi = vec![Color::splat(-1.0); pixels];
        camera.render_multi_thread(&world, &mut multi, 4, &multi_progress);

        // Every slot is overwritten with a non-negative color exactly once
        assert_eq!(single.len(), multi.len());
        assert!(single.iter().all(|c| c.min_element() >= 0.0));
        assert!(multi.iter().all(|c| c.min_element() >= 0.0));
        assert_eq!(single_progress.completed(), pixels);
        assert_eq!(multi_progress.completed(), pixels);
    }

    #[test]
    fn test_multi_thread_matches_gradient() {
        let world = World::new();
        let mut camera = gradient_camera();
        camera.initialize();
        let (width, height) = (camera.image_width, camera.image_height());

        let mut image = vec![Color::ZERO; (width * height) as usize];
        camera.render_multi_thread(&world, &mut image, 3, &RenderProgress::new());

        for j in 0..height {
            for i in 0..width {
                let ray = Ray::new(camera.center(), camera.pixel_center(i, j) - camera.center());
                assert!((image[(j * width + i) as usize] - sky_gradient(&ray)).length() < 1e-12);
            }
        }
    }

    #[test]
    fn test_zero_width_renders_nothing() {
        let mut camera = Camera::default().with_image_width(0);
        let image = camera.render(&World::new(), 4, &RenderProgress::new());
        assert!(image.is_empty());
    }

    #[test]
    fn test_clamp_thread_count() {
        assert_eq!(clamp_thread_count(0, 8), 1);
        assert_eq!(clamp_thread_count(4, 8), 4);
        assert_eq!(clamp_thread_count(64, 8), 8);
        assert_eq!(clamp_thread_count(3, 0), 1);
    }
}
