//! Completed frames and their export to image formats.

use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use sol_math::{Color, Interval};
use thiserror::Error;
use uuid::Uuid;

use crate::linear_to_gamma;

/// Errors that can occur while exporting a frame.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Cannot encode an empty {0}x{1} image")]
    EmptyImage(u32, u32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Binary formats a frame can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
}

impl ExportFormat {
    /// Look up a format by name, case-insensitively.
    pub fn from_name(name: &str) -> ExportResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            _ => Err(ExportError::UnsupportedFormat(name.to_string())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
        }
    }
}

/// One finished frame: pixels plus an identifier unique to this instance.
///
/// Consumers detect a new frame by comparing identifiers alone, so a clone
/// is issued a fresh identifier of its own.
#[derive(Debug)]
pub struct RenderTarget {
    pixels: Vec<Color>,
    width: u32,
    height: u32,
    identifier: String,
}

impl RenderTarget {
    /// Wrap a row-major pixel buffer.
    ///
    /// A buffer of the wrong length is padded with black or truncated.
    pub fn new(mut pixels: Vec<Color>, width: u32, height: u32) -> Self {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            log::warn!(
                "Render target expected {} pixels for {}x{}, got {}",
                expected,
                width,
                height,
                pixels.len()
            );
            pixels.resize(expected, Color::ZERO);
        }

        Self {
            pixels,
            width,
            height,
            identifier: Uuid::new_v4().to_string(),
        }
    }

    /// A 0x0 placeholder frame.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, 0)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Color at (x, y), or black when out of range.
    pub fn get_pixel(&self, x: u32, y: u32) -> Color {
        self.index(x, y).map_or(Color::ZERO, |i| self.pixels[i])
    }

    /// Overwrite (x, y); out-of-range coordinates are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Legacy plain-text PPM (P3) with gamma correction.
    pub fn to_ppm(&self) -> String {
        let mut out = String::with_capacity(16 + self.pixels.len() * 12);
        let _ = write!(out, "P3\n{} {}\n255\n", self.width, self.height);
        for &pixel in &self.pixels {
            let [r, g, b] = ppm_bytes(pixel);
            let _ = writeln!(out, "{r} {g} {b}");
        }
        out
    }

    /// Stream the legacy PPM encoding into `writer`.
    pub fn write_ppm<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writer.write_all(self.to_ppm().as_bytes())?;
        writer.flush()
    }

    /// 8-bit RGB bytes, row-major, without gamma correction.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|c| [quantize(c.x), quantize(c.y), quantize(c.z)])
            .collect()
    }

    /// Encode to an in-memory image in `format`.
    pub fn encode(&self, format: ExportFormat) -> ExportResult<Vec<u8>> {
        if self.is_empty() {
            return Err(ExportError::EmptyImage(self.width, self.height));
        }

        let mut bytes = Vec::new();
        match format {
            ExportFormat::Png => PngEncoder::new(&mut bytes).write_image(
                &self.to_rgb8(),
                self.width,
                self.height,
                ColorType::Rgb8,
            )?,
        }
        Ok(bytes)
    }

    /// PNG bytes, or an empty vector if encoding fails.
    pub fn save_png_to_memory(&self) -> Vec<u8> {
        self.encode(ExportFormat::Png).unwrap_or_else(|err| {
            log::error!("Could not encode PNG: {err}");
            Vec::new()
        })
    }

    /// Write a PNG file at `path`.
    pub fn save_png_to_file(&self, path: impl AsRef<Path>) -> ExportResult<()> {
        let bytes = self.encode(ExportFormat::Png)?;
        std::fs::write(path.as_ref(), bytes)?;
        Ok(())
    }

    /// Save into the temp directory under a random name.
    ///
    /// Returns the written path, or `None` after logging why nothing was saved.
    pub fn save_image(&self, format: &str) -> Option<PathBuf> {
        log::info!("Saving image...");

        let format = match ExportFormat::from_name(format) {
            Ok(format) => format,
            Err(err) => {
                log::error!("{err}");
                return None;
            }
        };

        let path = std::env::temp_dir().join(format!(
            "image_{}.{}",
            rand::random::<u32>(),
            format.extension()
        ));

        let result = match format {
            ExportFormat::Png => self.save_png_to_file(&path),
        };
        match result {
            Ok(()) => {
                log::info!("Image saved to {}", path.display());
                Some(path)
            }
            Err(err) => {
                log::error!("Could not save {}: {err}", path.display());
                None
            }
        }
    }
}

impl Clone for RenderTarget {
    fn clone(&self) -> Self {
        Self {
            pixels: self.pixels.clone(),
            width: self.width,
            height: self.height,
            identifier: Uuid::new_v4().to_string(),
        }
    }
}

impl Default for RenderTarget {
    fn default() -> Self {
        Self::empty()
    }
}

/// Gamma-correct, clamp to [0, 0.999] and scale by 255.999.
fn ppm_bytes(pixel: Color) -> [u8; 3] {
    const INTENSITY: Interval = Interval::new(0.000, 0.999);
    let byte = |c: f64| (255.999 * INTENSITY.clamp(linear_to_gamma(c))) as u8;
    [byte(pixel.x), byte(pixel.y), byte(pixel.z)]
}

#[inline]
fn quantize(channel: f64) -> u8 {
    (255.99 * channel) as u8
}
