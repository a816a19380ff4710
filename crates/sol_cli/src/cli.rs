use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Png,
    /// Plain-text P3, gamma corrected
    Ppm,
}

/// Command line arguments. Flags override the settings file.
#[derive(Debug, Parser)]
#[command(name = "sol")]
#[command(about = "Render the sol demo scene with a CPU path tracer")]
pub struct Args {
    /// JSON render settings
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Render threads, clamped to the available cores
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Samples per pixel
    #[arg(short, long)]
    pub samples: Option<u32>,

    /// Maximum bounce depth
    #[arg(short, long)]
    pub depth: Option<u32>,

    #[arg(short, long, default_value = "render.png")]
    pub output: PathBuf,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Png)]
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["sol"]);
        assert_eq!(args.output, PathBuf::from("render.png"));
        assert_eq!(args.format, OutputFormat::Png);
        assert!(args.threads.is_none());
        assert!(args.settings.is_none());
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "sol", "-t", "3", "--width", "200", "-s", "8", "-d", "4", "-f", "ppm", "-o", "out.ppm",
        ]);
        assert_eq!(args.threads, Some(3));
        assert_eq!(args.width, Some(200));
        assert_eq!(args.samples, Some(8));
        assert_eq!(args.depth, Some(4));
        assert_eq!(args.format, OutputFormat::Ppm);
        assert_eq!(args.output, PathBuf::from("out.ppm"));
    }
}
