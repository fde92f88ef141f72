use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use image::Rgb;
use sheetsplit::{Mode, SplitConfig};
use tracing_subscriber::EnvFilter;

/// Split a sprite sheet into individual background-matted sprites.
#[derive(Parser)]
#[command(name = "sheetsplit", version, about)]
struct Args {
    /// Input sprite sheet image.
    input: PathBuf,

    /// Output directory for extracted sprites and the manifest.
    output_dir: PathBuf,

    /// Extraction strategy.
    #[arg(long, value_enum, default_value_t = ModeArg::Auto)]
    mode: ModeArg,

    /// Minimum sprite dimension to keep, pixels.
    #[arg(long, default_value_t = 20)]
    min_size: u32,

    /// Padding around each crop, pixels.
    #[arg(long, default_value_t = 2)]
    padding: u32,

    /// Background color as R,G,B (default: auto-detect from corners).
    #[arg(long, value_parser = parse_color)]
    bg_color: Option<Rgb<f32>>,

    /// Second background color as R,G,B (for checkerboard patterns).
    #[arg(long, value_parser = parse_color)]
    bg_color2: Option<Rgb<f32>>,

    /// Color distance tolerance for background classification.
    #[arg(long, default_value_t = 30.0)]
    bg_tolerance: f32,

    /// Erode the sprite mask N iterations before labeling (detect mode).
    #[arg(long, default_value_t = 0)]
    erosion: u8,

    /// Force the number of grid columns (skips period detection).
    #[arg(long)]
    cols: Option<u32>,

    /// Force the number of grid rows (skips period detection).
    #[arg(long)]
    rows: Option<u32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Grid,
    Detect,
    Auto,
}

fn parse_color(value: &str) -> Result<Rgb<f32>, String> {
    let components: Vec<&str> = value.split(',').collect();
    if components.len() != 3 {
        return Err(format!("expected R,G,B, got {value:?}"));
    }
    let mut channels = [0.0f32; 3];
    for (channel, component) in channels.iter_mut().zip(&components) {
        *channel = component
            .trim()
            .parse()
            .map_err(|_| format!("invalid color component {component:?}"))?;
    }
    Ok(Rgb(channels))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sheetsplit=info")),
        )
        .init();

    let args = Args::parse();
    let config = SplitConfig {
        input: args.input,
        output_dir: args.output_dir,
        mode: match args.mode {
            ModeArg::Grid => Some(Mode::Grid),
            ModeArg::Detect => Some(Mode::Detect),
            ModeArg::Auto => None,
        },
        min_size: args.min_size,
        padding: args.padding,
        bg_color: args.bg_color,
        bg_color2: args.bg_color2,
        bg_tolerance: args.bg_tolerance,
        erosion: args.erosion,
        cols: args.cols,
        rows: args.rows,
    };

    sheetsplit::run(&config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_color_triples() {
        assert_eq!(parse_color("255, 0, 128").unwrap(), Rgb([255.0, 0.0, 128.0]));
        assert!(parse_color("255,0").is_err());
        assert!(parse_color("a,b,c").is_err());
    }
}
