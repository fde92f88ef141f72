use std::path::PathBuf;

use image::Rgb;
use tracing::info;

use crate::background::{estimate_background, BackgroundModel};
use crate::error::SplitError;
use crate::grid::{self, GridOptions};
use crate::manifest::write_manifest;
use crate::mode::{choose_mode, Mode};
use crate::regions::{self, RegionOptions};
use crate::sprite::{output_basename, SpriteRecord, SpriteSink};

/// Configuration for one extraction run, mirroring the CLI surface.
#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// `None` selects the strategy automatically.
    pub mode: Option<Mode>,
    /// Minimum accepted sprite dimension, pixels.
    pub min_size: u32,
    /// Padding added around tightened bounding boxes, pixels.
    pub padding: u32,
    /// Background reference color; `None` estimates from the corners.
    pub bg_color: Option<Rgb<f32>>,
    /// Second reference color for checkerboard-pattern backgrounds.
    pub bg_color2: Option<Rgb<f32>>,
    /// Euclidean RGB distance threshold for background classification.
    pub bg_tolerance: f32,
    /// Erosion steps for region-mode mask smoothing.
    pub erosion: u8,
    /// Forced grid dimensions; period detection is bypassed but the phase
    /// search still runs.
    pub cols: Option<u32>,
    pub rows: Option<u32>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output_dir: PathBuf::new(),
            mode: None,
            min_size: 20,
            padding: 2,
            bg_color: None,
            bg_color2: None,
            bg_tolerance: 30.0,
            erosion: 0,
            cols: None,
            rows: None,
        }
    }
}

/// Outcome of a run: the strategy used, the records written to the
/// manifest, and the manifest path.
#[derive(Debug)]
pub struct RunSummary {
    pub mode: Mode,
    pub records: Vec<SpriteRecord>,
    pub manifest_path: PathBuf,
}

/// Runs one full extraction: decode, background modeling, strategy
/// selection, extraction, manifest.
pub fn run(config: &SplitConfig) -> Result<RunSummary, SplitError> {
    let image = image::open(&config.input)?.to_rgba8();
    let (width, height) = image.dimensions();

    let source_name = config
        .input
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| SplitError::BadInputPath(config.input.clone()))?
        .to_owned();
    info!("image: {source_name} ({width}x{height})");

    let primary = config
        .bg_color
        .unwrap_or_else(|| estimate_background(&image));
    let model = BackgroundModel::new(primary, config.bg_color2, config.bg_tolerance);
    info!(
        "background color: ({:.0}, {:.0}, {:.0})",
        primary[0], primary[1], primary[2]
    );
    if let Some(secondary) = config.bg_color2 {
        info!(
            "background color 2: ({:.0}, {:.0}, {:.0})",
            secondary[0], secondary[1], secondary[2]
        );
    }

    let mode = match config.mode {
        Some(mode) => mode,
        None => {
            let mode = choose_mode(&image, &model);
            info!("auto-detected mode: {mode}");
            mode
        }
    };

    let sink = SpriteSink::new(&config.output_dir, output_basename(&config.input)?)?;

    let (records, annotation) = match mode {
        Mode::Grid => {
            let opts = GridOptions {
                min_size: config.min_size,
                padding: config.padding,
                force_cols: config.cols,
                force_rows: config.rows,
            };
            match grid::extract(&image, &model, &opts, &sink)? {
                Some(extraction) => (extraction.records, extraction.annotation),
                None => (Vec::new(), "Grid: period not detected".to_owned()),
            }
        }
        Mode::Detect => {
            let opts = RegionOptions {
                min_size: config.min_size,
                padding: config.padding,
                erosion: config.erosion,
            };
            let records = regions::extract(&image, &model, &opts, &sink)?;
            (records, "Mode: detect".to_owned())
        }
    };

    let manifest_path = write_manifest(sink.dir(), &source_name, &annotation, &records)?;
    info!(
        "saved {} sprites to {}",
        records.len(),
        sink.dir().display()
    );
    info!("manifest: {}", manifest_path.display());

    Ok(RunSummary {
        mode,
        records,
        manifest_path,
    })
}
