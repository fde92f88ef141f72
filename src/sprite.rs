use std::fs;
use std::path::{Path, PathBuf};

use image::{GenericImageView, RgbaImage};

use crate::background::{BackgroundModel, FOREGROUND};
use crate::error::SplitError;

/// File name prefix emitted by the image generator, stripped from output
/// base names.
pub const GENERATOR_PREFIX: &str = "Gemini_Generated_Image_";

/// A rectangle in image coordinates, `x2`/`y2` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl Bounds {
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    /// Expands by `padding` on every side, clamped to `[0, width] x [0, height]`.
    pub fn pad_clamp(&self, padding: u32, width: u32, height: u32) -> Bounds {
        Bounds {
            x1: self.x1.saturating_sub(padding),
            y1: self.y1.saturating_sub(padding),
            x2: (self.x2 + padding).min(width),
            y2: (self.y2 + padding).min(height),
        }
    }
}

/// One extracted sprite, as written to the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteRecord {
    /// Sequential 0-based index, assigned after any re-sorting.
    pub index: usize,
    /// Output file name within the output directory.
    pub file: String,
    /// Output image dimensions in pixels.
    pub width: u32,
    pub height: u32,
    /// `(row, col)` cell coordinate, present for grid extractions only.
    pub grid_pos: Option<(usize, usize)>,
    /// Bounding box in source image coordinates.
    pub source: Bounds,
}

/// Crops `bounds` out of the source image and mattes it: the foreground mask
/// is recomputed on the crop alone so that padding pixels touching unrelated
/// neighbors are classified independently, then alpha is set fully opaque on
/// foreground and fully transparent on background.
pub fn cut_sprite(image: &RgbaImage, model: &BackgroundModel, bounds: Bounds) -> RgbaImage {
    let mut crop = image
        .view(bounds.x1, bounds.y1, bounds.width(), bounds.height())
        .to_image();

    let mask = model.mask(&crop);
    crop.pixels_mut()
        .zip(mask.pixels())
        .for_each(|(pixel, matte)| {
            pixel[3] = if matte[0] == FOREGROUND { 255 } else { 0 };
        });
    crop
}

/// Output base name for an input path: file stem with the generator prefix
/// removed.
pub fn output_basename(input: &Path) -> Result<String, SplitError> {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| SplitError::BadInputPath(input.to_path_buf()))?;
    Ok(stem.strip_prefix(GENERATOR_PREFIX).unwrap_or(stem).to_owned())
}

pub fn sprite_filename(base: &str, index: usize) -> String {
    format!("{base}_{index:03}.png")
}

/// Destination for sprite crops: owns the output directory and base name,
/// and performs the final re-ordering rename for region extractions.
#[derive(Debug)]
pub struct SpriteSink {
    dir: PathBuf,
    base: String,
}

impl SpriteSink {
    /// Creates the output directory (and parents) if missing.
    pub fn new(dir: &Path, base: String) -> Result<Self, SplitError> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            base,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Encodes a crop under the name for `index` and returns that name.
    pub fn save(&self, index: usize, sprite: &RgbaImage) -> Result<String, SplitError> {
        let file = sprite_filename(&self.base, index);
        sprite.save(self.dir.join(&file))?;
        Ok(file)
    }

    /// Renames already-written crops so file names match the final record
    /// order, and rewrites each record's index and file name.
    ///
    /// Re-sorting can swap which index maps to which underlying file, so the
    /// rename is two-phase: every file moves to a temporary name first, then
    /// to its final name.
    pub fn commit_order(&self, records: &mut [SpriteRecord]) -> Result<(), SplitError> {
        for (position, record) in records.iter().enumerate() {
            fs::rename(self.dir.join(&record.file), self.dir.join(temp_name(position)))?;
        }
        for (position, record) in records.iter_mut().enumerate() {
            let file = sprite_filename(&self.base, position);
            fs::rename(self.dir.join(temp_name(position)), self.dir.join(&file))?;
            record.file = file;
            record.index = position;
        }
        Ok(())
    }
}

fn temp_name(position: usize) -> String {
    format!("_tmp_{position:03}.png")
}
