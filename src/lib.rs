//! Split a sprite sheet into individually cropped, background-matted
//! sprites, either along an FFT-detected regular grid or by
//! connected-component segmentation of the foreground.

mod background;
mod error;
mod grid;
mod manifest;
mod mode;
mod phase;
mod pipeline;
mod profile;
mod regions;
mod spectral;
mod sprite;

pub use background::{
    color_distance, estimate_background, BackgroundModel, BACKGROUND, FOREGROUND,
};
pub use error::SplitError;
pub use grid::{grid_lines, GridExtraction, GridOptions, CELL_OCCUPANCY_MIN};
pub use manifest::{write_manifest, MANIFEST_NAME};
pub use mode::{choose_mode, Mode, PEAK_STRENGTH_MIN};
pub use phase::find_offset;
pub use pipeline::{run, RunSummary, SplitConfig};
pub use profile::{column_profile, row_profile};
pub use regions::{smooth_mask, RegionOptions};
pub use spectral::{find_period, peak_to_mean, MIN_PERIOD};
pub use sprite::{
    cut_sprite, output_basename, sprite_filename, Bounds, SpriteRecord, SpriteSink,
    GENERATOR_PREFIX,
};

pub use grid::extract as extract_grid;
pub use regions::extract as extract_regions;
