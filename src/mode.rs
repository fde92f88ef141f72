use std::fmt;

use image::RgbaImage;

use crate::background::BackgroundModel;
use crate::profile::{column_profile, row_profile};
use crate::spectral::{find_period, peak_to_mean, MIN_PERIOD};

/// Peak-to-mean spectral ratio above which periodicity is trusted enough to
/// extract along a regular grid.
pub const PEAK_STRENGTH_MIN: f32 = 5.0;

/// Extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Partition along a detected or forced regular grid.
    Grid,
    /// Segment into connected foreground regions.
    Detect,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Grid => f.write_str("grid"),
            Mode::Detect => f.write_str("detect"),
        }
    }
}

/// Chooses the extraction strategy from the strength of the spectral signal.
///
/// Grid extraction is selected only when both axes yield a period and the
/// column spectrum's peak stands out from its mean by more than
/// [`PEAK_STRENGTH_MIN`]; anything weaker falls back to region detection.
/// One-shot: the caller commits to the result for the whole run.
pub fn choose_mode(image: &RgbaImage, model: &BackgroundModel) -> Mode {
    let mask = model.mask(image);
    let col_profile = column_profile(&mask);
    let row_profile = row_profile(&mask);

    let col_period = find_period(&col_profile, MIN_PERIOD);
    let row_period = find_period(&row_profile, MIN_PERIOD);

    if col_period.is_some() && row_period.is_some() && peak_to_mean(&col_profile) > PEAK_STRENGTH_MIN
    {
        Mode::Grid
    } else {
        Mode::Detect
    }
}
