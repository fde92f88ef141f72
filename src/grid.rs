use image::{GrayImage, RgbaImage};
use itertools::Itertools;
use tracing::{debug, info, warn};

use crate::background::{BackgroundModel, FOREGROUND};
use crate::error::SplitError;
use crate::phase::find_offset;
use crate::profile::{column_profile, row_profile};
use crate::spectral::{find_period, MIN_PERIOD};
use crate::sprite::{cut_sprite, Bounds, SpriteRecord, SpriteSink};

/// Minimum share of foreground pixels for a grid cell to count as occupied.
pub const CELL_OCCUPANCY_MIN: f32 = 0.05;

#[derive(Debug, Clone, Default)]
pub struct GridOptions {
    pub min_size: u32,
    pub padding: u32,
    /// Forces the column count; the period becomes `width / cols` and only
    /// the phase search runs.
    pub force_cols: Option<u32>,
    /// Forces the row count, analogous to `force_cols`.
    pub force_rows: Option<u32>,
}

/// Result of a successful grid extraction: the accepted sprites plus the
/// manifest annotation describing the detected geometry.
#[derive(Debug)]
pub struct GridExtraction {
    pub records: Vec<SpriteRecord>,
    pub annotation: String,
}

/// Partitions the image along a detected (or forced) grid and emits one
/// matted crop per occupied cell.
///
/// Returns `Ok(None)` when the period of either axis cannot be determined;
/// no partial or guessed grid is ever emitted.
pub fn extract(
    image: &RgbaImage,
    model: &BackgroundModel,
    opts: &GridOptions,
    sink: &SpriteSink,
) -> Result<Option<GridExtraction>, SplitError> {
    let (width, height) = image.dimensions();
    let mask = model.mask(image);

    let foreground_pct = 100.0 * mask.pixels().filter(|p| p[0] == FOREGROUND).count() as f32
        / (width * height) as f32;
    debug!("sprite pixels: {foreground_pct:.1}%");

    let col_profile = column_profile(&mask);
    let row_profile = row_profile(&mask);

    let col_period = axis_period(&col_profile, width, opts.force_cols);
    let row_period = axis_period(&row_profile, height, opts.force_rows);
    let (Some(col_period), Some(row_period)) = (col_period, row_period) else {
        warn!(
            "could not detect a grid period; use --mode detect or force \
             dimensions with --cols/--rows"
        );
        return Ok(None);
    };

    let n_cols = (width as f32 / col_period as f32).round() as u32;
    let n_rows = (height as f32 / row_period as f32).round() as u32;
    info!("grid: {n_cols} cols (period={col_period}px) x {n_rows} rows (period={row_period}px)");

    let col_offset = find_offset(&col_profile, col_period);
    let row_offset = find_offset(&row_profile, row_period);
    info!("offset: col={col_offset}, row={row_offset}");

    let col_lines = grid_lines(width, col_period, col_offset);
    let row_lines = grid_lines(height, row_period, row_offset);

    let mut records = Vec::new();
    for (row, (&cell_y1, &cell_y2)) in row_lines.iter().tuple_windows().enumerate() {
        for (col, (&cell_x1, &cell_x2)) in col_lines.iter().tuple_windows().enumerate() {
            let cell = Bounds {
                x1: cell_x1,
                y1: cell_y1,
                x2: cell_x2,
                y2: cell_y2,
            };
            if cell_occupancy(&mask, cell) < CELL_OCCUPANCY_MIN {
                continue;
            }
            let Some(tight) = content_bounds(&mask, cell) else {
                continue;
            };

            let padded = tight.pad_clamp(opts.padding, width, height);
            if padded.width() < opts.min_size || padded.height() < opts.min_size {
                continue;
            }

            let index = records.len();
            let sprite = cut_sprite(image, model, padded);
            let file = sink.save(index, &sprite)?;
            records.push(SpriteRecord {
                index,
                file,
                width: padded.width(),
                height: padded.height(),
                grid_pos: Some((row, col)),
                source: padded,
            });
        }
    }

    Ok(Some(GridExtraction {
        records,
        annotation: format!(
            "Grid: {n_cols}x{n_rows}, period: {col_period}x{row_period}"
        ),
    }))
}

/// Period for one axis: `extent / count` when the caller forces a count,
/// otherwise the spectral estimate. `None` when neither yields a usable
/// (positive) period.
fn axis_period(profile: &[f32], extent: u32, forced: Option<u32>) -> Option<usize> {
    match forced {
        Some(count) if count > 0 => {
            let period = (extent / count) as usize;
            (period > 0).then_some(period)
        }
        Some(_) => None,
        None => find_period(profile, MIN_PERIOD),
    }
}

/// Grid line positions `offset, offset + period, ...`, extended so the
/// sequence always starts at 0 and ends at `extent`.
pub fn grid_lines(extent: u32, period: usize, offset: usize) -> Vec<u32> {
    let mut lines: Vec<u32> = (offset..=extent as usize)
        .step_by(period)
        .map(|line| line as u32)
        .collect();

    if lines.first() != Some(&0) {
        lines.insert(0, 0);
    }
    if lines.last() != Some(&extent) {
        lines.push(extent);
    }
    lines
}

fn cell_occupancy(mask: &GrayImage, cell: Bounds) -> f32 {
    let area = cell.width() as f32 * cell.height() as f32;
    if area == 0.0 {
        return 0.0;
    }
    let mut count = 0u32;
    for y in cell.y1..cell.y2 {
        for x in cell.x1..cell.x2 {
            if mask.get_pixel(x, y)[0] == FOREGROUND {
                count += 1;
            }
        }
    }
    count as f32 / area
}

/// Tight bounding box of foreground pixels within `cell`, in image
/// coordinates. `None` for cells with no foreground at all.
fn content_bounds(mask: &GrayImage, cell: Bounds) -> Option<Bounds> {
    let mut bounds: Option<Bounds> = None;
    for y in cell.y1..cell.y2 {
        for x in cell.x1..cell.x2 {
            if mask.get_pixel(x, y)[0] != FOREGROUND {
                continue;
            }
            bounds = Some(match bounds {
                None => Bounds {
                    x1: x,
                    y1: y,
                    x2: x + 1,
                    y2: y + 1,
                },
                Some(b) => Bounds {
                    x1: b.x1.min(x),
                    y1: b.y1.min(y),
                    x2: b.x2.max(x + 1),
                    y2: b.y2.max(y + 1),
                },
            });
        }
    }
    bounds
}
