use image::{GrayImage, Luma, RgbaImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode};
use imageproc::region_labelling::{connected_components, Connectivity};
use tracing::info;

use crate::background::{BackgroundModel, FOREGROUND};
use crate::error::SplitError;
use crate::sprite::{cut_sprite, Bounds, SpriteRecord, SpriteSink};

/// Dilation steps applied when no erosion is configured, to merge nearby
/// fragments of one sprite before labeling.
const DEFAULT_DILATION: u8 = 3;

/// Height of the row bands used to approximate reading order when sorting
/// regions.
const ROW_BAND: u32 = 50;

#[derive(Debug, Clone, Default)]
pub struct RegionOptions {
    pub min_size: u32,
    pub padding: u32,
    /// Erosion steps applied before an equal dilation. Breaks thin spurious
    /// connections such as anti-aliasing bridges. 0 selects the default
    /// dilation-only smoothing.
    pub erosion: u8,
}

/// Segments the foreground into 8-connected regions and emits one matted
/// crop per region large enough to keep, in reading order.
pub fn extract(
    image: &RgbaImage,
    model: &BackgroundModel,
    opts: &RegionOptions,
    sink: &SpriteSink,
) -> Result<Vec<SpriteRecord>, SplitError> {
    let (width, height) = image.dimensions();
    let mask = model.mask(image);
    let smoothed = smooth_mask(&mask, opts.erosion);

    let labels = connected_components(&smoothed, Connectivity::Eight, Luma([0u8]));
    let boxes = label_bounds(&labels, &mask);
    info!("found {} connected regions", boxes.len());

    let mut records = Vec::new();
    for bounds in boxes {
        let padded = bounds.pad_clamp(opts.padding, width, height);
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
            grid_pos: None,
            // Reading-order sort and the manifest use the tight box, not
            // the padded crop box.
            source: bounds,
        });
    }

    // Approximate reading order: coarse row bands, then left to right.
    records.sort_by_key(|record| (record.source.y1 / ROW_BAND, record.source.x1));
    sink.commit_order(&mut records)?;

    Ok(records)
}

/// Morphological smoothing of the foreground mask prior to labeling.
///
/// With `erosion > 0`: erode then dilate by the same amount (an opening),
/// removing thin connections while approximately preserving region extent.
/// Otherwise: dilate by [`DEFAULT_DILATION`], biased toward merging close
/// fragments rather than splitting a sprite.
pub fn smooth_mask(mask: &GrayImage, erosion: u8) -> GrayImage {
    if erosion > 0 {
        dilate(&erode(mask, Norm::LInf, erosion), Norm::LInf, erosion)
    } else {
        dilate(mask, Norm::LInf, DEFAULT_DILATION)
    }
}

/// Tight bounding box per label, computed over the original pre-smoothing
/// mask restricted to that label. Labels whose area contains no original
/// foreground (pure dilation artifacts) produce no box.
fn label_bounds(labels: &image::ImageBuffer<Luma<u32>, Vec<u32>>, mask: &GrayImage) -> Vec<Bounds> {
    let mut boxes: Vec<Option<Bounds>> = Vec::new();
    for (x, y, label) in labels.enumerate_pixels() {
        let label = label[0] as usize;
        if label == 0 || mask.get_pixel(x, y)[0] != FOREGROUND {
            continue;
        }
        if boxes.len() < label {
            boxes.resize(label, None);
        }
        let slot = &mut boxes[label - 1];
        *slot = Some(match *slot {
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
    boxes.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_with_rect(width: u32, height: u32, rect: Bounds) -> GrayImage {
        let mut mask = GrayImage::new(width, height);
        for y in rect.y1..rect.y2 {
            for x in rect.x1..rect.x2 {
                mask.put_pixel(x, y, Luma([FOREGROUND]));
            }
        }
        mask
    }

    #[test]
    fn opening_removes_thin_bridge_between_blocks() {
        // Two 10x10 blocks joined by a 1px-wide bridge.
        let mut mask = mask_with_rect(
            40,
            20,
            Bounds {
                x1: 2,
                y1: 5,
                x2: 12,
                y2: 15,
            },
        );
        for y in 5..15 {
            for x in 25..35 {
                mask.put_pixel(x, y, Luma([FOREGROUND]));
            }
        }
        for x in 12..25 {
            mask.put_pixel(x, 10, Luma([FOREGROUND]));
        }

        let smoothed = smooth_mask(&mask, 2);
        let labels = connected_components(&smoothed, Connectivity::Eight, Luma([0u8]));
        let boxes = label_bounds(&labels, &mask);
        assert_eq!(boxes.len(), 2);
    }

    #[test]
    fn default_smoothing_merges_close_fragments() {
        // Two fragments 3px apart; a 3-step dilation bridges them.
        let mut mask = mask_with_rect(
            30,
            10,
            Bounds {
                x1: 2,
                y1: 2,
                x2: 10,
                y2: 8,
            },
        );
        for y in 2..8 {
            for x in 13..21 {
                mask.put_pixel(x, y, Luma([FOREGROUND]));
            }
        }

        let smoothed = smooth_mask(&mask, 0);
        let labels = connected_components(&smoothed, Connectivity::Eight, Luma([0u8]));
        let boxes = label_bounds(&labels, &mask);
        assert_eq!(boxes.len(), 1);
        assert_eq!(
            boxes[0],
            Bounds {
                x1: 2,
                y1: 2,
                x2: 21,
                y2: 8
            }
        );
    }

    #[test]
    fn label_bounds_ignore_dilated_halo() {
        let mask = mask_with_rect(
            20,
            20,
            Bounds {
                x1: 8,
                y1: 8,
                x2: 12,
                y2: 12,
            },
        );
        let smoothed = smooth_mask(&mask, 0);
        let labels = connected_components(&smoothed, Connectivity::Eight, Luma([0u8]));
        let boxes = label_bounds(&labels, &mask);
        // The box tracks the original mask, not the dilated region.
        assert_eq!(
            boxes,
            vec![Bounds {
                x1: 8,
                y1: 8,
                x2: 12,
                y2: 12
            }]
        );
    }
}
