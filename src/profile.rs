use image::GrayImage;

use crate::background::FOREGROUND;

/// Per-column foreground pixel counts. Length equals the mask width.
pub fn column_profile(mask: &GrayImage) -> Vec<f32> {
    let (width, height) = mask.dimensions();
    let mut profile = vec![0.0f32; width as usize];
    for y in 0..height {
        for x in 0..width {
            if mask.get_pixel(x, y)[0] == FOREGROUND {
                profile[x as usize] += 1.0;
            }
        }
    }
    profile
}

/// Per-row foreground pixel counts. Length equals the mask height.
pub fn row_profile(mask: &GrayImage) -> Vec<f32> {
    let (width, height) = mask.dimensions();
    let mut profile = vec![0.0f32; height as usize];
    for y in 0..height {
        for x in 0..width {
            if mask.get_pixel(x, y)[0] == FOREGROUND {
                profile[y as usize] += 1.0;
            }
        }
    }
    profile
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn profiles_count_foreground_cells() {
        let mut mask = GrayImage::new(4, 3);
        mask.put_pixel(1, 0, Luma([FOREGROUND]));
        mask.put_pixel(1, 1, Luma([FOREGROUND]));
        mask.put_pixel(3, 2, Luma([FOREGROUND]));

        assert_eq!(column_profile(&mask), vec![0.0, 2.0, 0.0, 1.0]);
        assert_eq!(row_profile(&mask), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn profile_lengths_match_dimensions() {
        let mask = GrayImage::new(7, 5);
        assert_eq!(column_profile(&mask).len(), 7);
        assert_eq!(row_profile(&mask).len(), 5);
    }
}
