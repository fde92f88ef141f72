use image::{GrayImage, Luma, Rgb, Rgba, RgbaImage};

/// Mask value for pixels classified as sprite content.
pub const FOREGROUND: u8 = 255;
/// Mask value for pixels classified as background.
pub const BACKGROUND: u8 = 0;

/// Background classifier built from one or two reference colors and a
/// Euclidean RGB distance tolerance.
///
/// Two reference colors cover sheets where a checkerboard "transparency"
/// pattern is baked in as two alternating solid fills.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundModel {
    primary: Rgb<f32>,
    secondary: Option<Rgb<f32>>,
    tolerance: f32,
}

impl BackgroundModel {
    pub fn new(primary: Rgb<f32>, secondary: Option<Rgb<f32>>, tolerance: f32) -> Self {
        Self {
            primary,
            secondary,
            tolerance,
        }
    }

    /// Builds a model whose primary color is estimated from the image
    /// corners.
    pub fn from_corners(image: &RgbaImage, tolerance: f32) -> Self {
        Self::new(estimate_background(image), None, tolerance)
    }

    pub fn primary(&self) -> Rgb<f32> {
        self.primary
    }

    pub fn secondary(&self) -> Option<Rgb<f32>> {
        self.secondary
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Whether a pixel lies within tolerance of either reference color.
    pub fn is_background(&self, pixel: Rgba<u8>) -> bool {
        let color = pixel_rgb(pixel);
        if color_distance(color, self.primary) <= self.tolerance {
            return true;
        }
        match self.secondary {
            Some(secondary) => color_distance(color, secondary) <= self.tolerance,
            None => false,
        }
    }

    /// Builds the foreground mask: [`FOREGROUND`] where a pixel differs from
    /// every reference color by more than the tolerance, [`BACKGROUND`]
    /// elsewhere.
    pub fn mask(&self, image: &RgbaImage) -> GrayImage {
        let (width, height) = image.dimensions();
        GrayImage::from_fn(width, height, |x, y| {
            if self.is_background(*image.get_pixel(x, y)) {
                Luma([BACKGROUND])
            } else {
                Luma([FOREGROUND])
            }
        })
    }
}

/// Estimates the background color as the mean RGB of the four corner pixels.
pub fn estimate_background(image: &RgbaImage) -> Rgb<f32> {
    let (width, height) = image.dimensions();
    let corners = [
        (0, 0),
        (width.saturating_sub(1), 0),
        (0, height.saturating_sub(1)),
        (width.saturating_sub(1), height.saturating_sub(1)),
    ];

    let mut sum = [0.0f32; 3];
    for (x, y) in corners {
        let Rgb([r, g, b]) = pixel_rgb(*image.get_pixel(x, y));
        sum[0] += r;
        sum[1] += g;
        sum[2] += b;
    }
    Rgb([sum[0] / 4.0, sum[1] / 4.0, sum[2] / 4.0])
}

/// Euclidean distance between two colors in RGB space.
pub fn color_distance(a: Rgb<f32>, b: Rgb<f32>) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    (dr * dr + dg * dg + db * db).sqrt()
}

fn pixel_rgb(pixel: Rgba<u8>) -> Rgb<f32> {
    let Rgba([r, g, b, _]) = pixel;
    Rgb([f32::from(r), f32::from(g), f32::from(b)])
}
