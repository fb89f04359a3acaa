use image::{DynamicImage, Rgba, RgbaImage};

use super::BoundingBox;

/// Channel difference from the corner colour above which a pixel counts as content
pub const DEFAULT_THRESHOLD: u8 = 100;

/// Which channels are compared against the corner pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    /// Transparency only; colour left behind in invisible pixels is ignored
    Alpha,
    /// Red, green and blue, for images without transparency
    Color,
}

impl Channels {
    /// Alpha for images that carry an alpha channel, colour otherwise
    pub fn for_image(image: &DynamicImage) -> Self {
        if image.color().has_alpha() {
            Channels::Alpha
        } else {
            Channels::Color
        }
    }
}

/// Box around the pixels that differ from the top-left corner colour.
///
/// The corner pixel is taken as the background. A pixel is content when one
/// of the compared `channels` differs from it by more than `threshold`.
/// Returns `None` when nothing stands out, i.e. there is nothing to crop.
pub fn content_bounds(
    image: &RgbaImage,
    threshold: u8,
    channels: Channels,
) -> Option<BoundingBox> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    let background = *image.get_pixel(0, 0);

    image
        .enumerate_pixels()
        .filter(|(_, _, pixel)| differs(pixel, &background, threshold, channels))
        .map(|(x, y, _)| BoundingBox::new(x, y, x + 1, y + 1))
        .reduce(BoundingBox::union)
}

fn differs(pixel: &Rgba<u8>, background: &Rgba<u8>, threshold: u8, channels: Channels) -> bool {
    let mut compared = match channels {
        Channels::Alpha => 3..4,
        Channels::Color => 0..3,
    };
    compared.any(|c| pixel[c].abs_diff(background[c]) > threshold)
}

/// Crop a still image down to its content box
pub fn crop_to_content(
    image: &RgbaImage,
    threshold: u8,
    channels: Channels,
) -> Option<(RgbaImage, BoundingBox)> {
    let bounds = content_bounds(image, threshold, channels)?;
    let cropped =
        image::imageops::crop_imm(image, bounds.x1, bounds.y1, bounds.width(), bounds.height())
            .to_image();
    Some((cropped, bounds))
}
