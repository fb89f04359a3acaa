use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, RgbaImage};

use super::BoundingBox;
use crate::error::AssetError;

/// Tight box around the pixels of a single frame with alpha > 0.
///
/// Returns `None` for a fully transparent frame so that it contributes
/// nothing when frames are combined.
pub fn frame_bounds(frame: &RgbaImage) -> Option<BoundingBox> {
    frame
        .enumerate_pixels()
        .filter(|(_, _, pixel)| pixel[3] > 0)
        .map(|(x, y, _)| BoundingBox::new(x, y, x + 1, y + 1))
        .reduce(BoundingBox::union)
}

/// Box enclosing the non-transparent content of every frame of an animation.
///
/// Per-frame boxes are folded together with [`BoundingBox::union`]. When no
/// frame has any content the full frame extent is returned, since a crop tool
/// cannot work with a zero-area box. All frames must share the size of the
/// first one.
pub fn animation_bounds<'a, I>(frames: I) -> Result<BoundingBox, AssetError>
where
    I: IntoIterator<Item = &'a RgbaImage>,
{
    let mut frames = frames.into_iter();
    let first = frames.next().ok_or(AssetError::EmptyAnimation)?;
    let (width, height) = first.dimensions();

    let content = std::iter::once(first).chain(frames).enumerate().try_fold(
        None,
        |acc: Option<BoundingBox>, (index, frame)| {
            let (w, h) = frame.dimensions();
            if (w, h) != (width, height) {
                return Err(AssetError::DimensionMismatch {
                    index,
                    width: w,
                    height: h,
                    expected_width: width,
                    expected_height: height,
                });
            }

            Ok(match (acc, frame_bounds(frame)) {
                (Some(total), Some(current)) => Some(total.union(current)),
                (total, current) => total.or(current),
            })
        },
    )?;

    Ok(content.unwrap_or_else(|| BoundingBox::full(width, height)))
}

/// Decode every frame of a GIF into full-canvas RGBA buffers
pub fn decode_animation(path: &Path) -> Result<Vec<RgbaImage>, AssetError> {
    let file = File::open(path).map_err(|e| AssetError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let decoder = GifDecoder::new(BufReader::new(file)).map_err(|e| AssetError::Decode {
        path: path.to_path_buf(),
        source: e,
    })?;

    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| AssetError::Decode {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(frames.into_iter().map(image::Frame::into_buffer).collect())
}

/// Decode an animation from disk and compute its combined content box
pub fn measure_animation(path: &Path) -> Result<BoundingBox, AssetError> {
    let frames = decode_animation(path)?;
    animation_bounds(&frames)
}
