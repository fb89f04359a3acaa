use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};

use super::ensure_parent_dir;
use crate::cli::CompressionLevel;
use crate::error::AssetError;

/// Save an image as PNG, optionally recompressed with oxipng
pub fn save_png(
    image: &RgbaImage,
    path: &Path,
    compress: Option<CompressionLevel>,
) -> Result<(), AssetError> {
    let mut png_data = Cursor::new(Vec::new());
    image
        .write_to(&mut png_data, ImageFormat::Png)
        .map_err(|e| AssetError::ImageSave {
            path: path.to_path_buf(),
            source: e,
        })?;

    let output_data = if let Some(level) = compress {
        let opts = match level {
            CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
            CompressionLevel::Max => oxipng::Options::max_compression(),
        };
        oxipng::optimize_from_memory(&png_data.into_inner(), &opts).map_err(|e| {
            AssetError::PngCompress {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?
    } else {
        png_data.into_inner()
    };

    ensure_parent_dir(path)?;
    fs::write(path, output_data).map_err(|e| AssetError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_save_png_creates_directory() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("processed_square_0").join("alice.png");
        let img = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 255]));

        save_png(&img, &path, None).unwrap();

        let loaded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(loaded, img);
    }

    #[test]
    fn test_save_png_compressed_is_lossless() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("small.png");
        let mut img = RgbaImage::new(16, 16);
        img.put_pixel(4, 4, Rgba([200, 10, 10, 255]));

        save_png(&img, &path, Some(CompressionLevel::Level(1))).unwrap();

        let loaded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(loaded, img);
    }
}
