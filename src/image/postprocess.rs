//! Resizing generated images for download.

use crate::error::Result;
use image::imageops::FilterType;
use image::DynamicImage;
use std::io::Cursor;

/// Width of the downloadable image.
pub const OUTPUT_WIDTH: u32 = 1920;
/// Height of the downloadable image.
pub const OUTPUT_HEIGHT: u32 = 1080;

/// A decoded original together with its 1920x1080 PNG re-encoding.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    /// The image as returned by the generator.
    pub original: DynamicImage,
    /// PNG bytes, exactly [`OUTPUT_WIDTH`] x [`OUTPUT_HEIGHT`].
    pub png: Vec<u8>,
}

/// Decodes `bytes`, stretches to 1920x1080 with Lanczos3 and encodes as PNG.
///
/// The input format is guessed from content, and the aspect ratio is not preserved.
pub fn process(bytes: &[u8]) -> Result<ProcessedImage> {
    let original = image::load_from_memory(bytes)?;
    let png = resize_to_png(&original)?;
    Ok(ProcessedImage { original, png })
}

/// Resizes an already decoded image and encodes the result as PNG.
pub fn resize_to_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let resized = img.resize_exact(OUTPUT_WIDTH, OUTPUT_HEIGHT, FilterType::Lanczos3);
    let mut buf = Cursor::new(Vec::new());
    resized.write_to(&mut buf, image::ImageFormat::Png)?;
    tracing::debug!(
        from_width = img.width(),
        from_height = img.height(),
        png_bytes = buf.get_ref().len(),
        "resized image for download"
    );
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChitrakarError;
    use crate::image::ImageFormat;
    use image::{GenericImageView, Rgb, RgbImage};

    fn encoded(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img).write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_square_png_is_stretched() {
        let processed = process(&encoded(64, 64, image::ImageFormat::Png)).unwrap();

        assert_eq!(processed.original.dimensions(), (64, 64));
        assert_eq!(ImageFormat::from_magic_bytes(&processed.png), Some(ImageFormat::Png));

        let reloaded = image::load_from_memory(&processed.png).unwrap();
        assert_eq!(reloaded.dimensions(), (OUTPUT_WIDTH, OUTPUT_HEIGHT));
    }

    #[test]
    fn test_jpeg_input_becomes_png() {
        let processed = process(&encoded(40, 30, image::ImageFormat::Jpeg)).unwrap();
        assert_eq!(ImageFormat::from_magic_bytes(&processed.png), Some(ImageFormat::Png));
        let reloaded = image::load_from_memory(&processed.png).unwrap();
        assert_eq!(reloaded.dimensions(), (OUTPUT_WIDTH, OUTPUT_HEIGHT));
    }

    #[test]
    fn test_garbage_is_an_image_error() {
        let err = process(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ChitrakarError::Image(_)));
    }
}
