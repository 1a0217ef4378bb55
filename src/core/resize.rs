use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use fast_image_resize::{PixelType, ResizeOptions, Resizer, images::Image};
use image::{DynamicImage, ImageBuffer, Pixel};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::ResampleFilter;

pub const OUTPUT_DIR_NAME: &str = "resized";

/// `input/../resized`: a sibling of the input directory, never nested inside it.
pub fn output_dir_for(input_dir: &Path) -> PathBuf {
    input_dir.join("..").join(OUTPUT_DIR_NAME)
}

/// True for names ending in `.png`, ignoring ASCII case.
pub fn is_png_file_name(name: &OsStr) -> bool {
    name.to_string_lossy().to_ascii_lowercase().ends_with(".png")
}

pub fn resize_u8_pixels(
    data: &[u8],
    pixel_type: PixelType,
    (src_width, src_height): (u32, u32),
    (dst_width, dst_height): (u32, u32),
    filter: ResampleFilter,
) -> Result<Vec<u8>> {
    let resize_options = ResizeOptions::new().resize_alg(filter.resize_alg());
    let mut resizer = Resizer::new();

    let src_image = Image::from_vec_u8(src_width, src_height, data.to_vec(), pixel_type)?;
    let mut dst_image = Image::new(dst_width, dst_height, pixel_type);
    resizer.resize(&src_image, &mut dst_image, &resize_options)?;

    Ok(dst_image.into_vec())
}

pub fn resize_u16_pixels(
    data: &[u16],
    pixel_type: PixelType,
    src: (u32, u32),
    dst: (u32, u32),
    filter: ResampleFilter,
) -> Result<Vec<u16>> {
    // fast_image_resize takes 16-bit samples as native-endian byte pairs
    let mut src_bytes = Vec::with_capacity(data.len() * 2);
    for &v in data {
        src_bytes.extend_from_slice(&v.to_ne_bytes());
    }

    let dst_bytes = resize_u8_pixels(&src_bytes, pixel_type, src, dst, filter)?;

    let mut out = Vec::with_capacity(dst_bytes.len() / 2);
    for chunk in dst_bytes.chunks_exact(2) {
        out.push(u16::from_ne_bytes([chunk[0], chunk[1]]));
    }
    Ok(out)
}

fn from_raw<P: Pixel>(
    width: u32,
    height: u32,
    data: Vec<P::Subpixel>,
) -> Result<ImageBuffer<P, Vec<P::Subpixel>>> {
    ImageBuffer::from_raw(width, height, data).ok_or_else(|| {
        Error::Processing(format!(
            "resampled buffer does not match {}x{}",
            width, height
        ))
    })
}

/// Stretches `image` to exactly `width` x `height`, keeping its colour layout.
///
/// Floating point layouts have no PNG encoding, so they come back as 16-bit RGBA.
pub fn resize_to_exact(
    image: &DynamicImage,
    width: u32,
    height: u32,
    filter: ResampleFilter,
) -> Result<DynamicImage> {
    if width == 0 {
        return Err(Error::ZeroSize { arg: "width" });
    }
    if height == 0 {
        return Err(Error::ZeroSize { arg: "height" });
    }

    let src = (image.width(), image.height());
    let dst = (width, height);

    let resized = match image {
        DynamicImage::ImageLuma8(buf) => DynamicImage::ImageLuma8(from_raw(
            width,
            height,
            resize_u8_pixels(buf.as_raw(), PixelType::U8, src, dst, filter)?,
        )?),
        DynamicImage::ImageLumaA8(buf) => DynamicImage::ImageLumaA8(from_raw(
            width,
            height,
            resize_u8_pixels(buf.as_raw(), PixelType::U8x2, src, dst, filter)?,
        )?),
        DynamicImage::ImageRgb8(buf) => DynamicImage::ImageRgb8(from_raw(
            width,
            height,
            resize_u8_pixels(buf.as_raw(), PixelType::U8x3, src, dst, filter)?,
        )?),
        DynamicImage::ImageRgba8(buf) => DynamicImage::ImageRgba8(from_raw(
            width,
            height,
            resize_u8_pixels(buf.as_raw(), PixelType::U8x4, src, dst, filter)?,
        )?),
        DynamicImage::ImageLuma16(buf) => DynamicImage::ImageLuma16(from_raw(
            width,
            height,
            resize_u16_pixels(buf.as_raw(), PixelType::U16, src, dst, filter)?,
        )?),
        DynamicImage::ImageLumaA16(buf) => DynamicImage::ImageLumaA16(from_raw(
            width,
            height,
            resize_u16_pixels(buf.as_raw(), PixelType::U16x2, src, dst, filter)?,
        )?),
        DynamicImage::ImageRgb16(buf) => DynamicImage::ImageRgb16(from_raw(
            width,
            height,
            resize_u16_pixels(buf.as_raw(), PixelType::U16x3, src, dst, filter)?,
        )?),
        DynamicImage::ImageRgba16(buf) => DynamicImage::ImageRgba16(from_raw(
            width,
            height,
            resize_u16_pixels(buf.as_raw(), PixelType::U16x4, src, dst, filter)?,
        )?),
        other => {
            debug!("Converting {:?} to 16-bit RGBA before resampling", other.color());
            let widened = DynamicImage::ImageRgba16(other.to_rgba16());
            return resize_to_exact(&widened, width, height, filter);
        }
    };

    Ok(resized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ColorType, GenericImageView, Luma, Rgb, Rgb32FImage, RgbImage, Rgba, RgbaImage};

    #[test]
    fn output_dir_is_sibling_of_input() {
        let out = output_dir_for(Path::new("assets/unresized"));
        assert_eq!(out, Path::new("assets/unresized/../resized"));
        assert_ne!(out.parent(), Some(Path::new("assets/unresized")));
    }

    #[test]
    fn png_name_filter_ignores_case() {
        for name in ["a.png", "B.PNG", "c.Png", "icon@2x.pNg"] {
            assert!(is_png_file_name(OsStr::new(name)), "{name}");
        }
        for name in ["notes.txt", "a.png.bak", "png", "a_png", "photo.jpg"] {
            assert!(!is_png_file_name(OsStr::new(name)), "{name}");
        }
    }

    #[test]
    fn stretches_to_exact_dimensions() {
        let src = DynamicImage::ImageRgb8(RgbImage::from_pixel(80, 60, Rgb([200, 10, 30])));
        let out = resize_to_exact(&src, 144, 90, ResampleFilter::Lanczos3).unwrap();

        assert_eq!(out.dimensions(), (144, 90));
        assert_eq!(out.color(), ColorType::Rgb8);
        for (_, _, px) in out.pixels() {
            assert!(px[0].abs_diff(200) <= 1);
            assert!(px[1].abs_diff(10) <= 1);
            assert!(px[2].abs_diff(30) <= 1);
        }
    }

    #[test]
    fn keeps_alpha_channel() {
        let src = DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 16, Rgba([0, 0, 255, 128])));
        let out = resize_to_exact(&src, 7, 31, ResampleFilter::Lanczos3).unwrap();

        assert_eq!(out.color(), ColorType::Rgba8);
        assert_eq!(out.dimensions(), (7, 31));
        let px = out.get_pixel(3, 15);
        assert!(px[3].abs_diff(128) <= 1);
    }

    #[test]
    fn sixteen_bit_grey_survives_resampling() {
        let buf = ImageBuffer::<Luma<u16>, Vec<u16>>::from_pixel(10, 10, Luma([40_000]));
        let out = resize_to_exact(&DynamicImage::ImageLuma16(buf), 20, 5, ResampleFilter::Bilinear)
            .unwrap();

        assert_eq!(out.color(), ColorType::L16);
        let DynamicImage::ImageLuma16(out) = out else {
            panic!("expected 16-bit grey");
        };
        assert_eq!(out.dimensions(), (20, 5));
        assert!(out.get_pixel(10, 2)[0].abs_diff(40_000) <= 2);
    }

    #[test]
    fn float_images_are_widened_to_rgba16() {
        let src = DynamicImage::ImageRgb32F(Rgb32FImage::from_pixel(4, 4, Rgb([0.5, 0.5, 0.5])));
        let out = resize_to_exact(&src, 8, 2, ResampleFilter::Nearest).unwrap();

        assert_eq!(out.color(), ColorType::Rgba16);
        assert_eq!(out.dimensions(), (8, 2));
    }

    #[test]
    fn zero_target_is_rejected() {
        let src = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        assert!(matches!(
            resize_to_exact(&src, 0, 4, ResampleFilter::Lanczos3),
            Err(Error::ZeroSize { arg: "width" })
        ));
        assert!(matches!(
            resize_to_exact(&src, 4, 0, ResampleFilter::Lanczos3),
            Err(Error::ZeroSize { arg: "height" })
        ));
    }
}
