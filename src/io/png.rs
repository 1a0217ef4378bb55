use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;

/// Decodes an image, trusting its content over its file extension.
pub fn read_image(input: &Path) -> Result<DynamicImage> {
    let image = ImageReader::open(input)?.with_guessed_format()?.decode()?;
    Ok(image)
}

pub fn write_png(output: &Path, image: &DynamicImage) -> Result<()> {
    let file = File::create(output)?;
    let mut writer = BufWriter::new(file);
    image.write_to(&mut writer, ImageFormat::Png)?;
    writer.flush()?;
    Ok(())
}
