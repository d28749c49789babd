use anyhow::{bail, Result};
use image::DynamicImage;
use std::path::Path;

/// Open and decode an image file.
///
/// The two failures a user can hit are reported before any grid work starts,
/// so no partial output ever precedes them.
pub fn open_image(path: &str) -> Result<DynamicImage> {
    if !Path::new(path).exists() {
        bail!("File \"{}\" not found", path);
    }

    match image::open(path) {
        Ok(img) => Ok(img),
        Err(image::ImageError::Unsupported(_)) | Err(image::ImageError::Decoding(_)) => {
            bail!("Unknown image format")
        }
        Err(err) => Err(anyhow::Error::new(err).context(format!("Failed to read \"{}\"", path))),
    }
}
