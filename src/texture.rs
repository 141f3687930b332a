// texture.rs — panorama decode, fit-resize and horizontal mirror

use crate::config::TextureConfig;
use crate::error::DecodeError;
use image::io::Reader as ImageReader;
use image::{GenericImageView, RgbaImage};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Bounding box a decoded panorama is scaled into (aspect ratio preserved).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl From<&TextureConfig> for TargetSize {
    fn from(c: &TextureConfig) -> Self {
        Self {
            width: c.width.max(1),
            height: c.height.max(1),
        }
    }
}

impl Default for TargetSize {
    fn default() -> Self {
        Self::from(&TextureConfig::default())
    }
}

/// Pixels ready to be bound as the sphere's diffuse map.
#[derive(Debug, Clone)]
pub struct PanoramaTexture {
    pub source: PathBuf,
    pub pixels: RgbaImage,
}

impl PanoramaTexture {
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn display_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

pub fn load_panorama(path: &Path, target: TargetSize) -> Result<PanoramaTexture, DecodeError> {
    let file = File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let img = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)
        .and_then(|mut r| {
            r.no_limits();
            r.decode()
        })
        .map_err(|source| DecodeError::Image {
            path: path.to_path_buf(),
            source,
        })?;

    let (w, h) = img.dimensions();
    log::debug!("Decoded {} ({}x{})", path.display(), w, h);

    let img = if (w, h) == (target.width, target.height) {
        img
    } else {
        img.resize(target.width, target.height, image::imageops::FilterType::Triangle)
    };

    let mut pixels = img.to_rgba8();
    image::imageops::flip_horizontal_in_place(&mut pixels);

    Ok(PanoramaTexture {
        source: path.to_path_buf(),
        pixels,
    })
}
