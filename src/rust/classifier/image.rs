use std::fmt;
use std::io::Cursor;

use image::ImageReader;
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::error::ClassifierError;
use crate::runtime::ImageConfig;

/// Upload formats the demo understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
    Other,
}

impl ImageFormat {
    /// Maps a file extension (without the dot) to a format
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Self::Jpeg,
            "png" => Self::Png,
            "webp" => Self::Webp,
            _ => Self::Other,
        }
    }
}

impl From<image::ImageFormat> for ImageFormat {
    fn from(format: image::ImageFormat) -> Self {
        match format {
            image::ImageFormat::Jpeg => Self::Jpeg,
            image::ImageFormat::Png => Self::Png,
            image::ImageFormat::WebP => Self::Webp,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// A stable summary of an uploaded image: its dimensions, format, size and
/// the SHA-256 of its bytes. Two uploads of the same file yield equal
/// descriptors, which is all the predictor needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ImageDescriptor {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub byte_len: usize,
    #[serde(skip)]
    pub digest: [u8; 32],
}

impl ImageDescriptor {
    /// Builds a descriptor for bytes whose dimensions are already known
    pub fn new(bytes: &[u8], width: u32, height: u32, format: ImageFormat) -> Self {
        Self {
            width,
            height,
            format,
            byte_len: bytes.len(),
            digest: Sha256::digest(bytes).into(),
        }
    }

    /// Sniffs the format and reads the dimensions from the image header.
    ///
    /// # Errors
    /// `Image` if the bytes are not a recognizable image.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ClassifierError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(image::ImageError::from)?;
        let format = reader.format().map(ImageFormat::from).unwrap_or(ImageFormat::Other);
        let (width, height) = reader.into_dimensions()?;
        Ok(Self::new(bytes, width, height, format))
    }

    /// Whether a file extension (without the dot) names the sniffed format
    pub fn matches_extension(&self, ext: &str) -> bool {
        self.format != ImageFormat::Other && ImageFormat::from_extension(ext) == self.format
    }

    /// Lowercase hex of the content digest
    pub fn digest_hex(&self) -> String {
        self.digest.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

/// Checks an upload against the configured limits.
///
/// # Errors
/// `ValidationError` when the image has a zero dimension, a format outside the
/// allow-list, or exceeds the size limit.
pub fn validate_image(image: &ImageDescriptor, config: &ImageConfig) -> Result<(), ClassifierError> {
    if image.width == 0 || image.height == 0 {
        return Err(ClassifierError::ValidationError(format!(
            "Image has invalid dimensions {}x{}",
            image.width, image.height
        )));
    }
    if !config.allowed_formats.contains(&image.format) {
        return Err(ClassifierError::ValidationError(format!(
            "Image format '{}' is not accepted",
            image.format
        )));
    }
    if image.byte_len > config.max_size_bytes() {
        return Err(ClassifierError::ValidationError(format!(
            "Image is too large ({} bytes, max is {} MB)",
            image.byte_len, config.max_size_mb
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent PNG
    const TINY_PNG: [u8; 67] = [
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
        0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    #[test]
    fn test_from_bytes_reads_png_header() {
        let descriptor = ImageDescriptor::from_bytes(&TINY_PNG).unwrap();
        assert_eq!(descriptor.format, ImageFormat::Png);
        assert_eq!((descriptor.width, descriptor.height), (1, 1));
        assert_eq!(descriptor.byte_len, TINY_PNG.len());
        assert_eq!(descriptor.digest_hex().len(), 64);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(ImageDescriptor::from_bytes(b"definitely not an image").is_err());
    }

    #[test]
    fn test_same_bytes_same_descriptor() {
        let a = ImageDescriptor::new(b"pixels", 640, 480, ImageFormat::Jpeg);
        let b = ImageDescriptor::new(b"pixels", 640, 480, ImageFormat::Jpeg);
        let c = ImageDescriptor::new(b"other pixels", 640, 480, ImageFormat::Jpeg);
        assert_eq!(a, b);
        assert_ne!(a.digest, c.digest);
    }

    #[test]
    fn test_validate_image() {
        let config = ImageConfig::default();
        let ok = ImageDescriptor::new(b"pixels", 224, 224, ImageFormat::Webp);
        assert!(validate_image(&ok, &config).is_ok());

        let flat = ImageDescriptor::new(b"pixels", 0, 224, ImageFormat::Png);
        assert!(matches!(validate_image(&flat, &config), Err(ClassifierError::ValidationError(_))));

        let gif = ImageDescriptor::new(b"pixels", 10, 10, ImageFormat::Other);
        assert!(validate_image(&gif, &config).is_err());

        let mut huge = ok.clone();
        huge.byte_len = config.max_size_bytes() + 1;
        assert!(validate_image(&huge, &config).is_err());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ImageFormat::from_extension("JPG"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_extension("webp"), ImageFormat::Webp);
        assert_eq!(ImageFormat::from_extension("gif"), ImageFormat::Other);
    }
}
