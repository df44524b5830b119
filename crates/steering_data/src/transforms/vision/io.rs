use image::{DynamicImage, ImageError, ImageReader};
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

// ============================================================================
// LoadImage
// ============================================================================

/// Loads images from file paths as 3-channel RGB8.
///
/// Reads the whole file through a buffered reader, guesses the format from the
/// content and decodes with the `image` crate. Any colour type is converted to
/// RGB8, so downstream transforms always see three channels.
///
/// # Example
/// ```ignore
/// let loader = LoadImage::new();
/// let image = loader.load(Path::new("images/000123.png"))?;
/// ```
#[derive(Debug, Clone)]
pub struct LoadImage {
    buffer_size: usize,
}

impl LoadImage {
    /// Creates a new image loader with an 8KB read buffer.
    pub fn new() -> Self {
        Self { buffer_size: 8192 }
    }

    /// Decodes `path`. A missing file surfaces as [`ImageError::IoError`].
    pub fn load(&self, path: &Path) -> Result<DynamicImage, ImageError> {
        let file = File::open(path)?;
        let file_size = file.metadata()?.len() as usize;
        let mut reader = BufReader::with_capacity(self.buffer_size, file);
        let mut buffer = Vec::with_capacity(file_size);
        reader.read_to_end(&mut buffer)?;

        let image = ImageReader::new(Cursor::new(buffer))
            .with_guessed_format()?
            .decode()?;

        Ok(match image {
            DynamicImage::ImageRgb8(_) => image,
            other => DynamicImage::ImageRgb8(other.into_rgb8()),
        })
    }
}

impl Default for LoadImage {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
