//! Decoded tile bitmaps and drawing surfaces.
//!
//! A [`Bitmap`] owns an RGBA8 pixel buffer. Bitmaps are shared as
//! `Arc<Bitmap>` between the cache and callers, so the buffer is freed as
//! soon as the last holder drops it.

use image::{imageops, RgbaImage};
use tracing::{trace, warn};

use crate::error::TileError;

/// A decoded, drawable raster tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    image: RgbaImage,
}

impl Bitmap {
    /// Wrap an already-decoded RGBA image.
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Decode encoded image bytes (PNG, JPEG).
    ///
    /// This is CPU-bound; async callers should use [`decode_blocking`].
    pub fn decode(data: &[u8]) -> Result<Self, TileError> {
        let img = image::load_from_memory(data).map_err(|e| {
            warn!(bytes = data.len(), error = %e, "Failed to decode tile image");
            TileError::Decode(e.to_string())
        })?;
        let image = img.to_rgba8();
        trace!(width = image.width(), height = image.height(), "Decoded tile image");
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Size of the pixel buffer in bytes.
    pub fn byte_len(&self) -> usize {
        self.image.as_raw().len()
    }

    /// Borrow the underlying pixels.
    pub fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }
}

/// Decode on Tokio's blocking pool so the async executor is not stalled.
pub async fn decode_blocking(data: bytes::Bytes) -> Result<Bitmap, TileError> {
    tokio::task::spawn_blocking(move || Bitmap::decode(&data))
        .await
        .map_err(|e| TileError::Internal(format!("decode task failed: {}", e)))?
}

/// A 2D surface a bitmap can be drawn onto.
pub trait DrawSurface {
    /// Draw `bitmap` with its top-left corner at (`x`, `y`).
    ///
    /// Offsets may be negative; pixels falling outside the surface are
    /// clipped.
    fn draw_bitmap(&mut self, bitmap: &Bitmap, x: i64, y: i64);
}

/// Alpha-composites the bitmap over the existing pixels.
impl DrawSurface for RgbaImage {
    fn draw_bitmap(&mut self, bitmap: &Bitmap, x: i64, y: i64) {
        imageops::overlay(self, bitmap.as_rgba(), x, y);
    }
}
