use crate::file::SelectedFile;
use image::GenericImageView;
use std::sync::Arc;

/// Longest edge of a decoded preview, in pixels.
pub const PREVIEW_MAX_EDGE: u32 = 320;

/// Decoded RGBA8 thumbnail ready to be handed to a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<[u8]>,
}

impl PreviewImage {
    pub fn decode(file: &SelectedFile, max_edge: u32) -> image::ImageResult<Self> {
        let img = image::load_from_memory(file.bytes())?;
        let (w, h) = img.dimensions();
        let img = if w > max_edge || h > max_edge {
            img.thumbnail(max_edge, max_edge)
        } else {
            img
        };
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            rgba: rgba.into_raw().into(),
        })
    }
}

/// What the preview area displays once the user asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub file_name: String,
    /// `None` when the bytes could not be decoded as an image.
    pub image: Option<PreviewImage>,
}

impl Preview {
    pub fn for_file(file: &SelectedFile) -> Self {
        let image = match PreviewImage::decode(file, PREVIEW_MAX_EDGE) {
            Ok(img) => Some(img),
            Err(e) => {
                tracing::warn!("Failed to decode preview for {}: {}", file.name(), e);
                None
            }
        };
        Self {
            file_name: file.name().to_string(),
            image,
        }
    }
}
