//! Uploaded image intake.
//!
//! Uploads are decoded once to reject non-images and to log their size and
//! colour mode. Formats the model accepts directly are forwarded byte-for-byte;
//! everything else is re-encoded as PNG.

use std::io::Cursor;

use image::{ColorType, DynamicImage, ImageFormat, ImageOutputFormat};
use thiserror::Error;

use crate::ports::ImagePart;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("uploaded image is empty")]
    Empty,

    #[error("cannot identify image file: {0}")]
    Unrecognized(#[source] image::ImageError),

    #[error("cannot decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("cannot re-encode image: {0}")]
    Encode(#[source] image::ImageError),
}

/// A decoded upload, ready to be attached to a completion request.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    data: Vec<u8>,
    mime_type: &'static str,
    width: u32,
    height: u32,
    mode: &'static str,
    reencoded: bool,
}

impl UploadedImage {
    /// Validates and normalizes raw upload bytes.
    pub fn decode(bytes: Vec<u8>) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }

        let format = image::guess_format(&bytes).map_err(ImageError::Unrecognized)?;
        let decoded =
            image::load_from_memory_with_format(&bytes, format).map_err(ImageError::Decode)?;

        let width = decoded.width();
        let height = decoded.height();
        let mode = color_mode(decoded.color());

        match passthrough_mime(format) {
            Some(mime_type) => Ok(Self {
                data: bytes,
                mime_type,
                width,
                height,
                mode,
                reencoded: false,
            }),
            None => {
                let png = encode_png(&decoded)?;
                Ok(Self {
                    data: png,
                    mime_type: "image/png",
                    width,
                    height,
                    mode,
                    reencoded: true,
                })
            }
        }
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Colour mode label (`RGB`, `RGBA`, `L`, ...).
    pub fn mode(&self) -> &'static str {
        self.mode
    }

    /// True when the upload was converted to PNG.
    pub fn was_reencoded(&self) -> bool {
        self.reencoded
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consumes the upload into a request attachment.
    pub fn into_part(self) -> ImagePart {
        ImagePart::new(self.mime_type, self.data)
    }
}

fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, ImageError> {
    let mut png = Vec::new();
    let target = &mut Cursor::new(&mut png);
    match image.color() {
        // PNG has no float samples (HDR, OpenEXR).
        ColorType::Rgb32F | ColorType::Rgba32F => {
            DynamicImage::ImageRgba8(image.to_rgba8()).write_to(target, ImageOutputFormat::Png)
        }
        _ => image.write_to(target, ImageOutputFormat::Png),
    }
    .map_err(ImageError::Encode)?;
    Ok(png)
}

fn passthrough_mime(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::WebP => Some("image/webp"),
        _ => None,
    }
}

fn color_mode(color: ColorType) -> &'static str {
    match color {
        ColorType::L8 => "L",
        ColorType::La8 => "LA",
        ColorType::Rgb8 => "RGB",
        ColorType::Rgba8 => "RGBA",
        ColorType::L16 => "I;16",
        ColorType::La16 => "LA;16",
        ColorType::Rgb16 => "RGB;16",
        ColorType::Rgba16 => "RGBA;16",
        ColorType::Rgb32F => "RGB;F",
        ColorType::Rgba32F => "RGBA;F",
        _ => "other",
    }
}
