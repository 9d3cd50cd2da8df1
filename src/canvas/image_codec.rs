use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbaImage};

use crate::error::DrawingError;

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Encodes the buffer as a PNG data URL, the format canvases hand out.
pub fn encode_data_url(img: &RgbaImage) -> Result<String, DrawingError> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgba8)?;
    let mut url = String::with_capacity(PNG_DATA_URL_PREFIX.len() + bytes.len() * 4 / 3 + 4);
    url.push_str(PNG_DATA_URL_PREFIX);
    STANDARD.encode_string(&bytes, &mut url);
    Ok(url)
}

/// Decodes a `data:image/...;base64,` URL or a bare base64 payload.
pub fn decode(encoded: &str) -> Result<RgbaImage, DrawingError> {
    let trimmed = encoded.trim();
    let payload = if trimmed.starts_with("data:") {
        let (header, payload) = trimmed.split_once(',').ok_or(DrawingError::MalformedEncoding)?;
        if !header.ends_with(";base64") {
            return Err(DrawingError::MalformedEncoding);
        }
        payload
    } else {
        trimmed
    };
    if payload.is_empty() {
        return Err(DrawingError::MalformedEncoding);
    }
    let bytes = STANDARD.decode(payload)?;
    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}
