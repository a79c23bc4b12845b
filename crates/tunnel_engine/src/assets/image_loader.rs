//! Avatar image decoding
//!
//! Decodes fetched avatar bytes (PNG) into RGBA8 pixels ready for texture
//! upload by the renderer.

use super::AvatarError;

/// Side length of generated placeholder avatars
pub const PLACEHOLDER_SIZE: u32 = 64;

/// Placeholder tint for players without a color
pub const NEUTRAL_TINT: [u8; 4] = [96, 96, 104, 255];

/// Decoded avatar pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarImage {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl AvatarImage {
    /// Decode an avatar from encoded bytes
    pub fn from_bytes(url: &str, bytes: &[u8]) -> Result<Self, AvatarError> {
        let img = image::load_from_memory(bytes).map_err(|e| AvatarError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        log::debug!("Decoded avatar {}x{} from {}", width, height, url);

        Ok(Self {
            data: rgba_img.into_raw(),
            width,
            height,
        })
    }

    /// Flat tile shown while an avatar is missing or failed
    pub fn placeholder(tint: [u8; 4]) -> Self {
        let data = tint.repeat((PLACEHOLDER_SIZE * PLACEHOLDER_SIZE) as usize);
        Self {
            data,
            width: PLACEHOLDER_SIZE,
            height: PLACEHOLDER_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_png(width: u32, height: u32, pixel: [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba(pixel));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png).unwrap();
        bytes
    }

    #[test]
    fn test_decode_png() {
        let bytes = encode_png(3, 2, [10, 20, 30, 255]);
        let img = AvatarImage::from_bytes("mem://a.png", &bytes).unwrap();
        assert_eq!((img.width, img.height), (3, 2));
        assert_eq!(&img.data[0..4], &[10, 20, 30, 255]);
        assert_eq!(img.data.len(), 3 * 2 * 4);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = AvatarImage::from_bytes("mem://bad", b"not an image").unwrap_err();
        assert!(matches!(err, AvatarError::Decode { .. }));
    }

    #[test]
    fn test_placeholder() {
        let img = AvatarImage::placeholder([1, 2, 3, 4]);
        assert_eq!((img.width, img.height), (PLACEHOLDER_SIZE, PLACEHOLDER_SIZE));
        assert_eq!(img.data.len(), (PLACEHOLDER_SIZE * PLACEHOLDER_SIZE * 4) as usize);
        assert!(img.data.chunks(4).all(|px| px == [1, 2, 3, 4]));
    }
}
