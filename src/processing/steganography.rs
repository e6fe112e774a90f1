//! # LSB Steganography Implementation
//!
//! Hides text within an image by overwriting the least significant bit of
//! the colour samples.
//!
//! ## Bit Layout
//!
//! ```text
//! [32 bits: text length in bytes, big-endian] [length * 8 bits: UTF-8 text]
//! ```
//!
//! - Bytes are written most-significant bit first.
//! - Pixels are visited in raster order: row by row from the top, left to
//!   right within a row.
//! - Within a pixel the channels are visited R, G, B. Alpha is never touched.
//!
//! Embedding and extraction share this order exactly; any deviation breaks
//! round-tripping silently, so both directions go through [`channel_order`].
//!
//! ### Capacity
//! An image holds `width * height * 3` bits. A text needs
//! `32 + 8 * text.len()` of them.
//!
//! Example: a 64x64 image holds 12288 bits, i.e. 1532 bytes of text.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbaImage};
use log::debug;

use crate::error::{Result, VaultError};

/// Colour channels used per pixel (R, G, B).
pub const CHANNELS_PER_PIXEL: usize = 3;

/// Bits spent on the length prefix that terminates the embedded text.
pub const LENGTH_PREFIX_BITS: usize = 32;

/// Channel indices in the order they receive bits.
const fn channel_order() -> [usize; CHANNELS_PER_PIXEL] {
    [0, 1, 2]
}

/// Number of bits an image of the given size can carry.
pub fn capacity_bits(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS_PER_PIXEL
}

/// Number of bits needed to embed `text`, including the length prefix.
pub fn required_bits(text: &str) -> usize {
    required_bits_for_len(text.len())
}

/// [`required_bits`] for a text of `byte_len` bytes.
pub fn required_bits_for_len(byte_len: usize) -> usize {
    LENGTH_PREFIX_BITS + byte_len * 8
}

/// Embed `text` into a copy of `img`.
///
/// Fails with [`VaultError::InsufficientCapacity`] before touching any pixel
/// when the text does not fit. The input image is left unchanged.
pub fn embed_text(img: &RgbaImage, text: &str) -> Result<RgbaImage> {
    let (width, height) = img.dimensions();

    let available_bits = capacity_bits(width, height);
    let required_bits = required_bits(text);
    if required_bits > available_bits {
        return Err(VaultError::InsufficientCapacity {
            required_bits,
            available_bits,
        });
    }

    let length = u32::try_from(text.len())
        .map_err(|_| VaultError::Internal("text longer than the 32-bit length prefix".into()))?;

    // Prepare data to embed: [4 bytes length][text bytes]
    let mut data_to_embed = Vec::with_capacity(4 + text.len());
    data_to_embed.extend_from_slice(&length.to_be_bytes());
    data_to_embed.extend_from_slice(text.as_bytes());

    let mut out = img.clone();
    let mut data_index = 0; // Current byte being embedded
    let mut bit_index = 0; // Current bit within the byte (0-7)

    'outer: for y in 0..height {
        for x in 0..width {
            if data_index >= data_to_embed.len() {
                break 'outer;
            }

            let pixel = out.get_pixel_mut(x, y);

            for channel in channel_order() {
                if data_index >= data_to_embed.len() {
                    break 'outer;
                }

                // MSB first
                let bit = (data_to_embed[data_index] >> (7 - bit_index)) & 1;
                pixel[channel] = (pixel[channel] & 0xFE) | bit;

                bit_index += 1;
                if bit_index == 8 {
                    bit_index = 0;
                    data_index += 1;
                }
            }
        }
    }

    debug!(
        "Embedded {} bits into {}x{} carrier ({} available)",
        required_bits, width, height, available_bits
    );

    Ok(out)
}

/// Sequential reader over the carrier's LSBs in embedding order.
struct LsbReader<'a> {
    img: &'a RgbaImage,
    position: usize,
    total: usize,
}

impl<'a> LsbReader<'a> {
    fn new(img: &'a RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            img,
            position: 0,
            total: capacity_bits(width, height),
        }
    }

    fn remaining(&self) -> usize {
        self.total - self.position
    }

    fn read_bit(&mut self) -> Option<u8> {
        if self.position >= self.total {
            return None;
        }

        let width = self.img.width() as usize;
        let pixel_index = self.position / CHANNELS_PER_PIXEL;
        let channel = channel_order()[self.position % CHANNELS_PER_PIXEL];
        let x = (pixel_index % width) as u32;
        let y = (pixel_index / width) as u32;

        self.position += 1;
        Some(self.img.get_pixel(x, y)[channel] & 1)
    }

    fn read_byte(&mut self) -> Option<u8> {
        let mut byte = 0u8;
        for _ in 0..8 {
            byte = (byte << 1) | self.read_bit()?;
        }
        Some(byte)
    }
}

/// Extract the raw bytes embedded with [`embed_text`].
///
/// Returns `None` when the length prefix points past the end of the image.
/// The bytes are not checked for UTF-8, so callers can still locate
/// markers around a damaged payload.
pub fn extract_bytes(img: &RgbaImage) -> Option<Vec<u8>> {
    let mut reader = LsbReader::new(img);

    let mut length_bytes = [0u8; 4];
    for byte in length_bytes.iter_mut() {
        *byte = reader.read_byte()?;
    }
    let length = u32::from_be_bytes(length_bytes) as usize;

    if length.saturating_mul(8) > reader.remaining() {
        debug!(
            "Length prefix {} exceeds remaining capacity of {} bits",
            length,
            reader.remaining()
        );
        return None;
    }

    let mut text_bytes = Vec::with_capacity(length);
    for _ in 0..length {
        text_bytes.push(reader.read_byte()?);
    }

    Some(text_bytes)
}

/// Extract text embedded with [`embed_text`].
///
/// Returns `None` when the carrier holds no embedded text: the length
/// prefix points past the end of the image, or the bytes are not UTF-8.
pub fn extract_text(img: &RgbaImage) -> Option<String> {
    String::from_utf8(extract_bytes(img)?).ok()
}

/// Decode carrier bytes in any format the `image` crate understands.
pub fn load_carrier(image_bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(image_bytes)?)
}

/// Encode an image as PNG so the embedded LSBs survive.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut output_bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut output_bytes), ImageFormat::Png)?;
    Ok(output_bytes)
}

/// Embed `text` into encoded image bytes and return PNG bytes.
///
/// The output keeps an alpha channel only if the input had one.
pub fn embed_text_bytes(image_bytes: &[u8], text: &str) -> Result<Vec<u8>> {
    let img = load_carrier(image_bytes)?;
    let has_alpha = img.color().has_alpha();

    let embedded = embed_text(&img.to_rgba8(), text)?;
    encode_carrier(embedded, has_alpha)
}

/// PNG-encode an embedded carrier, dropping the alpha channel unless the
/// original image had one.
pub fn encode_carrier(embedded: RgbaImage, keep_alpha: bool) -> Result<Vec<u8>> {
    let out = if keep_alpha {
        DynamicImage::ImageRgba8(embedded)
    } else {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(embedded).to_rgb8())
    };

    encode_png(&out)
}

/// Extract text from encoded image bytes.
///
/// `Ok(None)` means the image decoded fine but carries no embedded text.
pub fn extract_text_bytes(image_bytes: &[u8]) -> Result<Option<String>> {
    let img = load_carrier(image_bytes)?;
    Ok(extract_text(&img.to_rgba8()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba};

    fn noisy_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            let v = (x * 31 + y * 17) as u8;
            Rgba([v, v.wrapping_mul(3), v.wrapping_add(91), 255])
        })
    }

    #[test]
    fn test_embed_extract_roundtrip() {
        let img = noisy_image(32, 32);
        let embedded = embed_text(&img, "MSG_STARTabcMSG_END").unwrap();
        assert_eq!(extract_text(&embedded).as_deref(), Some("MSG_STARTabcMSG_END"));
    }

    #[test]
    fn test_embed_does_not_mutate_input() {
        let img = noisy_image(16, 16);
        let before = img.clone();
        let _ = embed_text(&img, "hello").unwrap();
        assert_eq!(img, before);
    }

    #[test]
    fn test_bit_order_is_msb_first_rgb_raster() {
        let img = RgbaImage::from_pixel(8, 2, Rgba([0, 0, 0, 200]));
        let embedded = embed_text(&img, "A").unwrap();

        // length prefix 0x00000001 then 'A' = 0x41 = 0100_0001
        let bits: Vec<u8> = embedded
            .pixels()
            .flat_map(|p| [p[0] & 1, p[1] & 1, p[2] & 1])
            .take(40)
            .collect();

        let mut expected = vec![0u8; 31];
        expected.push(1);
        expected.extend_from_slice(&[0, 1, 0, 0, 0, 0, 0, 1]);
        assert_eq!(bits, expected);

        // alpha untouched everywhere
        assert!(embedded.pixels().all(|p| p[3] == 200));
    }

    #[test]
    fn test_only_lsbs_change() {
        let img = noisy_image(20, 20);
        let embedded = embed_text(&img, "some hidden text").unwrap();
        for (a, b) in img.pixels().zip(embedded.pixels()) {
            for channel in 0..4 {
                assert!(a[channel] ^ b[channel] <= 1);
            }
        }
    }

    #[test]
    fn test_capacity_boundary() {
        // 16x2 = 32 pixels = 96 bits = 4 byte prefix + 8 bytes of text
        let img = noisy_image(16, 2);
        assert_eq!(capacity_bits(16, 2), required_bits("12345678"));

        let embedded = embed_text(&img, "12345678").unwrap();
        assert_eq!(extract_text(&embedded).as_deref(), Some("12345678"));

        let err = embed_text(&img, "123456789").unwrap_err();
        assert_eq!(
            err,
            VaultError::InsufficientCapacity {
                required_bits: 104,
                available_bits: 96
            }
        );
    }

    #[test]
    fn test_empty_image_has_no_capacity() {
        let img = RgbaImage::new(0, 0);
        assert!(matches!(
            embed_text(&img, ""),
            Err(VaultError::InsufficientCapacity { .. })
        ));
        assert_eq!(extract_text(&img), None);
    }

    #[test]
    fn test_extract_rejects_oversized_length_prefix() {
        // all LSBs set: length prefix 0xFFFFFFFF
        let img = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
        assert_eq!(extract_text(&img), None);
    }

    #[test]
    fn test_extract_rejects_invalid_utf8() {
        let img = noisy_image(16, 16);
        let embedded = embed_text(&img, "ab").unwrap();

        // set the top bit of the first text byte: 32 prefix bits, bit 0 of text
        let mut corrupted = embedded.clone();
        let pixel = corrupted.get_pixel_mut(10, 0);
        pixel[2] |= 1;
        assert_eq!(extract_text(&corrupted), None);
    }

    #[test]
    fn test_extract_bytes_keeps_invalid_utf8() {
        let embedded = embed_text(&noisy_image(16, 16), "ab").unwrap();

        let mut corrupted = embedded.clone();
        corrupted.get_pixel_mut(10, 0)[2] |= 1;
        assert_eq!(extract_bytes(&corrupted), Some(vec![0xE1, b'b']));
        assert_eq!(extract_bytes(&embedded), Some(b"ab".to_vec()));
    }

    #[test]
    fn test_blank_image_extracts_empty_text() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        assert_eq!(extract_text(&img).as_deref(), Some(""));
    }

    #[test]
    fn test_bytes_roundtrip_preserves_rgb_format() {
        let rgb = RgbImage::from_fn(24, 24, |x, y| Rgb([x as u8, y as u8, (x ^ y) as u8]));
        let png = encode_png(&DynamicImage::ImageRgb8(rgb)).unwrap();

        let out = embed_text_bytes(&png, "payload").unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert!(!decoded.color().has_alpha());
        assert_eq!(decoded.width(), 24);
        assert_eq!(extract_text_bytes(&out).unwrap().as_deref(), Some("payload"));
    }

    #[test]
    fn test_bytes_roundtrip_keeps_alpha() {
        let png = encode_png(&DynamicImage::ImageRgba8(noisy_image(24, 24))).unwrap();
        let out = embed_text_bytes(&png, "payload").unwrap();
        assert!(image::load_from_memory(&out).unwrap().color().has_alpha());
    }

    #[test]
    fn test_invalid_image_bytes() {
        assert!(matches!(
            embed_text_bytes(b"definitely not an image", "x"),
            Err(VaultError::InvalidImage(_))
        ));
        assert!(matches!(
            extract_text_bytes(&[0u8; 16]),
            Err(VaultError::InvalidImage(_))
        ));
    }
}
