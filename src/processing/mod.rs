//! # Payload Processing and Steganography
//!
//! Everything between the ciphertext and the pixels:
//!
//! - [`payload`]: salt/nonce/ciphertext packing into URL-safe base64
//! - [`framing`]: `MSG_START` / `MSG_END` markers around the packed payload
//! - [`steganography`]: LSB embedding and extraction of the framed text

pub mod framing;
pub mod payload;
pub mod steganography;

// Re-export main functions for convenience
pub use payload::{pack, unpack, CipherPayload};
pub use steganography::{embed_text_bytes, extract_text_bytes};
