//! # Vault - Conceal and Reveal
//!
//! Composes the cryptographic and steganographic layers:
//!
//! ```text
//! conceal: message -> Argon2id key -> AES-256-GCM -> base64url payload
//!          -> MSG_START..MSG_END -> LSB embed -> PNG
//! reveal:  PNG -> LSB extract -> strip markers -> unpack -> Argon2id key
//!          -> AES-256-GCM open -> message
//! ```
//!
//! Salt and nonce are drawn fresh from the OS RNG on every conceal, so
//! concealing the same message twice never yields the same carrier bits.
//! Nothing is retried: a failed conceal must be called again, which draws
//! new randomness.

use image::RgbaImage;
use log::debug;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::crypto::{self, KdfParams, Password, NONCE_LEN, SALT_LEN};
use crate::error::{Result, VaultError};
use crate::processing::framing::{self, MARKER_OVERHEAD};
use crate::processing::payload::{self, CipherPayload};
use crate::processing::steganography;

/// Password-protected message hiding in images.
///
/// Stateless apart from the KDF parameters; safe to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vault {
    params: KdfParams,
}

impl Vault {
    /// Vault with the fixed production KDF parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Vault with custom KDF cost, for tests and benchmarks.
    ///
    /// Carriers concealed with one set of parameters can only be revealed
    /// with the same set.
    pub fn with_kdf_params(params: KdfParams) -> Self {
        Self { params }
    }

    pub fn kdf_params(&self) -> KdfParams {
        self.params
    }

    /// Carrier bits needed to conceal a message of `message_len` bytes.
    pub fn required_bits_for_message(message_len: usize) -> usize {
        let framed_len = MARKER_OVERHEAD + CipherPayload::encoded_len(message_len);
        steganography::required_bits_for_len(framed_len)
    }

    /// Longest message (in bytes) that fits in `capacity_bits`, or `None`
    /// if not even an empty message fits.
    pub fn max_message_len(capacity_bits: usize) -> Option<usize> {
        let framed_bytes = capacity_bits.checked_sub(steganography::LENGTH_PREFIX_BITS)? / 8;
        let encoded_chars = framed_bytes.checked_sub(MARKER_OVERHEAD)?;
        let raw_bytes = encoded_chars / 4 * 3;
        raw_bytes.checked_sub(payload::MIN_PAYLOAD_LEN)
    }

    /// Encrypt `message` and return the packed, transport-safe payload.
    pub fn seal(&self, message: &str, password: &Password) -> Result<String> {
        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut salt);
        OsRng.fill_bytes(&mut nonce);

        let key = crypto::derive_key(password.as_bytes(), &salt, self.params)?;
        let ciphertext = crypto::encrypt(&key, &nonce, message.as_bytes())?;

        Ok(payload::pack(&CipherPayload::new(salt, nonce, ciphertext)))
    }

    /// Decrypt a payload produced by [`Vault::seal`].
    pub fn open(&self, encoded: &str, password: &Password) -> Result<String> {
        let payload = payload::unpack(encoded)?;

        let key = crypto::derive_key(password.as_bytes(), &payload.salt, self.params)?;
        let plaintext = Zeroizing::new(crypto::decrypt(&key, &payload.nonce, &payload.ciphertext)?);

        std::str::from_utf8(&plaintext)
            .map(str::to_owned)
            .map_err(|_| VaultError::WrongPasswordOrCorrupted)
    }

    /// Conceal `message` in a copy of `img`.
    pub fn conceal_image(&self, img: &RgbaImage, message: &str, password: &Password) -> Result<RgbaImage> {
        let (width, height) = img.dimensions();

        // Report capacity problems before paying for key derivation
        let available_bits = steganography::capacity_bits(width, height);
        let required_bits = Self::required_bits_for_message(message.len());
        if required_bits > available_bits {
            return Err(VaultError::InsufficientCapacity {
                required_bits,
                available_bits,
            });
        }

        let framed = framing::frame(&self.seal(message, password)?);
        debug!(
            "Framed payload is {} bytes for a {} byte message",
            framed.len(),
            message.len()
        );

        steganography::embed_text(img, &framed)
    }

    /// Reveal the message hidden in `img`.
    ///
    /// `NoHiddenMessage` only when the markers are missing. Once they are
    /// found, a payload that is not text is `MalformedPayload`.
    pub fn reveal_image(&self, img: &RgbaImage, password: &Password) -> Result<String> {
        let data = steganography::extract_bytes(img).ok_or(VaultError::NoHiddenMessage)?;
        let framed = framing::unframe_bytes(&data).ok_or(VaultError::NoHiddenMessage)?;

        let encoded = std::str::from_utf8(framed)
            .map_err(|_| VaultError::MalformedPayload("payload is not valid UTF-8".into()))?;

        self.open(encoded, password)
    }

    /// Conceal `message` in encoded carrier bytes, returning PNG bytes.
    pub fn conceal(&self, carrier: &[u8], message: &str, password: &Password) -> Result<Vec<u8>> {
        let img = steganography::load_carrier(carrier)?;
        let has_alpha = img.color().has_alpha();

        let embedded = self.conceal_image(&img.to_rgba8(), message, password)?;
        steganography::encode_carrier(embedded, has_alpha)
    }

    /// Reveal the message hidden in encoded carrier bytes.
    pub fn reveal(&self, carrier: &[u8], password: &Password) -> Result<String> {
        let img = steganography::load_carrier(carrier)?;
        self.reveal_image(&img.to_rgba8(), password)
    }
}
