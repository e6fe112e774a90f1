//! # Payload Codec
//!
//! Packs the pieces needed for decryption into a single printable token:
//!
//! ```text
//! base64url( salt[16] || nonce[12] || ciphertext || tag[16] )
//! ```
//!
//! The URL-safe alphabet (`A-Z a-z 0-9 - _` plus `=` padding) never produces
//! characters that could be confused with the framing markers' boundaries
//! and contains no line breaks.

use base64::{engine::general_purpose::URL_SAFE, Engine as _};

use crate::crypto::{NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::error::{Result, VaultError};

/// Fixed salt + nonce prefix every payload starts with.
pub const PREFIX_LEN: usize = SALT_LEN + NONCE_LEN;

/// Smallest payload produced by [`pack`] (empty message).
pub const MIN_PAYLOAD_LEN: usize = PREFIX_LEN + TAG_LEN;

/// Decoded form of an embedded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherPayload {
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    /// Ciphertext with the GCM tag appended
    pub ciphertext: Vec<u8>,
}

impl CipherPayload {
    pub fn new(salt: [u8; SALT_LEN], nonce: [u8; NONCE_LEN], ciphertext: Vec<u8>) -> Self {
        Self {
            salt,
            nonce,
            ciphertext,
        }
    }

    /// Raw `salt || nonce || ciphertext` bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(PREFIX_LEN + self.ciphertext.len());
        bytes.extend_from_slice(&self.salt);
        bytes.extend_from_slice(&self.nonce);
        bytes.extend_from_slice(&self.ciphertext);
        bytes
    }

    /// Split raw bytes back into salt, nonce and ciphertext.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < PREFIX_LEN {
            return Err(VaultError::MalformedPayload(format!(
                "payload is {} bytes, shorter than the {} byte salt+nonce prefix",
                bytes.len(),
                PREFIX_LEN
            )));
        }

        let (salt, rest) = bytes.split_at(SALT_LEN);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

        let mut payload = Self::new([0u8; SALT_LEN], [0u8; NONCE_LEN], ciphertext.to_vec());
        payload.salt.copy_from_slice(salt);
        payload.nonce.copy_from_slice(nonce);
        Ok(payload)
    }

    /// Length of the text produced by [`pack`] for a given plaintext length.
    pub fn encoded_len(plaintext_len: usize) -> usize {
        let raw = MIN_PAYLOAD_LEN + plaintext_len;
        raw.div_ceil(3) * 4
    }
}

/// Render a payload as URL-safe base64 text.
pub fn pack(payload: &CipherPayload) -> String {
    URL_SAFE.encode(payload.to_bytes())
}

/// Parse text produced by [`pack`].
pub fn unpack(encoded: &str) -> Result<CipherPayload> {
    let bytes = URL_SAFE
        .decode(encoded)
        .map_err(|e| VaultError::MalformedPayload(format!("invalid base64: {}", e)))?;

    CipherPayload::from_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CipherPayload {
        CipherPayload::new([1u8; SALT_LEN], [2u8; NONCE_LEN], vec![3u8; 29])
    }

    #[test]
    fn test_pack_unpack_roundtrip() {
        let payload = sample();
        let encoded = pack(&payload);
        assert_eq!(unpack(&encoded).unwrap(), payload);
    }

    #[test]
    fn test_prefix_layout() {
        let bytes = sample().to_bytes();
        assert_eq!(&bytes[..SALT_LEN], &[1u8; SALT_LEN]);
        assert_eq!(&bytes[SALT_LEN..PREFIX_LEN], &[2u8; NONCE_LEN]);
        assert_eq!(bytes.len(), PREFIX_LEN + 29);
    }

    #[test]
    fn test_encoded_text_is_url_safe() {
        // 0xfb / 0xff bytes map to '+' and '/' in the standard alphabet
        let payload = CipherPayload::new([0xfb; SALT_LEN], [0xff; NONCE_LEN], vec![0xfe; 20]);
        let encoded = pack(&payload);
        assert!(encoded
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '='));
        assert!(!encoded.contains('\n'));
    }

    #[test]
    fn test_encoded_len_matches_pack() {
        for plaintext_len in [0, 1, 2, 3, 12, 100] {
            let payload = CipherPayload::new(
                [0u8; SALT_LEN],
                [0u8; NONCE_LEN],
                vec![0u8; plaintext_len + TAG_LEN],
            );
            assert_eq!(pack(&payload).len(), CipherPayload::encoded_len(plaintext_len));
        }
    }

    #[test]
    fn test_unpack_rejects_short_input() {
        let short = URL_SAFE.encode([0u8; PREFIX_LEN - 1]);
        assert!(matches!(unpack(&short), Err(VaultError::MalformedPayload(_))));
    }

    #[test]
    fn test_unpack_accepts_bare_prefix() {
        let bare = URL_SAFE.encode([9u8; PREFIX_LEN]);
        let payload = unpack(&bare).unwrap();
        assert!(payload.ciphertext.is_empty());
    }

    #[test]
    fn test_unpack_rejects_foreign_alphabet() {
        assert!(matches!(unpack("not base64!"), Err(VaultError::MalformedPayload(_))));
        // standard-alphabet characters are not accepted
        assert!(matches!(unpack("ab+/"), Err(VaultError::MalformedPayload(_))));
    }

    #[test]
    fn test_unpack_rejects_empty() {
        assert!(matches!(unpack(""), Err(VaultError::MalformedPayload(_))));
    }
}
