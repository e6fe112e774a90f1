//! # Authenticated Encryption
//!
//! AES-256-GCM with a 96-bit nonce and the 128-bit tag appended to the
//! ciphertext. No associated data.
//!
//! Decryption is all-or-nothing: any change to key, nonce, ciphertext or tag
//! yields [`VaultError::WrongPasswordOrCorrupted`] and no plaintext.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};

use super::kdf::KEY_LEN;
use crate::error::{Result, VaultError};

/// GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext`, returning `ciphertext || tag`.
pub fn encrypt(key: &[u8; KEY_LEN], nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| VaultError::Internal(format!("cipher init failed: {}", e)))?;

    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|e| VaultError::Internal(format!("encryption failed: {}", e)))
}

/// Decrypt `ciphertext || tag`.
pub fn decrypt(key: &[u8; KEY_LEN], nonce: &[u8; NONCE_LEN], ciphertext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| VaultError::Internal(format!("cipher init failed: {}", e)))?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| VaultError::WrongPasswordOrCorrupted)
}
