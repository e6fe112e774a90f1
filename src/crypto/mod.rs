//! # Cryptographic Packaging
//!
//! Password-based encryption used before anything touches the image:
//!
//! - [`kdf`]: Argon2id password stretching into a 256-bit key
//! - [`cipher`]: AES-256-GCM authenticated encryption
//! - [`secret`]: wrappers that wipe key material and passwords on drop

pub mod cipher;
pub mod kdf;
pub mod secret;

pub use cipher::{decrypt, encrypt, NONCE_LEN, TAG_LEN};
pub use kdf::{derive_key, KdfParams, KEY_LEN, SALT_LEN};
pub use secret::{DerivedKey, Password};
