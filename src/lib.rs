//! # steg-vault
//!
//! Hides a password-protected message inside an ordinary image.
//!
//! The message is encrypted with AES-256-GCM under an Argon2id key derived
//! from the password, packed with its salt and nonce into URL-safe base64,
//! wrapped in `MSG_START` / `MSG_END` markers, and written into the least
//! significant bits of the image's RGB samples.
//!
//! ```ignore
//! use steg_vault::{Password, Vault};
//!
//! let vault = Vault::new();
//! let png = vault.conceal(&carrier_bytes, "meet at dawn", &Password::new("correct horse"))?;
//! let message = vault.reveal(&png, &Password::new("correct horse"))?;
//! ```

pub mod common;
pub mod crypto;
pub mod error;
pub mod processing;
pub mod service;
pub mod vault;

pub use crypto::{KdfParams, Password};
pub use error::{ErrorKind, VaultError};
pub use service::StegoService;
pub use vault::Vault;
