//! # Error Taxonomy
//!
//! Every failure the vault can report is a [`VaultError`]. Callers that only
//! care about the category (CLI exit codes, JSON responses) use
//! [`VaultError::kind`].
//!
//! Authentication failures are deliberately collapsed: a wrong password and
//! a corrupted ciphertext both surface as
//! [`VaultError::WrongPasswordOrCorrupted`].

use thiserror::Error;

/// Errors produced by conceal / reveal and the stages behind them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    /// The framed payload needs more bits than the carrier offers.
    #[error("Image too small for this message: need {required_bits} bits but only have {available_bits} bits available")]
    InsufficientCapacity {
        required_bits: usize,
        available_bits: usize,
    },

    #[error("No hidden message found")]
    NoHiddenMessage,

    /// Text between the markers could not be decoded into a payload.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Decryption failed. Wrong password or corrupted data.")]
    WrongPasswordOrCorrupted,

    /// The carrier bytes are not an image we can decode or re-encode.
    #[error("Invalid carrier image: {0}")]
    InvalidImage(String),

    /// Key derivation or encryption primitive failed unexpectedly.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Flat category of a [`VaultError`], without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InsufficientCapacity,
    NoHiddenMessage,
    MalformedPayload,
    WrongPasswordOrCorrupted,
    InvalidImage,
    Internal,
}

impl ErrorKind {
    /// Stable snake_case name, used in JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InsufficientCapacity => "insufficient_capacity",
            ErrorKind::NoHiddenMessage => "no_hidden_message",
            ErrorKind::MalformedPayload => "malformed_payload",
            ErrorKind::WrongPasswordOrCorrupted => "wrong_password_or_corrupted",
            ErrorKind::InvalidImage => "invalid_image",
            ErrorKind::Internal => "internal_error",
        }
    }
}

impl VaultError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VaultError::InsufficientCapacity { .. } => ErrorKind::InsufficientCapacity,
            VaultError::NoHiddenMessage => ErrorKind::NoHiddenMessage,
            VaultError::MalformedPayload(_) => ErrorKind::MalformedPayload,
            VaultError::WrongPasswordOrCorrupted => ErrorKind::WrongPasswordOrCorrupted,
            VaultError::InvalidImage(_) => ErrorKind::InvalidImage,
            VaultError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// `true` for errors caused by the caller's input rather than by us.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, VaultError::Internal(_))
    }
}

impl From<image::ImageError> for VaultError {
    fn from(err: image::ImageError) -> Self {
        VaultError::InvalidImage(err.to_string())
    }
}

/// Result alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;
