//! # Key Derivation
//!
//! Stretches a password and a random 16-byte salt into a 32-byte AES key
//! with Argon2id.
//!
//! ## Parameters
//!
//! | parameter   | value          |
//! |-------------|----------------|
//! | time cost   | 3 passes       |
//! | memory cost | 128 MiB        |
//! | parallelism | 4 lanes        |
//! | output      | 32 bytes       |
//!
//! The parameters are not stored next to the ciphertext, so the same values
//! must be used for conceal and reveal. The cost does not depend on whether
//! the password is right.

use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroizing;

use super::secret::DerivedKey;
use crate::error::{Result, VaultError};

/// Length of the derived key (AES-256).
pub const KEY_LEN: usize = 32;

/// Length of the random per-message salt.
pub const SALT_LEN: usize = 16;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Number of passes over memory
    pub time_cost: u32,
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of lanes
    pub parallelism: u32,
}

impl KdfParams {
    pub const TIME_COST: u32 = 3;
    pub const MEMORY_KIB: u32 = 128 * 1024;
    pub const PARALLELISM: u32 = 4;

    pub const fn new(time_cost: u32, memory_kib: u32, parallelism: u32) -> Self {
        Self {
            time_cost,
            memory_kib,
            parallelism,
        }
    }

    fn to_argon2(self) -> Result<Argon2<'static>> {
        let params = Params::new(
            self.memory_kib,
            self.time_cost,
            self.parallelism,
            Some(KEY_LEN),
        )
        .map_err(|e| VaultError::Internal(format!("invalid Argon2 parameters: {}", e)))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::new(Self::TIME_COST, Self::MEMORY_KIB, Self::PARALLELISM)
    }
}

/// Derive a 32-byte key from `password` and `salt`.
///
/// Deterministic for a given (password, salt, params). The Argon2 working
/// memory is allocated per call and freed on return.
pub fn derive_key(password: &[u8], salt: &[u8; SALT_LEN], params: KdfParams) -> Result<DerivedKey> {
    let argon2 = params.to_argon2()?;

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(password, salt, &mut *key)
        .map_err(|e| VaultError::Internal(format!("key derivation failed: {}", e)))?;

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: KdfParams = KdfParams::new(1, 64, 4);

    #[test]
    fn test_default_params_meet_security_floor() {
        let params = KdfParams::default();
        assert!(params.time_cost >= 3);
        assert!(params.memory_kib >= 128 * 1024);
        assert_eq!(params.parallelism, 4);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let salt = [7u8; SALT_LEN];
        let a = derive_key(b"correct horse", &salt, FAST).unwrap();
        let b = derive_key(b"correct horse", &salt, FAST).unwrap();
        assert_eq!(*a, *b);
    }

    #[test]
    fn test_salt_and_password_change_key() {
        let salt = [7u8; SALT_LEN];
        let other_salt = [8u8; SALT_LEN];
        let base = derive_key(b"correct horse", &salt, FAST).unwrap();

        let other_password = derive_key(b"wrong", &salt, FAST).unwrap();
        let other_salted = derive_key(b"correct horse", &other_salt, FAST).unwrap();

        assert_ne!(*base, *other_password);
        assert_ne!(*base, *other_salted);
    }

    #[test]
    fn test_params_change_key() {
        let salt = [1u8; SALT_LEN];
        let a = derive_key(b"pw", &salt, FAST).unwrap();
        let b = derive_key(b"pw", &salt, KdfParams::new(2, 64, 4)).unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn test_invalid_params_are_internal_error() {
        // Argon2 needs at least 8 KiB per lane
        let result = derive_key(b"pw", &[0u8; SALT_LEN], KdfParams::new(1, 8, 4));
        assert!(matches!(result, Err(VaultError::Internal(_))));
    }

    #[test]
    fn test_empty_password_is_accepted() {
        let key = derive_key(b"", &[3u8; SALT_LEN], FAST).unwrap();
        assert_eq!(key.len(), KEY_LEN);
    }
}
