//! Scoped secrets.
//!
//! Key material and passwords live in [`zeroize::Zeroizing`] containers so
//! they are overwritten when dropped, including on early `?` returns and
//! when a blocking task is abandoned.

use std::fmt;

use zeroize::Zeroizing;

use super::kdf::KEY_LEN;

/// A derived AES-256 key, wiped on drop.
pub type DerivedKey = Zeroizing<[u8; KEY_LEN]>;

/// A user password, wiped on drop and redacted in `Debug` output.
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(Zeroizing::new(password.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl From<String> for Password {
    fn from(password: String) -> Self {
        Self::new(password)
    }
}

impl From<&str> for Password {
    fn from(password: &str) -> Self {
        Self::new(password)
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}
