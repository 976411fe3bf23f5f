//! This file defines the type that turns plaintext passwords into the digest
//! that is stored and matched at sign-in.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A one-way digest of a password.
///
/// The digest is a SHA-256 hex string. Hashing is deterministic so that
/// authentication can look up the `(username, password_hash)` pair directly
/// in the store; the hash is never reversed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plaintext password.
    pub fn from_raw_password(raw_password: &str) -> Self {
        let digest = Sha256::digest(raw_password.as_bytes());
        let hex_string = digest.iter().map(|byte| format!("{byte:02x}")).collect();

        Self(hex_string)
    }

    /// Create a `PasswordHash` from an already-hashed string, e.g. one read
    /// back from the database.
    ///
    /// The caller should ensure that `raw_password_hash` is a valid digest.
    /// This function has `_unchecked` in the name but is not `unsafe`,
    /// because an invalid hash may cause incorrect behaviour but will not
    /// affect memory safety.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_string())
    }

    /// Check that `raw_password` matches the stored digest.
    pub fn verify(&self, raw_password: &str) -> bool {
        Self::from_raw_password(raw_password) == *self
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
