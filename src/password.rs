//! Password credential hashing and verification.
//!
//! Credentials are a salted SHA-256 digest: 16 random salt bytes are drawn
//! from a caller-supplied CSPRNG, prepended to the password bytes, digested,
//! and stored as base64 text alongside the base64 salt. Setting a password
//! replaces the whole credential; salt and hash are never updated in place.
//!
//! # Example
//!
//! ```rust
//! use breakwater::password::CredentialHasher;
//! use rand::rngs::OsRng;
//! use std::time::SystemTime;
//!
//! let hasher = CredentialHasher::new();
//! let credential = hasher.set_password(&mut OsRng, "hunter2-but-longer", SystemTime::now());
//!
//! assert!(hasher.check_password(Some(&credential), "hunter2-but-longer"));
//! assert!(!hasher.check_password(Some(&credential), "wrong"));
//! assert!(!hasher.check_password(None, "anything"));
//! ```

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::SystemTime;
use subtle::ConstantTimeEq;

/// Salt length in bytes.
const SALT_LEN: usize = 16;

/// A stored password credential.
///
/// Owned by the external account record; this core only computes and checks
/// it. Replaced wholesale on every password change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Base64 text of the salted SHA-256 digest. Never reversible.
    pub password_hash: String,
    /// Base64 text of the 16 salt bytes. Regenerated on every set.
    pub password_salt: String,
    /// When the password was last set.
    pub last_changed: SystemTime,
}

/// Computes and checks salted password digests.
#[derive(Clone, Debug, Default)]
pub struct CredentialHasher;

impl CredentialHasher {
    /// Create a new credential hasher.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Hash a password with the given base64 salt text.
    ///
    /// Pure and deterministic: identical inputs always produce identical
    /// output, which is what verification relies on. The salt text is
    /// decoded to its raw bytes before digesting; salt text that is not
    /// valid base64 is digested verbatim so this function never fails.
    #[must_use]
    pub fn hash(&self, password: &str, salt: &str) -> String {
        let salt_bytes = BASE64
            .decode(salt)
            .unwrap_or_else(|_| salt.as_bytes().to_vec());

        let mut digest = Sha256::new();
        digest.update(&salt_bytes);
        digest.update(password.as_bytes());
        BASE64.encode(digest.finalize())
    }

    /// Generate a fresh base64 salt from the given CSPRNG.
    #[must_use]
    pub fn generate_salt(&self, rng: &mut (impl RngCore + CryptoRng)) -> String {
        let mut salt = [0u8; SALT_LEN];
        rng.fill_bytes(&mut salt);
        BASE64.encode(salt)
    }

    /// Build a fresh credential for a password.
    ///
    /// Generates a new salt, computes the hash, and stamps `last_changed`.
    /// The returned value replaces any prior credential entirely.
    #[must_use]
    pub fn set_password(
        &self,
        rng: &mut (impl RngCore + CryptoRng),
        password: &str,
        now: SystemTime,
    ) -> Credential {
        let salt = self.generate_salt(rng);
        let hash = self.hash(password, &salt);

        tracing::debug!(target: "auth.password.set", "Password credential replaced");

        Credential {
            password_hash: hash,
            password_salt: salt,
            last_changed: now,
        }
    }

    /// Check a candidate password against a stored credential.
    ///
    /// Recomputes the digest with the stored salt and compares in constant
    /// time. Returns `false` (never an error) when no credential is set.
    #[must_use]
    pub fn check_password(&self, credential: Option<&Credential>, candidate: &str) -> bool {
        let Some(credential) = credential else {
            return false;
        };

        let computed = self.hash(candidate, &credential.password_salt);
        computed
            .as_bytes()
            .ct_eq(credential.password_hash.as_bytes())
            .into()
    }
}
