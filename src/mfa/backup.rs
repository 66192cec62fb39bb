//! Backup codes for account recovery.
//!
//! A batch of 10 eight-character codes from `[A-Z0-9]` is generated at MFA
//! enrollment for one-time display. Redemption is tracked by a
//! [`BackupCodeLedger`] so each code can be used at most once; the consuming
//! account-management layer persists the ledger alongside the account record.

use rand::{CryptoRng, Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use subtle::ConstantTimeEq;

/// Codes drawn uniformly from uppercase letters and digits.
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Number of codes per batch.
const BATCH_SIZE: usize = 10;

/// Length of each code in characters.
const CODE_LEN: usize = 8;

/// A freshly generated batch of backup codes.
#[derive(Clone, Debug)]
pub struct BackupCodes {
    /// The codes, for one-time display to the user.
    pub codes: Vec<String>,
}

impl BackupCodes {
    /// Format codes for display to the user (grouped for readability).
    ///
    /// Codes that cannot be split at the midpoint (caller-constructed short
    /// or non-ASCII values) are passed through unchanged.
    #[must_use]
    pub fn display_codes(&self) -> Vec<String> {
        self.codes
            .iter()
            .map(|c| {
                if c.len() >= CODE_LEN && c.is_char_boundary(CODE_LEN / 2) {
                    format!("{}-{}", &c[..CODE_LEN / 2], &c[CODE_LEN / 2..])
                } else {
                    c.clone()
                }
            })
            .collect()
    }
}

/// Generates cryptographically secure backup codes.
#[derive(Clone, Debug, Default)]
pub struct BackupCodeGenerator;

impl BackupCodeGenerator {
    /// Create a new backup code generator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Generate a batch of 10 codes from the given CSPRNG.
    #[must_use]
    pub fn generate(&self, rng: &mut (impl RngCore + CryptoRng)) -> BackupCodes {
        let codes = (0..BATCH_SIZE)
            .map(|_| {
                (0..CODE_LEN)
                    .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
                    .collect()
            })
            .collect();

        BackupCodes { codes }
    }
}

/// Tracks which backup codes of a batch have been redeemed.
///
/// Each code redeems at most once. The external account record owns
/// persistence of this ledger; the core only mutates it in memory.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BackupCodeLedger {
    issued: Vec<String>,
    consumed: HashSet<String>,
}

impl BackupCodeLedger {
    /// Start a ledger from a freshly generated batch.
    ///
    /// Replaces any prior ledger wholesale, the same way a re-enrollment
    /// replaces the secret.
    #[must_use]
    pub fn new(batch: &BackupCodes) -> Self {
        Self {
            issued: batch.codes.clone(),
            consumed: HashSet::new(),
        }
    }

    /// Redeem a code, consuming it.
    ///
    /// Returns `true` exactly once per issued code. Input is normalized
    /// (uppercased, dashes stripped) and matched in constant time. Unknown
    /// or already-consumed codes return `false`, never an error.
    pub fn redeem(&mut self, candidate: &str) -> bool {
        let normalized = candidate.replace('-', "").to_uppercase();

        let matched = self
            .issued
            .iter()
            .filter(|code| !self.consumed.contains(*code))
            .find(|code| bool::from(code.as_bytes().ct_eq(normalized.as_bytes())))
            .cloned();

        match matched {
            Some(code) => {
                self.consumed.insert(code);
                tracing::info!(
                    target: "auth.backup.redeemed",
                    remaining = self.remaining(),
                    "Backup code redeemed"
                );
                true
            }
            None => false,
        }
    }

    /// Number of codes still available.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.issued.len() - self.consumed.len()
    }
}
