//! TOTP (Time-based One-Time Password) engine.
//!
//! RFC 6238 with an HMAC-SHA-1 core for compatibility with common
//! authenticator apps: 20-byte secrets, 30-second time steps, 6-digit codes,
//! dynamic truncation. Stateless per call; correctness depends only on the
//! clock and the shared secret.

use crate::base32;
use crate::error::{AuthError, Result};
use hmac::{Hmac, Mac};
use rand::{CryptoRng, RngCore};
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;

/// Secret length in bytes (160 bits).
const SECRET_LEN: usize = 20;

/// Accepted clock drift, in time steps, on either side of the current window.
const DRIFT_STEPS: i64 = 1;

/// Configuration for TOTP generation.
#[derive(Clone, Debug)]
pub struct TotpConfig {
    /// Issuer name shown in authenticator apps (e.g., "MyApp").
    pub issuer: String,
    /// Number of digits in the code (default: 6).
    pub digits: u32,
    /// Time step in seconds (default: 30).
    pub step: u64,
    /// Base URL of the external QR-rendering collaborator.
    pub qr_endpoint: String,
}

impl Default for TotpConfig {
    fn default() -> Self {
        Self {
            issuer: "App".to_string(),
            digits: 6,
            step: 30,
            qr_endpoint: "https://api.qrserver.com/v1/create-qr-code/".to_string(),
        }
    }
}

impl TotpConfig {
    /// Create a new TOTP config with the given issuer name.
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            ..Default::default()
        }
    }

    /// Set the number of digits (6 to 8 per RFC 4226; other values are
    /// rejected when codes are computed).
    #[must_use]
    pub fn digits(mut self, digits: u32) -> Self {
        self.digits = digits;
        self
    }

    /// Set the time step in seconds.
    #[must_use]
    pub fn step(mut self, step: u64) -> Self {
        self.step = step;
        self
    }

    /// Point at a different QR-rendering service.
    #[must_use]
    pub fn qr_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.qr_endpoint = endpoint.into();
        self
    }
}

/// Data returned when setting up TOTP for a user.
#[derive(Clone, Debug)]
pub struct TotpSetup {
    /// Base32-encoded secret for the account record to store.
    pub secret: String,
    /// Provisioning URI (otpauth://...) for authenticator apps.
    pub uri: String,
    /// URL of the external QR-rendering collaborator for this URI.
    pub qr_url: String,
}

/// Manages TOTP operations.
#[derive(Clone, Debug)]
pub struct TotpManager {
    config: TotpConfig,
}

impl TotpManager {
    /// Create a new TOTP manager with the given configuration.
    pub fn new(config: TotpConfig) -> Self {
        Self { config }
    }

    /// Generate a fresh Base32-encoded secret from the given CSPRNG.
    #[must_use]
    pub fn generate_secret(&self, rng: &mut (impl RngCore + CryptoRng)) -> String {
        let mut bytes = [0u8; SECRET_LEN];
        rng.fill_bytes(&mut bytes);
        base32::encode(&bytes)
    }

    /// Generate a complete enrollment bundle for a user.
    ///
    /// Returns the secret, the provisioning URI, and the QR-rendering URL.
    pub fn generate_setup(
        &self,
        rng: &mut (impl RngCore + CryptoRng),
        username: &str,
    ) -> Result<TotpSetup> {
        let secret = self.generate_secret(rng);

        // Exercise the HMAC primitive once so a broken runtime aborts
        // enrollment instead of surfacing later on the login path.
        self.compute_code(&secret, 0)?;

        let uri = self.provisioning_uri(username, &secret);
        let qr_url = self.qr_render_url(&uri);

        Ok(TotpSetup {
            secret,
            uri,
            qr_url,
        })
    }

    /// Compute the code for a secret at a specific time window.
    ///
    /// The window is `floor(unix_seconds / step)`. Applies RFC 6238 dynamic
    /// truncation: the low nibble of the final HMAC byte selects a 4-byte
    /// big-endian read, the top bit is masked to keep the value in 31 bits,
    /// and the result is reduced modulo `10^digits` and zero-padded.
    ///
    /// A digit count outside the RFC 4226 range of 6 to 8 is a
    /// configuration error.
    pub fn compute_code(&self, secret: &str, window: u64) -> Result<String> {
        let digits = self.config.digits;
        if !(6..=8).contains(&digits) {
            return Err(AuthError::invalid_input(format!(
                "TOTP digits must be between 6 and 8, got {digits}"
            )));
        }

        let key = base32::decode(secret);

        let mut mac = Hmac::<Sha1>::new_from_slice(&key)
            .map_err(|e| AuthError::crypto(format!("HMAC-SHA1 rejected key: {e}")))?;
        mac.update(&window.to_be_bytes());
        let digest = mac.finalize().into_bytes();

        let offset = (digest[digest.len() - 1] & 0x0f) as usize;
        let binary = (u32::from(digest[offset] & 0x7f) << 24)
            | (u32::from(digest[offset + 1]) << 16)
            | (u32::from(digest[offset + 2]) << 8)
            | u32::from(digest[offset + 3]);

        let code = binary % 10u32.pow(digits);
        Ok(format!("{:0width$}", code, width = digits as usize))
    }

    /// Compute the code for the current time window.
    pub fn current_code(&self, secret: &str) -> Result<String> {
        self.compute_code(secret, self.window_at(unix_now()))
    }

    /// Verify a candidate code against the current clock.
    ///
    /// See [`verify_at`](Self::verify_at).
    #[must_use]
    pub fn verify(&self, secret: &str, candidate: &str) -> bool {
        self.verify_at(secret, candidate, unix_now())
    }

    /// Verify a candidate code at a specific unix timestamp.
    ///
    /// Accepts the code of the current window and of one window on either
    /// side (±30s clock-drift tolerance at the default step). Rejects a
    /// candidate that is not exactly `digits` characters after stripping
    /// spaces and dashes, and an empty secret. Never errors: an internal
    /// cryptographic failure is treated as verification failure.
    #[must_use]
    pub fn verify_at(&self, secret: &str, candidate: &str, now: u64) -> bool {
        let candidate = candidate.replace([' ', '-'], "");
        if secret.is_empty() || candidate.len() != self.config.digits as usize {
            return false;
        }

        let window = self.window_at(now) as i64;
        for offset in -DRIFT_STEPS..=DRIFT_STEPS {
            let step = window + offset;
            if step < 0 {
                continue;
            }
            match self.compute_code(secret, step as u64) {
                Ok(expected) => {
                    if bool::from(expected.as_bytes().ct_eq(candidate.as_bytes())) {
                        return true;
                    }
                }
                Err(e) => {
                    // Fail closed without leaking why verification failed.
                    tracing::warn!(target: "auth.totp.verify_error", error = %e, "TOTP verification error");
                    return false;
                }
            }
        }

        false
    }

    /// Build the provisioning URI for authenticator apps.
    ///
    /// `otpauth://totp/{issuer}:{username}?secret=...&issuer=...&digits=...&period=...`
    /// with reserved characters percent-encoded in each component. QR
    /// rendering of this URI belongs to the external collaborator; the core
    /// only guarantees the URI itself.
    #[must_use]
    pub fn provisioning_uri(&self, username: &str, secret: &str) -> String {
        let issuer = urlencoding::encode(&self.config.issuer);
        let username = urlencoding::encode(username);
        format!(
            "otpauth://totp/{issuer}:{username}?secret={secret}&issuer={issuer}&digits={digits}&period={period}",
            digits = self.config.digits,
            period = self.config.step,
        )
    }

    /// Build the URL of the external QR-rendering service for a URI.
    #[must_use]
    pub fn qr_render_url(&self, uri: &str) -> String {
        format!(
            "{}?data={}",
            self.config.qr_endpoint,
            urlencoding::encode(uri)
        )
    }

    fn window_at(&self, unix_seconds: u64) -> u64 {
        unix_seconds / self.config.step
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    // Base32 of the ASCII secret "12345678901234567890" from RFC 6238.
    const RFC_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

    fn manager() -> TotpManager {
        TotpManager::new(TotpConfig::new("TestApp"))
    }

    #[test]
    fn test_rfc6238_vectors() {
        let manager = manager();
        // (unix time, expected 6-digit code) from the RFC 6238 appendix.
        let cases = [
            (59u64, "287082"),
            (1_111_111_109, "081804"),
            (1_111_111_111, "050471"),
            (1_234_567_890, "005924"),
            (2_000_000_000, "279037"),
            (20_000_000_000, "353130"),
        ];

        for (time, expected) in cases {
            let code = manager.compute_code(RFC_SECRET, time / 30).unwrap();
            assert_eq!(code, expected, "at time {}", time);
        }
    }

    #[test]
    fn test_eight_digit_codes() {
        let manager = TotpManager::new(TotpConfig::new("TestApp").digits(8));
        // Full 8-digit values from the RFC 6238 appendix.
        assert_eq!(manager.compute_code(RFC_SECRET, 59 / 30).unwrap(), "94287082");
        assert_eq!(
            manager.compute_code(RFC_SECRET, 1_111_111_109 / 30).unwrap(),
            "07081804"
        );
    }

    #[test]
    fn test_out_of_range_digits_rejected() {
        for digits in [0, 5, 9, 10, 20] {
            let manager = TotpManager::new(TotpConfig::new("TestApp").digits(digits));
            assert!(
                matches!(
                    manager.compute_code(RFC_SECRET, 1),
                    Err(AuthError::InvalidInput(_))
                ),
                "digits {}",
                digits
            );
        }

        // Verification fails closed instead of erroring.
        let manager = TotpManager::new(TotpConfig::new("TestApp").digits(10));
        assert!(!manager.verify_at(RFC_SECRET, "0123456789", 59));
    }

    #[test]
    fn test_leading_zeros_preserved() {
        let manager = manager();
        let code = manager
            .compute_code(RFC_SECRET, 1_234_567_890 / 30)
            .unwrap();
        assert_eq!(code, "005924");
        assert_eq!(code.len(), 6);
    }

    #[test]
    fn test_verify_accepts_adjacent_windows() {
        let manager = manager();
        let now = 1_111_111_109u64;
        let window = now / 30;

        for w in [window - 1, window, window + 1] {
            let code = manager.compute_code(RFC_SECRET, w).unwrap();
            assert!(manager.verify_at(RFC_SECRET, &code, now), "window {}", w);
        }
    }

    #[test]
    fn test_verify_rejects_outside_drift() {
        let manager = manager();
        let now = 1_111_111_109u64;
        let window = now / 30;

        for w in [window - 2, window + 2] {
            let code = manager.compute_code(RFC_SECRET, w).unwrap();
            assert!(!manager.verify_at(RFC_SECRET, &code, now), "window {}", w);
        }
    }

    #[test]
    fn test_verify_rejects_malformed_input() {
        let manager = manager();
        assert!(!manager.verify_at(RFC_SECRET, "", 59));
        assert!(!manager.verify_at(RFC_SECRET, "28708", 59));
        assert!(!manager.verify_at(RFC_SECRET, "2870822", 59));
        assert!(!manager.verify_at("", "287082", 59));
    }

    #[test]
    fn test_verify_tolerates_spaces_and_dashes() {
        let manager = manager();
        assert!(manager.verify_at(RFC_SECRET, "287 082", 59));
        assert!(manager.verify_at(RFC_SECRET, "287-082", 59));
    }

    #[test]
    fn test_generate_secret_is_160_bits() {
        let manager = manager();
        let secret = manager.generate_secret(&mut OsRng);
        // 20 bytes encode to 32 base32 symbols.
        assert_eq!(secret.len(), 32);
        assert_eq!(crate::base32::decode(&secret).len(), 20);
        assert_ne!(secret, manager.generate_secret(&mut OsRng));
    }

    #[test]
    fn test_generated_code_verifies() {
        let manager = manager();
        let secret = manager.generate_secret(&mut OsRng);
        let now = 1_700_000_000u64;
        let code = manager.compute_code(&secret, now / 30).unwrap();
        assert!(manager.verify_at(&secret, &code, now));
    }

    #[test]
    fn test_provisioning_uri_format() {
        let manager = manager();
        let uri = manager.provisioning_uri("user@example.com", RFC_SECRET);
        assert_eq!(
            uri,
            format!(
                "otpauth://totp/TestApp:user%40example.com?secret={}&issuer=TestApp&digits=6&period=30",
                RFC_SECRET
            )
        );
    }

    #[test]
    fn test_provisioning_uri_encodes_issuer() {
        let manager = TotpManager::new(TotpConfig::new("Farm & Market"));
        let uri = manager.provisioning_uri("alice", "AAAA");
        assert!(uri.starts_with("otpauth://totp/Farm%20%26%20Market:alice?"));
        assert!(uri.contains("issuer=Farm%20%26%20Market"));
    }

    #[test]
    fn test_qr_render_url_encodes_uri() {
        let manager = manager();
        let qr = manager.qr_render_url("otpauth://totp/a:b?secret=X");
        assert!(qr.starts_with("https://api.qrserver.com/v1/create-qr-code/?data="));
        assert!(qr.contains("otpauth%3A%2F%2Ftotp%2Fa%3Ab%3Fsecret%3DX"));
    }

    #[test]
    fn test_generate_setup_bundle() {
        let manager = manager();
        let setup = manager.generate_setup(&mut OsRng, "user@example.com").unwrap();

        assert_eq!(setup.secret.len(), 32);
        assert!(setup.uri.starts_with("otpauth://totp/TestApp:"));
        assert!(setup.uri.contains(&format!("secret={}", setup.secret)));
        assert!(setup.qr_url.contains("data="));
    }
}
