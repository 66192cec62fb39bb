//! Breakwater - the authentication-security core
//!
//! Breakwater implements the security-sensitive pieces of a login system
//! and nothing else: TOTP multi-factor authentication (RFC 6238 with an
//! HMAC-SHA-1 core), the unpadded Base32 codec that makes secrets
//! transportable as text, single-use backup codes, salted password
//! credentials, and the per-account lockout/session state machine.
//!
//! Persistence, HTTP, session-token minting, and QR rendering belong to
//! external collaborators. The crate consumes in-memory values (a user
//! identifier, a stored secret or credential, a candidate code) and returns
//! verification results and freshly generated material.
//!
//! Authentication checks fail closed: `verify`, `check_password`, and
//! `redeem` return `false` on malformed or wrong input and never error.
//! Every generation function takes an explicit CSPRNG handle; the crate
//! holds no global random state.
//!
//! # Quick Start
//!
//! ```rust
//! use breakwater::{
//!     CredentialHasher, LockoutPolicy, SecurityState, TotpConfig, TotpManager,
//! };
//! use rand::rngs::OsRng;
//! use std::time::SystemTime;
//!
//! let hasher = CredentialHasher::new();
//! let credential = hasher.set_password(&mut OsRng, "a-long-passphrase", SystemTime::now());
//!
//! let totp = TotpManager::new(TotpConfig::new("MyApp"));
//! let setup = totp.generate_setup(&mut OsRng, "user@example.com").unwrap();
//!
//! let policy = LockoutPolicy::new();
//! let mut state = SecurityState::new();
//!
//! // A login attempt.
//! let now = SystemTime::now();
//! if !state.is_locked(now) {
//!     let code = totp.current_code(&setup.secret).unwrap();
//!     if hasher.check_password(Some(&credential), "a-long-passphrase")
//!         && totp.verify(&setup.secret, &code)
//!     {
//!         state.record_success();
//!         state.add_session("token-from-session-issuer");
//!     } else {
//!         state.record_failure(&policy, now);
//!     }
//! }
//! ```

pub mod account;
pub mod base32;
mod error;
pub mod lockout;
pub mod mfa;
pub mod password;

// Re-exports for public API
pub use account::{categories, category_info, permissions_for, AccountRole, Capability, CategoryInfo};
pub use error::{AuthError, Result};
pub use lockout::{LockoutPolicy, SecurityState};
pub use mfa::{BackupCodeGenerator, BackupCodeLedger, BackupCodes, TotpConfig, TotpManager, TotpSetup};
pub use password::{Credential, CredentialHasher};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging with sensible defaults.
///
/// Call early in the consuming application, before handling logins.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "debug", "breakwater=debug")
/// - `BREAKWATER_LOG_JSON`: Set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("BREAKWATER_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
