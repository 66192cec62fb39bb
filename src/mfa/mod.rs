//! Multi-factor authentication.
//!
//! TOTP (Time-based One-Time Password) enrollment and verification plus
//! backup codes with single-use redemption tracking.
//!
//! # Example
//!
//! ```rust
//! use breakwater::mfa::{BackupCodeGenerator, BackupCodeLedger, TotpConfig, TotpManager};
//! use rand::rngs::OsRng;
//!
//! let totp = TotpManager::new(TotpConfig::new("MyApp"));
//! let setup = totp.generate_setup(&mut OsRng, "user@example.com").unwrap();
//!
//! // The account record stores setup.secret; the user scans setup.qr_url.
//! let code = totp.current_code(&setup.secret).unwrap();
//! assert!(totp.verify(&setup.secret, &code));
//!
//! // Recovery codes, shown once and tracked for consumption.
//! let batch = BackupCodeGenerator::new().generate(&mut OsRng);
//! let mut ledger = BackupCodeLedger::new(&batch);
//! assert!(ledger.redeem(&batch.codes[0]));
//! assert!(!ledger.redeem(&batch.codes[0]));
//! ```

mod backup;
mod totp;

pub use backup::{BackupCodeGenerator, BackupCodeLedger, BackupCodes};
pub use totp::{TotpConfig, TotpManager, TotpSetup};
