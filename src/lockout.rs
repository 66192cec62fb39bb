//! Account lockout and session state machine.
//!
//! Tracks failed-login counters, the lockout window, and active session
//! tokens per account. The state is `Unlocked` while the counter stays
//! below the policy threshold and `Locked` once it reaches it; a lock
//! expires on its own the first time the state is queried after
//! `lockout_until` passes.
//!
//! All operations are synchronous read-modify-write sequences. Callers must
//! serialize mutation of the same account's state (a per-account lock,
//! actor, or transaction); two unserialized concurrent failures could each
//! observe the pre-threshold count and race the lockout transition.
//!
//! # Tracing Events
//!
//! - `auth.lockout.account_locked` - failure threshold reached
//! - `auth.lockout.auto_unlocked` - lockout window expired
//! - `auth.lockout.cleared` - counter reset on successful login

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{Duration, SystemTime};

/// Default maximum failed attempts before lockout.
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default lockout duration (30 minutes).
const DEFAULT_LOCKOUT_DURATION: Duration = Duration::from_secs(30 * 60);

/// Lockout policy configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockoutPolicy {
    /// Failed attempts at which the account locks.
    pub max_attempts: u32,
    /// How long the account stays locked.
    pub lockout_duration: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            lockout_duration: DEFAULT_LOCKOUT_DURATION,
        }
    }
}

impl LockoutPolicy {
    /// Create a policy with default settings (5 attempts, 30 minutes).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the failed-attempt threshold.
    #[must_use]
    pub fn max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max;
        self
    }

    /// Set the lockout duration.
    #[must_use]
    pub fn lockout_duration(mut self, duration: Duration) -> Self {
        self.lockout_duration = duration;
        self
    }
}

/// Per-account security state.
///
/// Initializes to the zero/unlocked state when the account is created; it
/// has no separate creation step. Invariant: `locked` implies
/// `lockout_until` is set and `failed_attempts` has reached the policy
/// threshold.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityState {
    /// Consecutive failed login attempts.
    pub failed_attempts: u32,
    /// When the most recent failure happened.
    pub last_failed_at: Option<SystemTime>,
    /// Whether the account is currently locked.
    pub locked: bool,
    /// When the lockout expires (set iff locked).
    pub lockout_until: Option<SystemTime>,
    /// Opaque session tokens minted by the external session issuer.
    pub active_sessions: HashSet<String>,
    /// Last explicit `touch`; stamped only by the caller, never implicitly.
    pub touched_at: Option<SystemTime>,
}

impl SecurityState {
    /// Create a fresh unlocked state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed login attempt.
    ///
    /// Increments the counter and stamps `last_failed_at`. When the counter
    /// reaches the policy threshold the state transitions to locked with
    /// `lockout_until = now + lockout_duration`. Returns `true` iff this
    /// call performed that transition.
    pub fn record_failure(&mut self, policy: &LockoutPolicy, now: SystemTime) -> bool {
        self.failed_attempts += 1;
        self.last_failed_at = Some(now);

        if !self.locked && self.failed_attempts >= policy.max_attempts {
            self.locked = true;
            self.lockout_until = Some(now + policy.lockout_duration);

            tracing::warn!(
                target: "auth.lockout.account_locked",
                attempts = self.failed_attempts,
                duration_secs = policy.lockout_duration.as_secs(),
                "Account locked due to failed attempts"
            );
            return true;
        }

        false
    }

    /// Record a successful login.
    ///
    /// Resets the failure counter and clears `last_failed_at`. Does not
    /// unlock a locked state: callers must check [`is_locked`](Self::is_locked)
    /// before evaluating credentials, so a success is never recorded while
    /// locked.
    pub fn record_success(&mut self) {
        self.failed_attempts = 0;
        self.last_failed_at = None;

        tracing::debug!(
            target: "auth.lockout.cleared",
            "Failure counter cleared on successful login"
        );
    }

    /// Whether the account is locked at `now`.
    ///
    /// A lock whose window has passed is cleared here, exactly once: the
    /// locked flag and `lockout_until` are dropped and the failure counter
    /// resets to 0 atomically with the query.
    pub fn is_locked(&mut self, now: SystemTime) -> bool {
        if self.locked {
            if let Some(until) = self.lockout_until {
                if now > until {
                    self.locked = false;
                    self.lockout_until = None;
                    self.failed_attempts = 0;

                    tracing::info!(
                        target: "auth.lockout.auto_unlocked",
                        "Lockout window expired, account unlocked"
                    );
                    return false;
                }
            }
        }
        self.locked
    }

    /// Register an active session token.
    pub fn add_session(&mut self, token: impl Into<String>) {
        self.active_sessions.insert(token.into());
    }

    /// Remove a session token. Returns `true` if it was present.
    pub fn remove_session(&mut self, token: &str) -> bool {
        self.active_sessions.remove(token)
    }

    /// Revoke every active session.
    pub fn clear_all_sessions(&mut self) {
        self.active_sessions.clear();
    }

    /// Whether the given session token is active.
    #[must_use]
    pub fn has_active_session(&self, token: &str) -> bool {
        self.active_sessions.contains(token)
    }

    /// Stamp the state as modified at `now`.
    ///
    /// Invoked explicitly by the caller after a batch of changes; no
    /// individual mutator stamps a timestamp on its own.
    pub fn touch(&mut self, now: SystemTime) {
        self.touched_at = Some(now);
    }
}
