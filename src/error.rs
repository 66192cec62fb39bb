/// The main error type for the authentication core.
///
/// Verification paths (`verify`, `check_password`, `redeem`) never return
/// these; they fail closed with `false`. Errors surface only from setup
/// paths where a misconfigured cryptographic primitive must abort startup
/// rather than silently degrade security.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("cryptographic primitive failure: {0}")]
    Crypto(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl AuthError {
    pub fn crypto(msg: impl Into<String>) -> Self {
        Self::Crypto(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Result type alias for the authentication core.
pub type Result<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_error() {
        let err = AuthError::crypto("hmac rejected key");
        assert!(matches!(err, AuthError::Crypto(_)));
        assert_eq!(
            err.to_string(),
            "cryptographic primitive failure: hmac rejected key"
        );
    }

    #[test]
    fn test_invalid_input_error() {
        let err = AuthError::invalid_input("empty secret");
        assert!(matches!(err, AuthError::InvalidInput(_)));
        assert_eq!(err.to_string(), "invalid input: empty secret");
    }
}
