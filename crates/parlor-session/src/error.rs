//! Error types for the session layer.

/// Errors that can occur while resolving a browser's identity.
///
/// None of these reach a player: the issuer recovers from every one of
/// them by minting a fresh token.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The request carried no usable session cookie: no `Cookie` header,
    /// no cookie with the configured name, or an empty value.
    #[error("session cookie {0:?} not set")]
    CookieNotSet(String),
}
