//! The identity issuer: turns an inbound `Cookie` header into a session
//! token, minting one when the browser doesn't have one yet.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use parlor_protocol::SessionToken;
use serde::{Deserialize, Serialize};

use crate::{IdSpace, SessionCookie, SessionError, cookie_value};

// ---------------------------------------------------------------------------
// IdentityConfig
// ---------------------------------------------------------------------------

/// Configuration for issuing session credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Name of the cookie carrying the token.
    ///
    /// Default: `gameUser` (what the web client already stores).
    pub cookie_name: String,

    /// How long the browser keeps the cookie.
    ///
    /// Default: 24 hours.
    pub ttl: Duration,

    /// Path scope of the cookie. Default: `/`.
    pub path: String,

    /// Where new tokens are drawn from.
    ///
    /// Default: [`IdSpace::Hex128`]. `IdSpace::SIX_DIGIT` reproduces the
    /// old six-digit tokens, which are easy to guess.
    pub token_space: IdSpace,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            cookie_name: "gameUser".to_string(),
            ttl: Duration::from_secs(24 * 60 * 60),
            path: "/".to_string(),
            token_space: IdSpace::Hex128,
        }
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// The resolved identity of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Who the caller is.
    pub token: SessionToken,

    /// A credential the transport must send back, present only when the
    /// token was minted for this request.
    pub issued: Option<SessionCookie>,
}

impl Identity {
    /// Returns `true` if the token was minted for this request.
    pub fn is_new(&self) -> bool {
        self.issued.is_some()
    }
}

// ---------------------------------------------------------------------------
// IdentityIssuer
// ---------------------------------------------------------------------------

/// Resolves and mints anonymous session tokens.
///
/// There is no validation beyond presence: any non-empty cookie value is
/// accepted as an identity. Someone who guesses another browser's token
/// can act as that browser, which is why the default token space is
/// 128 bits wide.
#[derive(Debug, Clone, Default)]
pub struct IdentityIssuer {
    config: IdentityConfig,
}

impl IdentityIssuer {
    /// Creates an issuer with the given config.
    pub fn new(config: IdentityConfig) -> Self {
        Self { config }
    }

    /// Returns the issuer's config.
    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    /// Returns the caller's existing token, or mints a new one.
    ///
    /// `cookie_header` is the raw value of the request's `Cookie` header,
    /// if it had one. A missing or empty credential is not an error for
    /// the caller: it just means "new browser".
    pub fn resolve_or_issue(&self, cookie_header: Option<&str>) -> Identity {
        match self.read_token(cookie_header) {
            Ok(token) => Identity {
                token,
                issued: None,
            },
            Err(SessionError::CookieNotSet(name)) => {
                tracing::debug!(cookie = %name, "no session cookie, issuing");
                self.issue()
            }
        }
    }

    /// Extracts the session token from a `Cookie` header.
    ///
    /// # Errors
    /// Returns [`SessionError::CookieNotSet`] if there's no header, no
    /// cookie with the configured name, or the value is empty.
    pub fn read_token(
        &self,
        cookie_header: Option<&str>,
    ) -> Result<SessionToken, SessionError> {
        cookie_header
            .and_then(|header| cookie_value(header, &self.config.cookie_name))
            .filter(|value| !value.is_empty())
            .map(SessionToken::new)
            .ok_or_else(|| {
                SessionError::CookieNotSet(self.config.cookie_name.clone())
            })
    }

    /// Mints a new token with a credential expiring `ttl` from now.
    pub fn issue(&self) -> Identity {
        self.issue_at(Utc::now())
    }

    /// Mints a new token with a credential expiring `ttl` after `now`.
    pub fn issue_at(&self, now: DateTime<Utc>) -> Identity {
        let token = SessionToken::new(self.config.token_space.draw());
        let lifetime = TimeDelta::from_std(self.config.ttl)
            .unwrap_or(TimeDelta::MAX);
        let expires = now
            .checked_add_signed(lifetime)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        tracing::info!(%token, %expires, "session token issued");

        let cookie = SessionCookie {
            name: self.config.cookie_name.clone(),
            token: token.clone(),
            expires,
            max_age: self.config.ttl,
            path: self.config.path.clone(),
        };

        Identity {
            token,
            issued: Some(cookie),
        }
    }
}
