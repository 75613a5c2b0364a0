//! Reading the session cookie from a request and rendering a new one.

use std::time::Duration;

use chrono::{DateTime, Utc};
use parlor_protocol::SessionToken;

/// Format for the `Expires` attribute (RFC 7231 IMF-fixdate).
const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// A session credential to be sent to the browser.
///
/// Built by [`IdentityIssuer`](crate::IdentityIssuer) whenever it mints a
/// token. A transport turns it into a `Set-Cookie` header with
/// [`to_header_value`](Self::to_header_value).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    /// Cookie name (`gameUser` by default).
    pub name: String,
    /// The new session token.
    pub token: SessionToken,
    /// Absolute wall-clock expiry, for the `Expires` attribute.
    pub expires: DateTime<Utc>,
    /// Relative lifetime, for the `Max-Age` attribute.
    pub max_age: Duration,
    /// Path scope (`/` covers the whole application).
    pub path: String,
}

impl SessionCookie {
    /// Renders the value of a `Set-Cookie` response header.
    ///
    /// ```text
    /// gameUser=48213; Expires=Mon, 19 Oct 2026 10:00:00 GMT; Max-Age=86400; Path=/
    /// ```
    pub fn to_header_value(&self) -> String {
        format!(
            "{}={}; Expires={}; Max-Age={}; Path={}",
            self.name,
            self.token.as_str(),
            self.expires.format(IMF_FIXDATE),
            self.max_age.as_secs(),
            self.path,
        )
    }
}

/// Looks up one cookie in a raw `Cookie` request header.
///
/// The header is a `;`-separated list of `name=value` pairs. Whitespace
/// around pairs is ignored, and a value wrapped in double quotes is
/// unwrapped. Returns `None` if the name isn't present.
///
/// ```rust
/// use parlor_session::cookie_value;
///
/// let header = "theme=dark; gameUser=48213";
/// assert_eq!(cookie_value(header, "gameUser"), Some("48213"));
/// assert_eq!(cookie_value(header, "missing"), None);
/// ```
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        if key.trim() != name {
            return None;
        }
        let value = value.trim();
        Some(
            value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value),
        )
    })
}
