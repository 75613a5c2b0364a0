//! Anonymous player identity for Parlor.
//!
//! Browsers never log in. Instead, the first request from a browser gets
//! a random session token in a cookie, and every later request presents
//! it back. This crate handles:
//!
//! 1. **Drawing identifiers**: [`IdSpace`], shared with the room layer
//!    for room ids
//! 2. **Resolving identity**: [`IdentityIssuer::resolve_or_issue`] reads
//!    the `Cookie` header or mints a new token
//! 3. **Issuing the credential**: [`SessionCookie`] renders the
//!    `Set-Cookie` value a transport attaches to its response
//!
//! # How it fits in the stack
//!
//! ```text
//! Room Layer (above)  ← stores tokens in player slots
//!     ↕
//! Session Layer (this crate)  ← who is this browser?
//!     ↕
//! Protocol Layer (below)  ← provides SessionToken
//! ```
//!
//! There is no server-side session table: a token is valid for as long
//! as the browser keeps the cookie, and the server never revokes one.

mod cookie;
mod error;
mod identity;
mod ids;

pub use cookie::{SessionCookie, cookie_value};
pub use error::SessionError;
pub use identity::{Identity, IdentityConfig, IdentityIssuer};
pub use ids::IdSpace;
