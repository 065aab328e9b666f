//! Guest Sessions

use jiff::SignedDuration;

use crate::uuids::TypedUuid;

/// Name of the cookie carrying the guest session.
pub const SESSION_COOKIE_NAME: &str = "cart_session_id";

/// Default lifetime of a guest session and its cart rows.
pub const DEFAULT_SESSION_TTL: SignedDuration = SignedDuration::from_hours(7 * 24);

/// Marker for anonymous shopper sessions.
#[derive(Debug)]
pub struct Guest;

/// Opaque token scoping an anonymous shopper's cart.
pub type GuestSession = TypedUuid<Guest>;

/// Marker for registered user accounts.
#[derive(Debug)]
pub struct User;

/// Identity of a registered user, distinct from any guest session.
pub type UserIdentity = TypedUuid<User>;

/// Parse a cookie value into a session. Malformed values yield `None`.
#[must_use]
pub fn parse_session(value: &str) -> Option<GuestSession> {
    value.trim().parse().ok()
}
