//! Guest session cookie handling.

use std::sync::Arc;

use jiff::SignedDuration;
use salvo::{
    http::cookie::{Cookie, SameSite, time::Duration},
    prelude::*,
};

use storefront_app::domain::sessions::{
    DEFAULT_SESSION_TTL, GuestSession, SESSION_COOKIE_NAME, parse_session,
};

use crate::{extensions::*, state::State};

/// Cookie attributes for guest sessions.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SessionSettings {
    pub(crate) ttl: SignedDuration,
    pub(crate) secure: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_SESSION_TTL,
            secure: false,
        }
    }
}

impl SessionSettings {
    /// HttpOnly, `SameSite=Lax` cookie carrying `session`.
    pub(crate) fn cookie(&self, session: GuestSession) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, session.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(Duration::seconds(self.ttl.as_secs().max(0)))
            .secure(self.secure)
            .build()
    }
}

/// Resolve the guest session cookie, if any, into the depot.
#[handler]
pub(crate) async fn middleware(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if let Some(session) = req
        .cookie(SESSION_COOKIE_NAME)
        .and_then(|cookie| parse_session(cookie.value()))
    {
        depot.insert_guest_session(session);
    }

    ctrl.call_next(req, depot, res).await;
}

/// The caller's session, minting one and setting its cookie when absent.
pub(crate) fn ensure_session(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<GuestSession, StatusError> {
    if let Some(session) = depot.guest_session() {
        return Ok(session);
    }

    let settings = depot.obtain_or_500::<Arc<State>>()?.sessions;
    let session = GuestSession::new();

    res.add_cookie(settings.cookie(session));

    depot.insert_guest_session(session);

    Ok(session)
}
