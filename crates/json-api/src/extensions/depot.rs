//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use storefront_app::domain::sessions::GuestSession;

const GUEST_SESSION_DEPOT_KEY: &str = "guest_session";

/// Helpers for reading request-scoped values from the depot.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_guest_session(&mut self, session: GuestSession);

    /// The caller's guest session, when the request carried a valid cookie.
    fn guest_session(&self) -> Option<GuestSession>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_guest_session(&mut self, session: GuestSession) {
        self.insert(GUEST_SESSION_DEPOT_KEY, session);
    }

    fn guest_session(&self) -> Option<GuestSession> {
        self.get::<GuestSession>(GUEST_SESSION_DEPOT_KEY).ok().copied()
    }
}
