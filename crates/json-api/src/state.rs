//! State

use std::sync::Arc;

use storefront_app::context::AppContext;

use crate::sessions::SessionSettings;

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
    pub(crate) sessions: SessionSettings,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, sessions: SessionSettings) -> Arc<Self> {
        Arc::new(Self { app, sessions })
    }
}
