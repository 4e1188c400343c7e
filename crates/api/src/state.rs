use std::sync::Arc;

use crate::config::ServerConfig;

/// Handler state. Cloned per request, so everything heavy sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: pressroom_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Release, credit and approval events fan out from here.
    pub event_bus: Arc<pressroom_events::EventBus>,
}
