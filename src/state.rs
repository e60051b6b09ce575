use std::sync::Arc;

use sqlx::PgPool;

use crate::events::EventPublisher;
use crate::images::ImageStore;

/// Handles shared by every request. Services receive these explicitly.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub images: Arc<dyn ImageStore>,
    pub events: EventPublisher,
}
