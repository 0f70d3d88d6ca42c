use sea_orm::DatabaseConnection;

use crate::events::EventPublisher;

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub events: EventPublisher,
    pub auth: AuthSettings,
}

#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}
