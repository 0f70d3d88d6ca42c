use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

pub mod analytics;
pub mod appointments;
pub mod auth;
pub mod catalog;
pub mod salons;
pub mod sales;
pub mod schedules;
pub mod staff;

/// Acknowledges a deletion.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct Deleted {
    pub id: Uuid,
}
