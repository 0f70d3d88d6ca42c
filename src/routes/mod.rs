use axum::Router;

use crate::state::AppState;

pub mod analytics;
pub mod appointments;
pub mod auth;
pub mod catalog;
pub mod doc;
pub mod health;
pub mod params;
pub mod products;
pub mod public;
pub mod salons;
pub mod sales;
pub mod schedules;
pub mod staff;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/salons", salons::router())
        .nest("/staff", staff::router())
        .nest("/services", catalog::router())
        .nest("/products", products::router())
        .nest("/sales", sales::router())
        .nest("/appointments", appointments::router())
        .nest("/schedules", schedules::router())
        .nest("/analytics", analytics::router())
        .nest("/public", public::router())
}
