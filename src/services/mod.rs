pub mod analytics_service;
pub mod auth_service;
pub mod booking_service;
pub mod catalog_service;
pub mod inventory_service;
pub mod sale_service;
pub mod salon_service;
pub mod schedule_service;
pub mod scope_service;
pub mod staff_service;
