use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Product, Service};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpsertServiceRequest {
    pub salon_id: Uuid,
    pub name: String,
    pub price: i64,
    pub duration: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CloneCatalogRequest {
    pub source_salon_id: Uuid,
    pub target_salon_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CloneCatalogResult {
    pub source_salon_id: Uuid,
    pub target_salon_ids: Vec<Uuid>,
    pub services_per_target: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ServiceList {
    #[schema(value_type = Vec<Service>)]
    pub items: Vec<Service>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpsertProductRequest {
    pub salon_id: Uuid,
    pub name: String,
    pub price: i64,
    pub stock_qty: i32,
    pub alert_threshold: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StockAdjustRequest {
    pub delta: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}
