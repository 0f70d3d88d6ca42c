use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::enums::{ItemType, PaymentMethod},
    models::Sale,
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SaleLineRequest {
    pub item_type: ItemType,
    pub ref_id: Uuid,
    pub qty: i32,
}

/// Checkout at the point of sale. Prices come from the salon catalog.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecordSaleRequest {
    pub salon_id: Uuid,
    /// Collaborator credited with the sale; ignored for staff, who are always credited themselves.
    pub staff_id: Option<Uuid>,
    pub items: Vec<SaleLineRequest>,
    #[serde(default)]
    pub tip_amount: i64,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CancelSaleRequest {
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct SaleList {
    #[schema(value_type = Vec<Sale>)]
    pub items: Vec<Sale>,
}
