use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{entity::enums::Role, models::StaffMember};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct InviteStaffRequest {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub salon_ids: Vec<Uuid>,
    #[serde(default = "default_true")]
    pub is_bookable: bool,
    #[serde(default = "default_true")]
    pub can_view_own_schedule: bool,
    #[serde(default)]
    pub restrict_to_current_day: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateStaffRequest {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub salon_ids: Option<Vec<Uuid>>,
    pub is_bookable: Option<bool>,
    pub can_view_own_schedule: Option<bool>,
    pub restrict_to_current_day: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct StaffList {
    #[schema(value_type = Vec<StaffMember>)]
    pub items: Vec<StaffMember>,
}
