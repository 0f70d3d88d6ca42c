use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Salon, Service, StaffMember};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpsertSalonRequest {
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub total_workstations: i32,
    pub booking_workstations: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct SalonList {
    #[schema(value_type = Vec<Salon>)]
    pub items: Vec<Salon>,
}

/// What an anonymous client sees before booking.
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicCatalog {
    pub salon: Salon,
    pub services: Vec<Service>,
    pub staff: Vec<PublicStaff>,
    pub slots: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PublicStaff {
    pub id: uuid::Uuid,
    pub name: String,
}

impl From<&StaffMember> for PublicStaff {
    fn from(member: &StaffMember) -> Self {
        Self {
            id: member.id,
            name: member.name.clone(),
        }
    }
}
