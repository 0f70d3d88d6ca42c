use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::enums::AppointmentStatus,
    models::{Appointment, StaffRef},
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BookingRequest {
    pub salon_id: Uuid,
    pub service_id: Uuid,
    /// A collaborator id, or `"any"` to let the salon assign someone.
    #[schema(value_type = String, example = "any")]
    pub staff_id: StaffRef,
    pub date: NaiveDate,
    /// `HH:MM`, one of the offered slots.
    pub slot: String,
    pub client_name: String,
    pub client_phone: String,
    pub client_email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateAppointmentStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct AppointmentList {
    #[schema(value_type = Vec<Appointment>)]
    pub items: Vec<Appointment>,
}
