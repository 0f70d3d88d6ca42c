use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::StaffSchedule;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ToggleScheduleRequest {
    pub salon_id: Uuid,
    pub staff_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleScheduleResult {
    pub salon_id: Uuid,
    pub staff_id: Uuid,
    pub date: NaiveDate,
    pub present: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ScheduleList {
    #[schema(value_type = Vec<StaffSchedule>)]
    pub items: Vec<StaffSchedule>,
}
