use serde::Serialize;
use utoipa::ToSchema;

use crate::analytics::{AttendanceRow, DateRange};

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceReport {
    pub range: DateRange,
    pub day_count: i64,
    pub rows: Vec<AttendanceRow>,
}
