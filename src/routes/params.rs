use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{analytics::DateRange, error::AppResult};

/// Optional salon narrowing; absent means every salon in scope.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct SalonFilter {
    pub salon_id: Option<Uuid>,
}

macro_rules! period_range {
    ($($query:ty),*) => {
        $(impl $query {
            pub fn range(&self) -> AppResult<DateRange> {
                DateRange::new(self.start, self.end)
            }
        })*
    };
}

period_range!(SalesQuery, DashboardQuery, AttendanceQuery);

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct SalesQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub salon_id: Option<Uuid>,
    #[serde(default)]
    pub include_cancelled: bool,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct ServiceQuery {
    pub salon_id: Uuid,
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct ProductQuery {
    pub salon_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct ScheduleQuery {
    pub salon_id: Uuid,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct AppointmentQuery {
    pub salon_id: Uuid,
    pub date: NaiveDate,
    pub staff_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct DashboardQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub salon_id: Option<Uuid>,
    pub top: Option<usize>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct AttendanceQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub salon_id: Option<Uuid>,
    #[serde(default)]
    pub include_tips: bool,
}
