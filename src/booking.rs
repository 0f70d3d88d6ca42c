//! Appointment lifecycle rules and the slot grids offered to clients and staff.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    entity::enums::AppointmentStatus,
    error::{AppError, AppResult},
    models::StaffRef,
    scope::Scope,
};

pub const PUBLIC_SLOTS: [&str; 8] = [
    "09:00", "10:00", "11:00", "14:00", "15:00", "16:00", "17:00", "18:00",
];

pub const STAFF_SLOTS: [&str; 12] = [
    "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "14:00", "14:30", "15:00", "15:30",
    "16:00", "16:30",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookingChannel {
    Public,
    Staff,
}

impl BookingChannel {
    pub fn slots(self) -> &'static [&'static str] {
        match self {
            BookingChannel::Public => &PUBLIC_SLOTS,
            BookingChannel::Staff => &STAFF_SLOTS,
        }
    }

    /// Parses `slot` if it belongs to this channel's grid.
    pub fn parse_slot(self, slot: &str) -> AppResult<NaiveTime> {
        if !self.slots().contains(&slot) {
            return Err(AppError::validation(format!("{slot} is not a bookable slot")));
        }
        NaiveTime::parse_from_str(slot, "%H:%M")
            .map_err(|_| AppError::validation(format!("{slot} is not a bookable slot")))
    }

    pub fn start_time(self, date: NaiveDate, slot: &str) -> AppResult<DateTime<Utc>> {
        Ok(date.and_time(self.parse_slot(slot)?).and_utc())
    }

    /// Status a new appointment starts in. Only a manager assigning a named
    /// collaborator from the back office skips the pending stage.
    pub fn initial_status(self, scope: Option<&Scope>, staff: StaffRef) -> AppointmentStatus {
        match (self, scope) {
            (BookingChannel::Staff, Some(scope)) if scope.can_manage() && !staff.is_unassigned() => {
                AppointmentStatus::Confirmed
            }
            _ => AppointmentStatus::Pending,
        }
    }
}

pub fn can_transition(from: AppointmentStatus, to: AppointmentStatus) -> bool {
    use AppointmentStatus::*;
    matches!(
        (from, to),
        (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled)
    )
}

pub fn ensure_transition(from: AppointmentStatus, to: AppointmentStatus) -> AppResult<()> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "appointment cannot move from {} to {}",
            status_name(from),
            status_name(to)
        )))
    }
}

pub fn is_terminal(status: AppointmentStatus) -> bool {
    matches!(status, AppointmentStatus::Cancelled | AppointmentStatus::Completed)
}

pub fn status_name(status: AppointmentStatus) -> &'static str {
    match status {
        AppointmentStatus::Pending => "pending",
        AppointmentStatus::Confirmed => "confirmed",
        AppointmentStatus::Cancelled => "cancelled",
        AppointmentStatus::Completed => "completed",
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Iterable;
    use uuid::Uuid;

    use super::*;
    use crate::entity::enums::Role;

    #[test]
    fn lifecycle_follows_the_transition_table() {
        use AppointmentStatus::*;
        assert!(can_transition(Pending, Confirmed));
        assert!(can_transition(Pending, Cancelled));
        assert!(can_transition(Confirmed, Completed));
        assert!(can_transition(Confirmed, Cancelled));
        assert!(!can_transition(Pending, Completed));
        assert!(!can_transition(Confirmed, Pending));
        assert!(ensure_transition(Pending, Pending).is_err());

        for terminal in [Cancelled, Completed] {
            assert!(is_terminal(terminal));
            assert!(AppointmentStatus::iter().all(|to| !can_transition(terminal, to)));
        }
    }

    #[test]
    fn slots_are_channel_specific() {
        let d = NaiveDate::from_ymd_opt(2025, 10, 3).unwrap();
        assert!(BookingChannel::Public.parse_slot("17:00").is_ok());
        assert!(BookingChannel::Public.parse_slot("09:30").is_err());
        assert!(BookingChannel::Staff.parse_slot("09:30").is_ok());
        assert!(BookingChannel::Staff.parse_slot("18:00").is_err());
        assert_eq!(
            BookingChannel::Public.start_time(d, "14:00").unwrap().to_rfc3339(),
            "2025-10-03T14:00:00+00:00"
        );
    }

    #[test]
    fn only_managers_assigning_staff_confirm_immediately() {
        let staff_member = StaffRef::Staff(Uuid::new_v4());
        let mut scope = Scope::empty(Uuid::new_v4());
        scope.role = Role::Manager;
        scope.organization_owner_id = Some(Uuid::new_v4());

        assert_eq!(
            BookingChannel::Staff.initial_status(Some(&scope), staff_member),
            AppointmentStatus::Confirmed
        );
        assert_eq!(
            BookingChannel::Staff.initial_status(Some(&scope), StaffRef::Any),
            AppointmentStatus::Pending
        );
        assert_eq!(
            BookingChannel::Public.initial_status(None, staff_member),
            AppointmentStatus::Pending
        );
        scope.role = Role::Staff;
        assert_eq!(
            BookingChannel::Staff.initial_status(Some(&scope), staff_member),
            AppointmentStatus::Pending
        );
    }
}
