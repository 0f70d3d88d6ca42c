use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr};
use uuid::Uuid;

use crate::{
    analytics::DateRange,
    audit,
    dto::schedules::{ScheduleList, ToggleScheduleRequest, ToggleScheduleResult},
    entity::{salon_members, staff_schedules, SalonMembers, StaffSchedules},
    error::{AppError, AppResult},
    models::StaffSchedule,
    response::{ApiResponse, Meta},
    routes::params::ScheduleQuery,
    scope::Scope,
    state::AppState,
};

/// Flips the presence tag of a collaborator for one salon and day: an
/// existing tag is removed, a missing one is created. Applying it twice
/// restores the previous state.
pub async fn toggle_schedule(
    state: &AppState,
    scope: &Scope,
    payload: ToggleScheduleRequest,
) -> AppResult<ApiResponse<ToggleScheduleResult>> {
    scope.ensure_manager()?;
    scope.ensure_salon(payload.salon_id)?;
    let ToggleScheduleRequest {
        salon_id,
        staff_id,
        date,
    } = payload;

    let is_owner = scope.organization_owner_id == Some(staff_id);
    let is_member = SalonMembers::find()
        .filter(salon_members::Column::StaffId.eq(staff_id))
        .filter(salon_members::Column::SalonId.eq(salon_id))
        .one(&state.orm)
        .await?
        .is_some();
    if !is_owner && !is_member {
        return Err(AppError::validation("collaborator is not a member of this salon"));
    }

    let existing = StaffSchedules::find()
        .filter(staff_schedules::Column::SalonId.eq(salon_id))
        .filter(staff_schedules::Column::StaffId.eq(staff_id))
        .filter(staff_schedules::Column::Date.eq(date))
        .one(&state.orm)
        .await?;

    let present = match existing {
        Some(tag) => {
            StaffSchedules::delete_by_id(tag.id).exec(&state.orm).await?;
            false
        }
        None => {
            match (staff_schedules::ActiveModel {
                id: Set(Uuid::new_v4()),
                salon_id: Set(salon_id),
                staff_id: Set(staff_id),
                date: Set(date),
            })
            .insert(&state.orm)
            .await
            {
                Ok(_) => true,
                // a concurrent toggle already created the tag
                Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                    tracing::debug!(%salon_id, %staff_id, %date, "presence tag already exists");
                    true
                }
                Err(err) => return Err(err.into()),
            }
        }
    };

    audit::record(
        &state.orm,
        Some(scope.principal_id),
        "schedule_toggle",
        "staff_schedules",
        serde_json::json!({
            "salon_id": salon_id,
            "staff_id": staff_id,
            "date": date,
            "present": present,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Schedule updated",
        ToggleScheduleResult {
            salon_id,
            staff_id,
            date,
            present,
        },
        None,
    ))
}

pub async fn list_schedules(
    state: &AppState,
    scope: &Scope,
    query: ScheduleQuery,
) -> AppResult<ApiResponse<ScheduleList>> {
    let range = DateRange::new(query.from, query.to)?;
    let items = fetch_schedules(state, scope, query.salon_id, &range).await?;
    let total = items.len();
    Ok(ApiResponse::success(
        "Schedules",
        ScheduleList { items },
        Some(Meta::listed(total)),
    ))
}

/// Presence tags of a salon over `range`; staff only see their own.
pub(crate) async fn fetch_schedules(
    state: &AppState,
    scope: &Scope,
    salon_id: Uuid,
    range: &DateRange,
) -> AppResult<Vec<StaffSchedule>> {
    let salons = scope.resolve_salons(Some(salon_id));
    if salons.is_empty() {
        return Ok(Vec::new());
    }

    let mut finder = StaffSchedules::find()
        .filter(staff_schedules::Column::SalonId.is_in(salons))
        .filter(staff_schedules::Column::Date.gte(range.start))
        .filter(staff_schedules::Column::Date.lte(range.end));
    if let Some(staff_id) = scope.staff_filter() {
        finder = finder.filter(staff_schedules::Column::StaffId.eq(staff_id));
    }
    let items: Vec<_> = finder
        .order_by_asc(staff_schedules::Column::Date)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(StaffSchedule::from)
        .collect();
    Ok(items)
}
