use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    analytics::{DateRange, is_tagged_present},
    audit,
    booking::{self, BookingChannel},
    dto::appointments::{AppointmentList, BookingRequest, UpdateAppointmentStatusRequest},
    entity::{appointments, enums::AppointmentStatus, services, Appointments, Salons, Services},
    error::{AppError, AppResult},
    events::DomainEvent,
    models::{Appointment, StaffRef, UNASSIGNED_STAFF_NAME},
    response::{ApiResponse, Meta},
    routes::params::AppointmentQuery,
    scope::Scope,
    services::{schedule_service, staff_service},
    state::AppState,
};

/// Online booking by an anonymous client. Always starts `pending`.
pub async fn create_public_booking(
    state: &AppState,
    payload: BookingRequest,
) -> AppResult<ApiResponse<Appointment>> {
    let appointment = create_booking(state, None, BookingChannel::Public, payload).await?;

    if let Some(client_email) = appointment.client_email.clone() {
        let salon_name = salon_name(state, appointment.salon_id).await;
        state.events.publish(DomainEvent::BookingRequested {
            appointment_id: appointment.id,
            salon_name,
            service_name: appointment.service_name.clone(),
            client_name: appointment.client_name.clone(),
            client_email,
            start_time: appointment.start_time,
        });
    }

    Ok(ApiResponse::success("Booking requested", appointment, None))
}

/// Booking entered from the back office on behalf of a client.
pub async fn create_staff_booking(
    state: &AppState,
    scope: &Scope,
    payload: BookingRequest,
) -> AppResult<ApiResponse<Appointment>> {
    scope.ensure_salon(payload.salon_id)?;
    if scope.is_staff() {
        if let StaffRef::Staff(id) = payload.staff_id {
            if id != scope.principal_id {
                return Err(AppError::PermissionDenied);
            }
        }
        ensure_calendar_access(state, scope, payload.salon_id, payload.date).await?;
    }

    let appointment = create_booking(state, Some(scope), BookingChannel::Staff, payload).await?;
    Ok(ApiResponse::success("Appointment created", appointment, None))
}

pub async fn list_appointments(
    state: &AppState,
    scope: &Scope,
    query: AppointmentQuery,
) -> AppResult<ApiResponse<AppointmentList>> {
    let salons = scope.resolve_salons(Some(query.salon_id));
    let visible = !salons.is_empty()
        && (!scope.is_staff()
            || has_calendar_access(state, scope, query.salon_id, query.date).await?);
    if !visible {
        return Ok(ApiResponse::success(
            "Appointments",
            AppointmentList { items: Vec::new() },
            Some(Meta::listed(0)),
        ));
    }

    let (from, until) = DateRange::single(query.date).utc_bounds();
    let mut finder = Appointments::find()
        .filter(appointments::Column::SalonId.is_in(salons))
        .filter(appointments::Column::StartTime.gte(from.fixed_offset()))
        .filter(appointments::Column::StartTime.lt(until.fixed_offset()));
    if let Some(staff_id) = scope.staff_filter().or(query.staff_id) {
        finder = finder.filter(appointments::Column::StaffId.eq(staff_id));
    }
    let items: Vec<_> = finder
        .order_by_asc(appointments::Column::StartTime)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Appointment::from)
        .collect();

    let total = items.len();
    Ok(ApiResponse::success(
        "Appointments",
        AppointmentList { items },
        Some(Meta::listed(total)),
    ))
}

/// Applies a lifecycle transition. Staff may only act on their own
/// appointments, on days their calendar is open to them.
pub async fn update_status(
    state: &AppState,
    scope: &Scope,
    id: Uuid,
    payload: UpdateAppointmentStatusRequest,
) -> AppResult<ApiResponse<Appointment>> {
    let existing = Appointments::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.ensure_salon(existing.salon_id)?;
    if scope.is_staff() {
        if existing.staff_id != Some(scope.principal_id) {
            return Err(AppError::PermissionDenied);
        }
        let day = existing.start_time.with_timezone(&Utc).date_naive();
        ensure_calendar_access(state, scope, existing.salon_id, day).await?;
    }

    let from = existing.status;
    let to = payload.status;
    booking::ensure_transition(from, to)?;

    let mut active: appointments::ActiveModel = existing.into();
    active.status = Set(to);
    let appointment = Appointment::from(active.update(&state.orm).await?);

    audit::record(
        &state.orm,
        Some(scope.principal_id),
        "appointment_status",
        "appointments",
        serde_json::json!({
            "appointment_id": id,
            "from": booking::status_name(from),
            "to": booking::status_name(to),
        }),
    )
    .await;

    if from == AppointmentStatus::Pending && to == AppointmentStatus::Confirmed {
        state.events.publish(DomainEvent::BookingConfirmed {
            appointment_id: appointment.id,
            salon_name: salon_name(state, appointment.salon_id).await,
            service_name: appointment.service_name.clone(),
            client_name: appointment.client_name.clone(),
            client_email: appointment.client_email.clone(),
            start_time: appointment.start_time,
        });
    }

    Ok(ApiResponse::success("Appointment updated", appointment, None))
}

async fn create_booking(
    state: &AppState,
    scope: Option<&Scope>,
    channel: BookingChannel,
    payload: BookingRequest,
) -> AppResult<Appointment> {
    let BookingRequest {
        salon_id,
        service_id,
        staff_id,
        date,
        slot,
        client_name,
        client_phone,
        client_email,
    } = payload;

    Salons::find_by_id(salon_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    if date < Utc::now().date_naive() {
        return Err(AppError::validation("appointments cannot be booked in the past"));
    }
    let start_time = channel.start_time(date, &slot)?;

    let client_name = client_name.trim().to_string();
    let client_phone = client_phone.trim().to_string();
    if client_name.is_empty() || client_phone.is_empty() {
        return Err(AppError::validation("client name and phone are required"));
    }
    let client_email = client_email
        .map(|email| email.trim().to_lowercase())
        .filter(|email| !email.is_empty());

    let service = Services::find()
        .filter(services::Column::Id.eq(service_id))
        .filter(services::Column::SalonId.eq(salon_id))
        .filter(services::Column::IsActive.eq(true))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::validation("service is not offered by this salon"))?;

    let staff_name = match staff_id {
        StaffRef::Any => UNASSIGNED_STAFF_NAME.to_string(),
        StaffRef::Staff(id) => staff_service::bookable_staff(state, salon_id)
            .await?
            .into_iter()
            .find(|member| member.id == id)
            .map(|member| member.name)
            .ok_or_else(|| AppError::validation("collaborator cannot be booked in this salon"))?,
    };

    let status = channel.initial_status(scope, staff_id);
    let appointment = appointments::ActiveModel {
        id: Set(Uuid::new_v4()),
        salon_id: Set(salon_id),
        staff_id: Set(staff_id.id()),
        staff_name: Set(staff_name),
        service_id: Set(service.id),
        service_name: Set(service.name),
        client_name: Set(client_name),
        client_phone: Set(client_phone),
        client_email: Set(client_email),
        start_time: Set(start_time.fixed_offset()),
        duration: Set(service.duration),
        status: Set(status),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.orm,
        scope.map(|scope| scope.principal_id),
        "appointment_create",
        "appointments",
        serde_json::json!({
            "appointment_id": appointment.id,
            "salon_id": salon_id,
            "status": booking::status_name(status),
        }),
    )
    .await;

    Ok(Appointment::from(appointment))
}

async fn has_calendar_access(
    state: &AppState,
    scope: &Scope,
    salon_id: Uuid,
    date: NaiveDate,
) -> AppResult<bool> {
    let schedules =
        schedule_service::fetch_schedules(state, scope, salon_id, &DateRange::single(date)).await?;
    let tagged = is_tagged_present(&schedules, salon_id, scope.principal_id, date);
    Ok(scope.has_access_to_date(date, Utc::now().date_naive(), tagged))
}

async fn ensure_calendar_access(
    state: &AppState,
    scope: &Scope,
    salon_id: Uuid,
    date: NaiveDate,
) -> AppResult<()> {
    if has_calendar_access(state, scope, salon_id, date).await? {
        Ok(())
    } else {
        Err(AppError::PermissionDenied)
    }
}

/// Salon name for outbound emails. Runs after the booking is stored, so a
/// failed lookup only degrades the email.
async fn salon_name(state: &AppState, salon_id: Uuid) -> String {
    match Salons::find_by_id(salon_id).one(&state.orm).await {
        Ok(salon) => salon.map(|salon| salon.name).unwrap_or_default(),
        Err(err) => {
            tracing::warn!(error = %err, %salon_id, "salon lookup for booking email failed");
            String::new()
        }
    }
}
