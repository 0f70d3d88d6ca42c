mod common;

use chrono::{Duration, Utc};
use common::{
    StaffSeed, insert_owner, insert_salon, insert_service, insert_staff, scope_of, test_state,
    test_state_with_events,
};
use salon_backoffice::{
    dto::{
        appointments::{BookingRequest, UpdateAppointmentStatusRequest},
        schedules::ToggleScheduleRequest,
    },
    entity::enums::{AppointmentStatus, Role},
    error::AppError,
    events::DomainEvent,
    models::{StaffRef, UNASSIGNED_STAFF_NAME},
    routes::params::AppointmentQuery,
    services::{booking_service, salon_service, schedule_service},
};
use uuid::Uuid;

fn request(salon_id: Uuid, service_id: Uuid, staff_id: StaffRef, slot: &str) -> BookingRequest {
    BookingRequest {
        salon_id,
        service_id,
        staff_id,
        date: Utc::now().date_naive() + Duration::days(1),
        slot: slot.into(),
        client_name: "Lea".into(),
        client_phone: "0600000000".into(),
        client_email: Some("Lea@Example.com".into()),
    }
}

#[tokio::test]
async fn public_booking_without_staff_is_listed_as_unassigned() -> anyhow::Result<()> {
    let state = test_state().await?;
    let owner = insert_owner(&state, "Olga").await?;
    let s1 = insert_salon(&state, owner, "S1").await?;
    let coupe = insert_service(&state, s1, "Coupe", 3000).await?;

    let booked = booking_service::create_public_booking(&state, request(s1, coupe, StaffRef::Any, "10:00"))
        .await?
        .data
        .unwrap();
    assert_eq!(booked.status, AppointmentStatus::Pending);
    assert!(booked.staff_id.is_unassigned());
    assert_eq!(booked.client_email.as_deref(), Some("lea@example.com"));

    let listed = booking_service::list_appointments(
        &state,
        &scope_of(&state, owner).await?,
        AppointmentQuery {
            salon_id: s1,
            date: booked.start_time.date_naive(),
            staff_id: None,
        },
    )
    .await?
    .data
    .unwrap()
    .items;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].staff_id, StaffRef::Any);
    assert_eq!(listed[0].staff_name, UNASSIGNED_STAFF_NAME);
    Ok(())
}

#[tokio::test]
async fn public_booking_rejects_unknown_slots_and_services() -> anyhow::Result<()> {
    let state = test_state().await?;
    let owner = insert_owner(&state, "Olga").await?;
    let s1 = insert_salon(&state, owner, "S1").await?;
    let s2 = insert_salon(&state, owner, "S2").await?;
    let coupe = insert_service(&state, s1, "Coupe", 3000).await?;

    // 09:30 is only offered to the back office.
    let err = booking_service::create_public_booking(&state, request(s1, coupe, StaffRef::Any, "09:30"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailed(_)));

    let err = booking_service::create_public_booking(&state, request(s2, coupe, StaffRef::Any, "10:00"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailed(_)));

    let catalog = salon_service::public_catalog(&state, s1).await?.data.unwrap();
    assert_eq!(catalog.services.len(), 1);
    assert_eq!(catalog.slots.len(), 8);
    Ok(())
}

#[tokio::test]
async fn manager_booking_with_staff_is_confirmed_and_follows_the_lifecycle() -> anyhow::Result<()> {
    let state = test_state().await?;
    let owner = insert_owner(&state, "Olga").await?;
    let s1 = insert_salon(&state, owner, "S1").await?;
    let alice = insert_staff(&state, owner, StaffSeed::active("Alice", Role::Staff, &[s1])).await?;
    let coupe = insert_service(&state, s1, "Coupe", 3000).await?;
    let owner_scope = scope_of(&state, owner).await?;

    let booked = booking_service::create_staff_booking(
        &state,
        &owner_scope,
        request(s1, coupe, StaffRef::Staff(alice), "09:30"),
    )
    .await?
    .data
    .unwrap();
    assert_eq!(booked.status, AppointmentStatus::Confirmed);
    assert_eq!(booked.staff_name, "Alice");

    let completed = booking_service::update_status(
        &state,
        &owner_scope,
        booked.id,
        UpdateAppointmentStatusRequest {
            status: AppointmentStatus::Completed,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(completed.status, AppointmentStatus::Completed);

    let err = booking_service::update_status(
        &state,
        &owner_scope,
        booked.id,
        UpdateAppointmentStatusRequest {
            status: AppointmentStatus::Cancelled,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailed(_)));
    Ok(())
}

#[tokio::test]
async fn staff_only_touch_their_own_appointments() -> anyhow::Result<()> {
    let state = test_state().await?;
    let owner = insert_owner(&state, "Olga").await?;
    let s1 = insert_salon(&state, owner, "S1").await?;
    let alice = insert_staff(&state, owner, StaffSeed::active("Alice", Role::Staff, &[s1])).await?;
    let bruno = insert_staff(&state, owner, StaffSeed::active("Bruno", Role::Staff, &[s1])).await?;
    let coupe = insert_service(&state, s1, "Coupe", 3000).await?;
    let alice_scope = scope_of(&state, alice).await?;

    let err = booking_service::create_staff_booking(
        &state,
        &alice_scope,
        request(s1, coupe, StaffRef::Staff(bruno), "10:00"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied));

    let own = booking_service::create_staff_booking(
        &state,
        &alice_scope,
        request(s1, coupe, StaffRef::Staff(alice), "10:00"),
    )
    .await?
    .data
    .unwrap();
    // Only owners and managers confirm on entry.
    assert_eq!(own.status, AppointmentStatus::Pending);

    let unassigned = booking_service::create_public_booking(&state, request(s1, coupe, StaffRef::Any, "11:00"))
        .await?
        .data
        .unwrap();
    let err = booking_service::update_status(
        &state,
        &alice_scope,
        unassigned.id,
        UpdateAppointmentStatusRequest {
            status: AppointmentStatus::Confirmed,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied));

    let listed = booking_service::list_appointments(
        &state,
        &alice_scope,
        AppointmentQuery {
            salon_id: s1,
            date: own.start_time.date_naive(),
            staff_id: None,
        },
    )
    .await?
    .data
    .unwrap()
    .items;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, own.id);
    Ok(())
}

#[tokio::test]
async fn hidden_calendar_opens_on_tagged_days() -> anyhow::Result<()> {
    let state = test_state().await?;
    let owner = insert_owner(&state, "Olga").await?;
    let s1 = insert_salon(&state, owner, "S1").await?;
    let alice = insert_staff(
        &state,
        owner,
        StaffSeed {
            can_view_own_schedule: false,
            ..StaffSeed::active("Alice", Role::Staff, &[s1])
        },
    )
    .await?;
    let coupe = insert_service(&state, s1, "Coupe", 3000).await?;
    let owner_scope = scope_of(&state, owner).await?;
    let alice_scope = scope_of(&state, alice).await?;

    let booked = booking_service::create_staff_booking(
        &state,
        &owner_scope,
        request(s1, coupe, StaffRef::Staff(alice), "14:00"),
    )
    .await?
    .data
    .unwrap();
    let day = booked.start_time.date_naive();
    let query = || AppointmentQuery {
        salon_id: s1,
        date: day,
        staff_id: None,
    };

    let hidden = booking_service::list_appointments(&state, &alice_scope, query()).await?;
    assert!(hidden.data.unwrap().items.is_empty());

    schedule_service::toggle_schedule(
        &state,
        &owner_scope,
        ToggleScheduleRequest {
            salon_id: s1,
            staff_id: alice,
            date: day,
        },
    )
    .await?;

    let visible = booking_service::list_appointments(&state, &alice_scope, query()).await?;
    assert_eq!(visible.data.unwrap().items.len(), 1);
    Ok(())
}

#[tokio::test]
async fn confirming_a_request_emails_the_client() -> anyhow::Result<()> {
    let (state, mut events) = test_state_with_events().await?;
    let owner = insert_owner(&state, "Olga").await?;
    let s1 = insert_salon(&state, owner, "Salon Nord").await?;
    let coupe = insert_service(&state, s1, "Coupe", 3000).await?;

    let booked = booking_service::create_public_booking(&state, request(s1, coupe, StaffRef::Any, "10:00"))
        .await?
        .data
        .unwrap();
    match events.try_recv()? {
        DomainEvent::BookingRequested {
            appointment_id,
            salon_name,
            client_email,
            ..
        } => {
            assert_eq!(appointment_id, booked.id);
            assert_eq!(salon_name, "Salon Nord");
            assert_eq!(client_email, "lea@example.com");
        }
        other => panic!("unexpected event {other:?}"),
    }

    let confirmed = booking_service::update_status(
        &state,
        &scope_of(&state, owner).await?,
        booked.id,
        UpdateAppointmentStatusRequest {
            status: AppointmentStatus::Confirmed,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(confirmed.status, AppointmentStatus::Confirmed);
    match events.try_recv()? {
        DomainEvent::BookingConfirmed {
            appointment_id,
            salon_name,
            ..
        } => {
            assert_eq!(appointment_id, booked.id);
            assert_eq!(salon_name, "Salon Nord");
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(events.try_recv().is_err());
    Ok(())
}
