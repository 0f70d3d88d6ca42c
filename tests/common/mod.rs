#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use salon_backoffice::{
    db::create_tables,
    entity::{
        enums::{Role, StaffStatus},
        products, profiles, salon_members, salons, services, staff,
    },
    events::{DomainEvent, EventPublisher, LogMailer, spawn_mail_dispatcher},
    scope::Scope,
    services::scope_service,
    state::{AppState, AuthSettings},
};
use sea_orm::{ActiveModelTrait, Database, Set};
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

/// Fresh in-memory database with every table created.
pub async fn test_state() -> anyhow::Result<AppState> {
    let (state, rx) = test_state_with_events().await?;
    spawn_mail_dispatcher(rx, Arc::new(LogMailer));
    Ok(state)
}

/// Same as [`test_state`] but hands the published events to the test.
pub async fn test_state_with_events() -> anyhow::Result<(AppState, UnboundedReceiver<DomainEvent>)> {
    let orm = Database::connect("sqlite::memory:").await?;
    create_tables(&orm).await?;

    let (events, rx) = EventPublisher::channel();
    let state = AppState {
        orm,
        events,
        auth: AuthSettings {
            jwt_secret: "test-secret".into(),
            token_ttl_hours: 1,
        },
    };
    Ok((state, rx))
}

/// Pulls the invitation code sent to `email` out of the published events.
pub fn invitation_token_for(rx: &mut UnboundedReceiver<DomainEvent>, email: &str) -> Option<String> {
    while let Ok(event) = rx.try_recv() {
        if let DomainEvent::StaffInvited {
            email: to,
            invitation_token,
            ..
        } = event
        {
            if to == email {
                return Some(invitation_token);
            }
        }
    }
    None
}

pub async fn insert_owner(state: &AppState, name: &str) -> anyhow::Result<Uuid> {
    let profile = profiles::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(format!("{}@example.com", name.to_lowercase())),
        name: Set(name.into()),
        password_hash: Set("unused".into()),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(profile.id)
}

pub async fn insert_salon(state: &AppState, owner_id: Uuid, name: &str) -> anyhow::Result<Uuid> {
    let salon = salons::ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(owner_id),
        name: Set(name.into()),
        address: Set(String::new()),
        total_workstations: Set(4),
        booking_workstations: Set(2),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(salon.id)
}

pub struct StaffSeed<'a> {
    pub name: &'a str,
    pub role: Role,
    pub status: StaffStatus,
    pub salon_ids: &'a [Uuid],
    pub can_view_own_schedule: bool,
    pub restrict_to_current_day: bool,
}

impl<'a> StaffSeed<'a> {
    pub fn active(name: &'a str, role: Role, salon_ids: &'a [Uuid]) -> Self {
        Self {
            name,
            role,
            status: StaffStatus::Active,
            salon_ids,
            can_view_own_schedule: true,
            restrict_to_current_day: false,
        }
    }
}

pub async fn insert_staff(state: &AppState, owner_id: Uuid, seed: StaffSeed<'_>) -> anyhow::Result<Uuid> {
    let member = staff::ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(owner_id),
        email: Set(format!("{}@example.com", seed.name.to_lowercase())),
        name: Set(seed.name.into()),
        role: Set(seed.role),
        status: Set(seed.status),
        is_bookable: Set(true),
        can_view_own_schedule: Set(seed.can_view_own_schedule),
        restrict_to_current_day: Set(seed.restrict_to_current_day),
        password_hash: Set(None),
        invitation_token_hash: Set(None),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    for salon_id in seed.salon_ids {
        salon_members::ActiveModel {
            id: Set(Uuid::new_v4()),
            staff_id: Set(member.id),
            salon_id: Set(*salon_id),
        }
        .insert(&state.orm)
        .await?;
    }
    Ok(member.id)
}

pub async fn insert_service(
    state: &AppState,
    salon_id: Uuid,
    name: &str,
    price: i64,
) -> anyhow::Result<Uuid> {
    let service = services::ActiveModel {
        id: Set(Uuid::new_v4()),
        salon_id: Set(salon_id),
        name: Set(name.into()),
        price: Set(price),
        duration: Set(30),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(service.id)
}

pub async fn insert_product(
    state: &AppState,
    salon_id: Uuid,
    name: &str,
    price: i64,
    stock_qty: i32,
    alert_threshold: i32,
) -> anyhow::Result<Uuid> {
    let product = products::ActiveModel {
        id: Set(Uuid::new_v4()),
        salon_id: Set(salon_id),
        name: Set(name.into()),
        price: Set(price),
        stock_qty: Set(stock_qty),
        alert_threshold: Set(alert_threshold),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(product.id)
}

pub async fn scope_of(state: &AppState, principal_id: Uuid) -> anyhow::Result<Scope> {
    Ok(scope_service::resolve_scope(state, principal_id).await?)
}
