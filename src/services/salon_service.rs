use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    booking::BookingChannel,
    dto::{
        Deleted,
        salons::{PublicCatalog, PublicStaff, SalonList, UpsertSalonRequest},
    },
    entity::{
        appointments, products, sale_items, salon_members, salons, sales, services,
        staff_schedules, Appointments, Products, SaleItems, SalonMembers, Salons, Sales,
        Services, StaffSchedules,
    },
    error::{AppError, AppResult},
    models::{Salon, Service},
    response::{ApiResponse, Meta},
    scope::Scope,
    services::staff_service,
    state::AppState,
};

pub async fn list_salons(state: &AppState, scope: &Scope) -> AppResult<ApiResponse<SalonList>> {
    let items = fetch_salons(state, &scope.resolve_salons(None)).await?;
    let total = items.len();
    Ok(ApiResponse::success(
        "Salons",
        SalonList { items },
        Some(Meta::listed(total)),
    ))
}

pub async fn get_salon(state: &AppState, scope: &Scope, id: Uuid) -> AppResult<ApiResponse<Salon>> {
    if !scope.can_access_salon(id) {
        return Err(AppError::NotFound);
    }
    let salon = Salons::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Salon", Salon::from(salon), None))
}

/// Creates a salon when `id` is `None`, updates it otherwise.
///
/// New salons always belong to the organization owner; a manager creating
/// one becomes a member of it.
pub async fn upsert_salon(
    state: &AppState,
    scope: &Scope,
    id: Option<Uuid>,
    payload: UpsertSalonRequest,
) -> AppResult<ApiResponse<Salon>> {
    scope.ensure_manager()?;
    let owner_id = scope.require_organization()?;
    validate_salon(&payload)?;

    let UpsertSalonRequest {
        name,
        address,
        total_workstations,
        booking_workstations,
    } = payload;

    let (salon, action) = match id {
        Some(id) => {
            scope.ensure_salon(id)?;
            let existing = Salons::find_by_id(id)
                .one(&state.orm)
                .await?
                .ok_or(AppError::NotFound)?;
            let mut active: salons::ActiveModel = existing.into();
            active.name = Set(name.trim().to_string());
            active.address = Set(address.trim().to_string());
            active.total_workstations = Set(total_workstations);
            active.booking_workstations = Set(booking_workstations);
            (active.update(&state.orm).await?, "salon_update")
        }
        None => {
            let txn = state.orm.begin().await?;
            let salon = salons::ActiveModel {
                id: Set(Uuid::new_v4()),
                owner_id: Set(owner_id),
                name: Set(name.trim().to_string()),
                address: Set(address.trim().to_string()),
                total_workstations: Set(total_workstations),
                booking_workstations: Set(booking_workstations),
                created_at: Set(Utc::now().into()),
            }
            .insert(&txn)
            .await?;
            if !scope.is_owner() {
                salon_members::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    staff_id: Set(scope.principal_id),
                    salon_id: Set(salon.id),
                }
                .insert(&txn)
                .await?;
            }
            txn.commit().await?;
            (salon, "salon_create")
        }
    };

    audit::record(
        &state.orm,
        Some(scope.principal_id),
        action,
        "salons",
        serde_json::json!({ "salon_id": salon.id }),
    )
    .await;

    Ok(ApiResponse::success("Salon saved", Salon::from(salon), None))
}

/// Removes a salon together with everything attached to it.
pub async fn delete_salon(state: &AppState, scope: &Scope, id: Uuid) -> AppResult<ApiResponse<Deleted>> {
    scope.ensure_owner()?;
    scope.ensure_salon(id)?;

    let txn = state.orm.begin().await?;
    let sale_ids: Vec<Uuid> = Sales::find()
        .select_only()
        .column(sales::Column::Id)
        .filter(sales::Column::SalonId.eq(id))
        .into_tuple()
        .all(&txn)
        .await?;
    if !sale_ids.is_empty() {
        SaleItems::delete_many()
            .filter(sale_items::Column::SaleId.is_in(sale_ids))
            .exec(&txn)
            .await?;
    }
    Sales::delete_many()
        .filter(sales::Column::SalonId.eq(id))
        .exec(&txn)
        .await?;
    Appointments::delete_many()
        .filter(appointments::Column::SalonId.eq(id))
        .exec(&txn)
        .await?;
    StaffSchedules::delete_many()
        .filter(staff_schedules::Column::SalonId.eq(id))
        .exec(&txn)
        .await?;
    Services::delete_many()
        .filter(services::Column::SalonId.eq(id))
        .exec(&txn)
        .await?;
    Products::delete_many()
        .filter(products::Column::SalonId.eq(id))
        .exec(&txn)
        .await?;
    SalonMembers::delete_many()
        .filter(salon_members::Column::SalonId.eq(id))
        .exec(&txn)
        .await?;
    let result = Salons::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    txn.commit().await?;

    audit::record(
        &state.orm,
        Some(scope.principal_id),
        "salon_delete",
        "salons",
        serde_json::json!({ "salon_id": id }),
    )
    .await;

    Ok(ApiResponse::success("Salon deleted", Deleted { id }, None))
}

/// Unauthenticated view used by the booking page.
pub async fn public_catalog(state: &AppState, salon_id: Uuid) -> AppResult<ApiResponse<PublicCatalog>> {
    let salon = Salons::find_by_id(salon_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let services = Services::find()
        .filter(services::Column::SalonId.eq(salon_id))
        .filter(services::Column::IsActive.eq(true))
        .order_by_asc(services::Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Service::from)
        .collect();

    let staff = staff_service::bookable_staff(state, salon_id)
        .await?
        .iter()
        .map(PublicStaff::from)
        .collect();

    let data = PublicCatalog {
        salon: Salon::from(salon),
        services,
        staff,
        slots: BookingChannel::Public
            .slots()
            .iter()
            .map(|slot| slot.to_string())
            .collect(),
    };
    Ok(ApiResponse::success("Catalog", data, None))
}

pub(crate) async fn fetch_salons(state: &AppState, ids: &[Uuid]) -> AppResult<Vec<Salon>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let salons = Salons::find()
        .filter(salons::Column::Id.is_in(ids.iter().copied()))
        .order_by_asc(salons::Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Salon::from)
        .collect();
    Ok(salons)
}

fn validate_salon(payload: &UpsertSalonRequest) -> AppResult<()> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("salon name is required"));
    }
    if payload.total_workstations < 0 || payload.booking_workstations < 0 {
        return Err(AppError::validation("workstation counts must not be negative"));
    }
    if payload.booking_workstations > payload.total_workstations {
        return Err(AppError::validation(
            "booking workstations cannot exceed total workstations",
        ));
    }
    Ok(())
}
