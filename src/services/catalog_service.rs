use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    analytics, audit,
    dto::{
        Deleted,
        catalog::{CloneCatalogRequest, CloneCatalogResult, ServiceList, UpsertServiceRequest},
    },
    entity::{services, Services},
    error::{AppError, AppResult},
    models::Service,
    response::{ApiResponse, Meta},
    routes::params::ServiceQuery,
    scope::Scope,
    state::AppState,
};

pub async fn list_services(
    state: &AppState,
    scope: &Scope,
    query: ServiceQuery,
) -> AppResult<ApiResponse<ServiceList>> {
    let salons = scope.resolve_salons(Some(query.salon_id));
    if salons.is_empty() {
        return Ok(ApiResponse::success(
            "Services",
            ServiceList { items: Vec::new() },
            Some(Meta::listed(0)),
        ));
    }

    let mut finder = Services::find().filter(services::Column::SalonId.is_in(salons));
    if query.active_only {
        finder = finder.filter(services::Column::IsActive.eq(true));
    }
    let items: Vec<_> = finder
        .order_by_asc(services::Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Service::from)
        .collect();

    let total = items.len();
    Ok(ApiResponse::success(
        "Services",
        ServiceList { items },
        Some(Meta::listed(total)),
    ))
}

pub async fn upsert_service(
    state: &AppState,
    scope: &Scope,
    id: Option<Uuid>,
    payload: UpsertServiceRequest,
) -> AppResult<ApiResponse<Service>> {
    scope.ensure_manager()?;
    scope.ensure_salon(payload.salon_id)?;
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation("service name is required"));
    }
    analytics::validate_amount("price", payload.price)?;
    if payload.duration <= 0 {
        return Err(AppError::validation("duration must be positive"));
    }

    let (service, action) = match id {
        Some(id) => {
            let existing = Services::find_by_id(id)
                .one(&state.orm)
                .await?
                .ok_or(AppError::NotFound)?;
            scope.ensure_salon(existing.salon_id)?;
            let mut active: services::ActiveModel = existing.into();
            active.salon_id = Set(payload.salon_id);
            active.name = Set(name);
            active.price = Set(payload.price);
            active.duration = Set(payload.duration);
            active.is_active = Set(payload.is_active);
            (active.update(&state.orm).await?, "service_update")
        }
        None => {
            let service = services::ActiveModel {
                id: Set(Uuid::new_v4()),
                salon_id: Set(payload.salon_id),
                name: Set(name),
                price: Set(payload.price),
                duration: Set(payload.duration),
                is_active: Set(payload.is_active),
                created_at: Set(Utc::now().into()),
            }
            .insert(&state.orm)
            .await?;
            (service, "service_create")
        }
    };

    audit::record(
        &state.orm,
        Some(scope.principal_id),
        action,
        "services",
        serde_json::json!({ "service_id": service.id, "salon_id": service.salon_id }),
    )
    .await;

    Ok(ApiResponse::success("Service saved", Service::from(service), None))
}

pub async fn delete_service(state: &AppState, scope: &Scope, id: Uuid) -> AppResult<ApiResponse<Deleted>> {
    scope.ensure_manager()?;
    let existing = Services::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.ensure_salon(existing.salon_id)?;
    Services::delete_by_id(id).exec(&state.orm).await?;

    audit::record(
        &state.orm,
        Some(scope.principal_id),
        "service_delete",
        "services",
        serde_json::json!({ "service_id": id }),
    )
    .await;

    Ok(ApiResponse::success("Service deleted", Deleted { id }, None))
}

/// Copies every service of the source salon, active or not, into each
/// target with fresh ids. Existing services of the targets are not compared,
/// so cloning twice yields two copies.
pub async fn clone_catalog(
    state: &AppState,
    scope: &Scope,
    payload: CloneCatalogRequest,
) -> AppResult<ApiResponse<CloneCatalogResult>> {
    scope.ensure_manager()?;
    let CloneCatalogRequest {
        source_salon_id,
        target_salon_ids,
    } = payload;
    scope.ensure_salon(source_salon_id)?;
    if target_salon_ids.is_empty() {
        return Err(AppError::validation("at least one target salon is required"));
    }
    if target_salon_ids.contains(&source_salon_id) {
        return Err(AppError::validation("a salon cannot be cloned into itself"));
    }
    for target in &target_salon_ids {
        scope.ensure_salon(*target)?;
    }

    let source = Services::find()
        .filter(services::Column::SalonId.eq(source_salon_id))
        .order_by_asc(services::Column::CreatedAt)
        .all(&state.orm)
        .await?;

    let txn = state.orm.begin().await?;
    for target in &target_salon_ids {
        for service in &source {
            services::ActiveModel {
                id: Set(Uuid::new_v4()),
                salon_id: Set(*target),
                name: Set(service.name.clone()),
                price: Set(service.price),
                duration: Set(service.duration),
                is_active: Set(service.is_active),
                created_at: Set(Utc::now().into()),
            }
            .insert(&txn)
            .await?;
        }
    }
    txn.commit().await?;

    audit::record(
        &state.orm,
        Some(scope.principal_id),
        "catalog_clone",
        "services",
        serde_json::json!({
            "source_salon_id": source_salon_id,
            "target_salon_ids": target_salon_ids,
            "services": source.len(),
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Catalog cloned",
        CloneCatalogResult {
            source_salon_id,
            target_salon_ids,
            services_per_target: source.len(),
        },
        None,
    ))
}
