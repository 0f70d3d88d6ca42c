use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    analytics::{self, DateRange, SaleTotals},
    audit,
    dto::sales::{CancelSaleRequest, RecordSaleRequest, SaleList},
    entity::{
        enums::{ItemType, SaleStatus, StaffStatus},
        sale_items, sales, Products, Profiles, SaleItems, SalonMembers, Sales, Services, Staff,
        salon_members,
    },
    error::{AppError, AppResult},
    models::{Sale, SaleItem},
    response::{ApiResponse, Meta},
    routes::params::{SalesQuery, SalonFilter},
    scope::Scope,
    services::inventory_service,
    state::AppState,
};

const RECENT_SALES_LIMIT: u64 = 10;

pub async fn list_sales(
    state: &AppState,
    scope: &Scope,
    query: SalesQuery,
) -> AppResult<ApiResponse<SaleList>> {
    let range = query.range()?;
    let items = fetch_sales(state, scope, &range, query.salon_id, query.include_cancelled).await?;
    let total = items.len();
    Ok(ApiResponse::success(
        "Sales",
        SaleList { items },
        Some(Meta::listed(total)),
    ))
}

/// Sales of the resolved salons created within `range`, newest first.
/// Staff only ever get their own sales back.
pub(crate) async fn fetch_sales(
    state: &AppState,
    scope: &Scope,
    range: &DateRange,
    salon_filter: Option<Uuid>,
    include_cancelled: bool,
) -> AppResult<Vec<Sale>> {
    let salons = scope.resolve_salons(salon_filter);
    if salons.is_empty() {
        return Ok(Vec::new());
    }
    let (from, until) = range.utc_bounds();

    let mut finder = Sales::find()
        .filter(sales::Column::SalonId.is_in(salons))
        .filter(sales::Column::CreatedAt.gte(from.fixed_offset()))
        .filter(sales::Column::CreatedAt.lt(until.fixed_offset()));
    if !include_cancelled {
        finder = finder.filter(sales::Column::Status.eq(SaleStatus::Valid));
    }
    if let Some(staff_id) = scope.staff_filter() {
        finder = finder.filter(sales::Column::StaffId.eq(staff_id));
    }
    let rows = finder
        .order_by_desc(sales::Column::CreatedAt)
        .all(&state.orm)
        .await?;
    with_items(state, rows).await
}

/// Live feed: the latest sales of the resolved salons, any status.
pub async fn recent_sales(
    state: &AppState,
    scope: &Scope,
    filter: SalonFilter,
) -> AppResult<ApiResponse<SaleList>> {
    let salons = scope.resolve_salons(filter.salon_id);
    if salons.is_empty() {
        return Ok(ApiResponse::success(
            "Recent sales",
            SaleList { items: Vec::new() },
            Some(Meta::listed(0)),
        ));
    }

    let mut finder = Sales::find().filter(sales::Column::SalonId.is_in(salons));
    if let Some(staff_id) = scope.staff_filter() {
        finder = finder.filter(sales::Column::StaffId.eq(staff_id));
    }
    let rows = finder
        .order_by_desc(sales::Column::CreatedAt)
        .limit(RECENT_SALES_LIMIT)
        .all(&state.orm)
        .await?;
    let items = with_items(state, rows).await?;

    let total = items.len();
    Ok(ApiResponse::success(
        "Recent sales",
        SaleList { items },
        Some(Meta::listed(total)),
    ))
}

/// Point-of-sale checkout. Lines are priced from the salon catalog, totals
/// are derived from the lines, and sold products leave the stock in the same
/// transaction.
pub async fn record_sale(
    state: &AppState,
    scope: &Scope,
    payload: RecordSaleRequest,
) -> AppResult<ApiResponse<Sale>> {
    let salon_id = payload.salon_id;
    scope.ensure_salon(salon_id)?;
    if payload.items.is_empty() {
        return Err(AppError::validation("a sale needs at least one item"));
    }
    let tip_amount = analytics::validate_amount("tip", payload.tip_amount.max(0))?;

    let staff_id = match scope.staff_filter() {
        Some(own) => own,
        None => payload.staff_id.unwrap_or(scope.principal_id),
    };
    let staff_name = credited_staff_name(state, scope, salon_id, staff_id).await?;

    let mut lines = Vec::with_capacity(payload.items.len());
    for line in &payload.items {
        if line.qty <= 0 {
            return Err(AppError::validation("quantity must be positive"));
        }
        let (name, unit_price) = match line.item_type {
            ItemType::Service => {
                let service = Services::find_by_id(line.ref_id)
                    .one(&state.orm)
                    .await?
                    .filter(|s| s.salon_id == salon_id && s.is_active)
                    .ok_or_else(|| AppError::validation(format!("unknown service {}", line.ref_id)))?;
                (service.name, service.price)
            }
            ItemType::Product => {
                let product = Products::find_by_id(line.ref_id)
                    .one(&state.orm)
                    .await?
                    .filter(|p| p.salon_id == salon_id)
                    .ok_or_else(|| AppError::validation(format!("unknown product {}", line.ref_id)))?;
                (product.name, product.price)
            }
        };
        lines.push(SaleItem {
            item_type: line.item_type,
            ref_id: line.ref_id,
            name,
            unit_price,
            qty: line.qty,
            line_total: analytics::line_total(unit_price, line.qty).ok_or_else(amount_overflow)?,
        });
    }

    let totals = SaleTotals::from_items(&lines).ok_or_else(amount_overflow)?;
    let paid_amount = totals.paid_with_tip(tip_amount).ok_or_else(amount_overflow)?;

    let txn = state.orm.begin().await?;
    let sale = sales::ActiveModel {
        id: Set(Uuid::new_v4()),
        salon_id: Set(salon_id),
        staff_id: Set(staff_id),
        staff_name: Set(staff_name),
        total_ca: Set(totals.total_ca),
        total_products: Set(totals.total_products),
        tip_amount: Set(tip_amount),
        paid_amount: Set(paid_amount),
        payment_method: Set(payload.payment_method),
        status: Set(SaleStatus::Valid),
        cancel_reason: Set(None),
        created_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    for (position, line) in lines.iter().enumerate() {
        sale_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            sale_id: Set(sale.id),
            position: Set(position as i32),
            item_type: Set(line.item_type),
            ref_id: Set(line.ref_id),
            name: Set(line.name.clone()),
            unit_price: Set(line.unit_price),
            qty: Set(line.qty),
            line_total: Set(line.line_total),
        }
        .insert(&txn)
        .await?;
        if line.item_type == ItemType::Product {
            inventory_service::apply_stock_delta(&txn, line.ref_id, -line.qty).await?;
        }
    }
    txn.commit().await?;

    audit::record(
        &state.orm,
        Some(scope.principal_id),
        "sale_record",
        "sales",
        serde_json::json!({
            "sale_id": sale.id,
            "salon_id": salon_id,
            "paid_amount": sale.paid_amount,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Sale recorded",
        Sale::from_entity(sale, lines),
        None,
    ))
}

fn amount_overflow() -> AppError {
    AppError::validation("sale amount is too large")
}

/// Moves a valid sale to `cancelled`. The sale itself is otherwise left as recorded.
pub async fn cancel_sale(
    state: &AppState,
    scope: &Scope,
    id: Uuid,
    payload: CancelSaleRequest,
) -> AppResult<ApiResponse<Sale>> {
    scope.ensure_manager()?;
    let reason = payload.reason.trim().to_string();
    if reason.is_empty() {
        return Err(AppError::validation("a cancellation reason is required"));
    }

    let existing = Sales::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.ensure_salon(existing.salon_id)?;
    if existing.status != SaleStatus::Valid {
        return Err(AppError::Conflict("sale is already cancelled".into()));
    }

    let mut active: sales::ActiveModel = existing.into();
    active.status = Set(SaleStatus::Cancelled);
    active.cancel_reason = Set(Some(reason.clone()));
    let sale = active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        Some(scope.principal_id),
        "sale_cancel",
        "sales",
        serde_json::json!({ "sale_id": id, "reason": reason }),
    )
    .await;

    let mut sales = with_items(state, vec![sale]).await?;
    let sale = sales.pop().ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Sale cancelled", sale, None))
}

/// Name of the collaborator a sale is credited to. They must be the
/// organization owner or an active member of the salon.
async fn credited_staff_name(
    state: &AppState,
    scope: &Scope,
    salon_id: Uuid,
    staff_id: Uuid,
) -> AppResult<String> {
    let owner_id = scope.require_organization()?;
    if staff_id == owner_id {
        return Profiles::find_by_id(owner_id)
            .one(&state.orm)
            .await?
            .map(|owner| owner.name)
            .ok_or(AppError::NotFound);
    }

    let member = Staff::find_by_id(staff_id)
        .one(&state.orm)
        .await?
        .filter(|member| member.owner_id == owner_id && member.status == StaffStatus::Active)
        .ok_or_else(|| AppError::validation("unknown collaborator"))?;
    let in_salon = SalonMembers::find()
        .filter(salon_members::Column::StaffId.eq(staff_id))
        .filter(salon_members::Column::SalonId.eq(salon_id))
        .one(&state.orm)
        .await?
        .is_some();
    if !in_salon {
        return Err(AppError::validation("collaborator is not a member of this salon"));
    }
    Ok(member.name)
}

async fn with_items(state: &AppState, rows: Vec<sales::Model>) -> AppResult<Vec<Sale>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = rows.iter().map(|sale| sale.id).collect();
    let mut items: BTreeMap<Uuid, Vec<SaleItem>> = BTreeMap::new();
    for item in SaleItems::find()
        .filter(sale_items::Column::SaleId.is_in(ids))
        .order_by_asc(sale_items::Column::Position)
        .all(&state.orm)
        .await?
    {
        items.entry(item.sale_id).or_default().push(SaleItem::from(item));
    }

    Ok(rows
        .into_iter()
        .map(|sale| {
            let lines = items.remove(&sale.id).unwrap_or_default();
            Sale::from_entity(sale, lines)
        })
        .collect())
}
