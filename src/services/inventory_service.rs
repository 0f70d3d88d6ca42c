use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    analytics, audit,
    dto::{
        Deleted,
        catalog::{ProductList, StockAdjustRequest, UpsertProductRequest},
    },
    entity::{products, Products},
    error::{AppError, AppResult},
    models::{Product, is_critical_stock},
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, SalonFilter},
    scope::Scope,
    state::AppState,
};

const STOCK_CAS_ATTEMPTS: usize = 3;

pub async fn list_products(
    state: &AppState,
    scope: &Scope,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let items = fetch_products(state, &scope.resolve_salons(Some(query.salon_id))).await?;
    let total = items.len();
    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(Meta::listed(total)),
    ))
}

/// Products at or below their alert threshold.
pub async fn list_critical_stock(
    state: &AppState,
    scope: &Scope,
    filter: SalonFilter,
) -> AppResult<ApiResponse<ProductList>> {
    let items: Vec<_> = fetch_products(state, &scope.resolve_salons(filter.salon_id))
        .await?
        .into_iter()
        .filter(|product| product.is_critical)
        .collect();
    let total = items.len();
    Ok(ApiResponse::success(
        "Critical stock",
        ProductList { items },
        Some(Meta::listed(total)),
    ))
}

pub async fn upsert_product(
    state: &AppState,
    scope: &Scope,
    id: Option<Uuid>,
    payload: UpsertProductRequest,
) -> AppResult<ApiResponse<Product>> {
    scope.ensure_manager()?;
    scope.ensure_salon(payload.salon_id)?;
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation("product name is required"));
    }
    analytics::validate_amount("price", payload.price)?;
    if payload.stock_qty < 0 || payload.alert_threshold < 0 {
        return Err(AppError::validation(
            "stock and alert threshold must not be negative",
        ));
    }

    let (product, action) = match id {
        Some(id) => {
            let existing = Products::find_by_id(id)
                .one(&state.orm)
                .await?
                .ok_or(AppError::NotFound)?;
            scope.ensure_salon(existing.salon_id)?;
            let mut active: products::ActiveModel = existing.into();
            active.salon_id = Set(payload.salon_id);
            active.name = Set(name);
            active.price = Set(payload.price);
            active.stock_qty = Set(payload.stock_qty);
            active.alert_threshold = Set(payload.alert_threshold);
            (active.update(&state.orm).await?, "product_update")
        }
        None => {
            let product = products::ActiveModel {
                id: Set(Uuid::new_v4()),
                salon_id: Set(payload.salon_id),
                name: Set(name),
                price: Set(payload.price),
                stock_qty: Set(payload.stock_qty),
                alert_threshold: Set(payload.alert_threshold),
                created_at: Set(Utc::now().into()),
            }
            .insert(&state.orm)
            .await?;
            (product, "product_create")
        }
    };

    audit::record(
        &state.orm,
        Some(scope.principal_id),
        action,
        "products",
        serde_json::json!({ "product_id": product.id, "salon_id": product.salon_id }),
    )
    .await;

    Ok(ApiResponse::success("Product saved", Product::from(product), None))
}

pub async fn delete_product(state: &AppState, scope: &Scope, id: Uuid) -> AppResult<ApiResponse<Deleted>> {
    scope.ensure_manager()?;
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.ensure_salon(existing.salon_id)?;
    Products::delete_by_id(id).exec(&state.orm).await?;

    audit::record(
        &state.orm,
        Some(scope.principal_id),
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::success("Product deleted", Deleted { id }, None))
}

/// Manual restock or correction. The resulting quantity never drops below zero.
pub async fn adjust_stock(
    state: &AppState,
    scope: &Scope,
    id: Uuid,
    payload: StockAdjustRequest,
) -> AppResult<ApiResponse<Product>> {
    scope.ensure_manager()?;
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    scope.ensure_salon(existing.salon_id)?;

    let product = apply_stock_delta(&state.orm, id, payload.delta).await?;

    audit::record(
        &state.orm,
        Some(scope.principal_id),
        "stock_adjust",
        "products",
        serde_json::json!({
            "product_id": id,
            "delta": payload.delta,
            "stock_qty": product.stock_qty,
        }),
    )
    .await;

    if is_critical_stock(product.stock_qty, product.alert_threshold) {
        tracing::info!(product_id = %id, stock_qty = product.stock_qty, "product stock is critical");
    }
    Ok(ApiResponse::success("Stock adjusted", Product::from(product), None))
}

pub fn clamped_stock(current: i32, delta: i32) -> i32 {
    current.saturating_add(delta).max(0)
}

/// Compare-and-swap update of `stock_qty`: the write only lands if the
/// quantity is still the one that was read.
pub(crate) async fn apply_stock_delta<C: ConnectionTrait>(
    db: &C,
    product_id: Uuid,
    delta: i32,
) -> AppResult<products::Model> {
    for attempt in 1..=STOCK_CAS_ATTEMPTS {
        let current = Products::find_by_id(product_id)
            .one(db)
            .await?
            .ok_or(AppError::NotFound)?;
        let next = clamped_stock(current.stock_qty, delta);

        let result = Products::update_many()
            .col_expr(products::Column::StockQty, Expr::value(next))
            .filter(products::Column::Id.eq(product_id))
            .filter(products::Column::StockQty.eq(current.stock_qty))
            .exec(db)
            .await?;
        if result.rows_affected == 1 {
            return Ok(products::Model {
                stock_qty: next,
                ..current
            });
        }
        tracing::debug!(%product_id, attempt, "stock changed concurrently, retrying");
    }
    Err(AppError::Conflict(format!(
        "stock of product {product_id} kept changing, retry later"
    )))
}

async fn fetch_products(state: &AppState, salons: &[Uuid]) -> AppResult<Vec<Product>> {
    if salons.is_empty() {
        return Ok(Vec::new());
    }
    let items = Products::find()
        .filter(products::Column::SalonId.is_in(salons.iter().copied()))
        .order_by_asc(products::Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::clamped_stock;

    #[test]
    fn stock_never_goes_negative() {
        assert_eq!(clamped_stock(5, -3), 2);
        assert_eq!(clamped_stock(2, -5), 0);
        assert_eq!(clamped_stock(0, -1), 0);
        assert_eq!(clamped_stock(4, 6), 10);
        assert_eq!(clamped_stock(i32::MAX, 1), i32::MAX);
        for current in 0..20 {
            for delta in -30..30 {
                assert_eq!(clamped_stock(current, delta), (current + delta).max(0));
            }
        }
    }
}
