mod common;

use chrono::{Days, NaiveDate, Utc};
use common::{
    StaffSeed, insert_owner, insert_product, insert_salon, insert_service, insert_staff,
    scope_of, test_state,
};
use salon_backoffice::{
    dto::{
        catalog::UpsertServiceRequest,
        sales::{CancelSaleRequest, RecordSaleRequest, SaleLineRequest},
        schedules::ToggleScheduleRequest,
    },
    entity::{
        Products, Sales,
        enums::{ItemType, PaymentMethod, Role, SaleStatus},
    },
    error::AppError,
    routes::params::{AttendanceQuery, DashboardQuery, SalesQuery},
    services::{analytics_service, catalog_service, sale_service, schedule_service},
};
use sea_orm::{EntityTrait, PaginatorTrait};

#[tokio::test]
async fn recorded_sale_feeds_the_attendance_report() -> anyhow::Result<()> {
    let state = test_state().await?;
    let owner = insert_owner(&state, "Olga").await?;
    let s1 = insert_salon(&state, owner, "S1").await?;
    let alice = insert_staff(&state, owner, StaffSeed::active("Alice", Role::Staff, &[s1])).await?;
    let brushing = insert_service(&state, s1, "Brushing", 5000).await?;
    let serum = insert_product(&state, s1, "Serum", 2000, 3, 1).await?;
    let owner_scope = scope_of(&state, owner).await?;

    let sale = sale_service::record_sale(
        &state,
        &owner_scope,
        RecordSaleRequest {
            salon_id: s1,
            staff_id: Some(alice),
            items: vec![
                SaleLineRequest {
                    item_type: ItemType::Service,
                    ref_id: brushing,
                    qty: 1,
                },
                SaleLineRequest {
                    item_type: ItemType::Product,
                    ref_id: serum,
                    qty: 1,
                },
            ],
            tip_amount: 1000,
            payment_method: PaymentMethod::Card,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(sale.staff_id, alice);
    assert_eq!(sale.total_ca, 5000);
    assert_eq!(sale.total_products, 2000);
    assert_eq!(sale.paid_amount, 8000);

    let serum_row = Products::find_by_id(serum).one(&state.orm).await?.unwrap();
    assert_eq!(serum_row.stock_qty, 2);

    let today = Utc::now().date_naive();
    let report = analytics_service::attendance(
        &state,
        &owner_scope,
        AttendanceQuery {
            start: today,
            end: today,
            salon_id: Some(s1),
            include_tips: true,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(report.day_count, 1);
    let row = report.rows.iter().find(|r| r.staff_id == alice).unwrap();
    assert_eq!(row.days_worked, 1);
    assert_eq!(row.activity_rate, 100);
    assert_eq!(row.total_ca, 5000);
    assert_eq!(row.total_products, 2000);
    assert_eq!(row.total_tips, 1000);

    let csv = analytics_service::attendance_export(
        &state,
        &owner_scope,
        AttendanceQuery {
            start: today,
            end: today,
            salon_id: Some(s1),
            include_tips: true,
        },
    )
    .await?;
    assert!(csv.starts_with('\u{feff}'));
    assert!(csv.contains("Alice"));

    let dashboard = analytics_service::dashboard(
        &state,
        &owner_scope,
        DashboardQuery {
            start: today,
            end: today,
            salon_id: None,
            top: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(dashboard.totals.total_ca, 5000);
    assert_eq!(dashboard.totals.sale_count, 1);
    Ok(())
}

#[tokio::test]
async fn cancelled_sales_leave_the_reports() -> anyhow::Result<()> {
    let state = test_state().await?;
    let owner = insert_owner(&state, "Olga").await?;
    let s1 = insert_salon(&state, owner, "S1").await?;
    let alice = insert_staff(&state, owner, StaffSeed::active("Alice", Role::Staff, &[s1])).await?;
    let coupe = insert_service(&state, s1, "Coupe", 3000).await?;
    let alice_scope = scope_of(&state, alice).await?;
    let owner_scope = scope_of(&state, owner).await?;

    // Staff are always credited themselves.
    let sale = sale_service::record_sale(
        &state,
        &alice_scope,
        RecordSaleRequest {
            salon_id: s1,
            staff_id: Some(owner),
            items: vec![SaleLineRequest {
                item_type: ItemType::Service,
                ref_id: coupe,
                qty: 1,
            }],
            tip_amount: -500,
            payment_method: PaymentMethod::Cash,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(sale.staff_id, alice);
    assert_eq!(sale.tip_amount, 0);

    let err = sale_service::cancel_sale(
        &state,
        &alice_scope,
        sale.id,
        CancelSaleRequest {
            reason: "wrong client".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied));

    let cancelled = sale_service::cancel_sale(
        &state,
        &owner_scope,
        sale.id,
        CancelSaleRequest {
            reason: "wrong client".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(cancelled.status, SaleStatus::Cancelled);

    let today = Utc::now().date_naive();
    let listed = sale_service::list_sales(
        &state,
        &owner_scope,
        SalesQuery {
            start: today,
            end: today,
            salon_id: None,
            include_cancelled: false,
        },
    )
    .await?
    .data
    .unwrap()
    .items;
    assert!(listed.is_empty());

    let again = sale_service::cancel_sale(
        &state,
        &owner_scope,
        sale.id,
        CancelSaleRequest {
            reason: "twice".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(again, AppError::Conflict(_)));
    Ok(())
}

#[tokio::test]
async fn schedule_toggle_is_an_involution() -> anyhow::Result<()> {
    let state = test_state().await?;
    let owner = insert_owner(&state, "Olga").await?;
    let s1 = insert_salon(&state, owner, "S1").await?;
    let alice = insert_staff(&state, owner, StaffSeed::active("Alice", Role::Staff, &[s1])).await?;
    let scope = scope_of(&state, owner).await?;
    let today = Utc::now().date_naive();
    let request = || ToggleScheduleRequest {
        salon_id: s1,
        staff_id: alice,
        date: today,
    };

    let first = schedule_service::toggle_schedule(&state, &scope, request()).await?;
    assert!(first.data.unwrap().present);
    let second = schedule_service::toggle_schedule(&state, &scope, request()).await?;
    assert!(!second.data.unwrap().present);
    let third = schedule_service::toggle_schedule(&state, &scope, request()).await?;
    assert!(third.data.unwrap().present);

    let alice_scope = scope_of(&state, alice).await?;
    let err = schedule_service::toggle_schedule(&state, &alice_scope, request())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied));
    Ok(())
}

#[tokio::test]
async fn oversized_amounts_are_rejected_without_storing_a_sale() -> anyhow::Result<()> {
    let state = test_state().await?;
    let owner = insert_owner(&state, "Olga").await?;
    let s1 = insert_salon(&state, owner, "S1").await?;
    let coupe = insert_service(&state, s1, "Coupe", 3000).await?;
    // written straight to the table, as an old row could be
    let gold = insert_service(&state, s1, "Gold", i64::MAX).await?;
    let owner_scope = scope_of(&state, owner).await?;

    let checkout = |ref_id, qty, tip_amount| RecordSaleRequest {
        salon_id: s1,
        staff_id: None,
        items: vec![SaleLineRequest {
            item_type: ItemType::Service,
            ref_id,
            qty,
        }],
        tip_amount,
        payment_method: PaymentMethod::Card,
    };

    let err = sale_service::record_sale(&state, &owner_scope, checkout(coupe, 1, i64::MAX))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailed(_)));

    let err = sale_service::record_sale(&state, &owner_scope, checkout(gold, 2, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailed(_)));

    let err = sale_service::record_sale(&state, &owner_scope, checkout(gold, 1, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailed(_)));
    assert_eq!(Sales::find().count(&state.orm).await?, 0);

    let err = catalog_service::upsert_service(
        &state,
        &owner_scope,
        None,
        UpsertServiceRequest {
            salon_id: s1,
            name: "Platinum".into(),
            price: i64::MAX,
            duration: 30,
            is_active: true,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailed(_)));

    let sale = sale_service::record_sale(&state, &owner_scope, checkout(coupe, 2, 500))
        .await?
        .data
        .unwrap();
    assert_eq!(sale.paid_amount, 6500);
    Ok(())
}

#[tokio::test]
async fn reports_reject_unbounded_periods() -> anyhow::Result<()> {
    let state = test_state().await?;
    let owner = insert_owner(&state, "Olga").await?;
    insert_salon(&state, owner, "S1").await?;
    let owner_scope = scope_of(&state, owner).await?;

    let err = analytics_service::dashboard(
        &state,
        &owner_scope,
        DashboardQuery {
            start: NaiveDate::MIN,
            end: NaiveDate::MAX,
            salon_id: None,
            top: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailed(_)));

    let today = Utc::now().date_naive();
    let dashboard = analytics_service::dashboard(
        &state,
        &owner_scope,
        DashboardQuery {
            start: today - Days::new(365),
            end: today,
            salon_id: None,
            top: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(dashboard.totals.sale_count, 0);
    Ok(())
}
