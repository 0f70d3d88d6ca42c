mod common;

use common::{
    StaffSeed, insert_owner, insert_product, insert_salon, insert_service, insert_staff,
    scope_of, test_state,
};
use salon_backoffice::{
    dto::catalog::{CloneCatalogRequest, StockAdjustRequest, UpsertServiceRequest},
    entity::enums::Role,
    error::AppError,
    routes::params::{SalonFilter, ServiceQuery},
    services::{catalog_service, inventory_service},
};

#[tokio::test]
async fn cloning_twice_duplicates_services_in_each_target() -> anyhow::Result<()> {
    let state = test_state().await?;
    let owner = insert_owner(&state, "Olga").await?;
    let s1 = insert_salon(&state, owner, "S1").await?;
    let s2 = insert_salon(&state, owner, "S2").await?;
    let s3 = insert_salon(&state, owner, "S3").await?;
    insert_service(&state, s1, "Coupe", 3000).await?;
    insert_service(&state, s1, "Brushing", 2500).await?;
    insert_service(&state, s1, "Couleur", 6000).await?;
    let scope = scope_of(&state, owner).await?;

    for _ in 0..2 {
        let result = catalog_service::clone_catalog(
            &state,
            &scope,
            CloneCatalogRequest {
                source_salon_id: s1,
                target_salon_ids: vec![s2, s3],
            },
        )
        .await?;
        assert_eq!(result.data.unwrap().services_per_target, 3);
    }

    for target in [s2, s3] {
        let services = catalog_service::list_services(
            &state,
            &scope,
            ServiceQuery {
                salon_id: target,
                active_only: false,
            },
        )
        .await?
        .data
        .unwrap()
        .items;
        assert_eq!(services.len(), 6);
        assert_eq!(services.iter().filter(|s| s.name == "Coupe").count(), 2);
    }

    let source = catalog_service::list_services(
        &state,
        &scope,
        ServiceQuery {
            salon_id: s1,
            active_only: false,
        },
    )
    .await?;
    assert_eq!(source.data.unwrap().items.len(), 3);
    Ok(())
}

#[tokio::test]
async fn clone_into_itself_is_rejected() -> anyhow::Result<()> {
    let state = test_state().await?;
    let owner = insert_owner(&state, "Olga").await?;
    let s1 = insert_salon(&state, owner, "S1").await?;
    let scope = scope_of(&state, owner).await?;

    let err = catalog_service::clone_catalog(
        &state,
        &scope,
        CloneCatalogRequest {
            source_salon_id: s1,
            target_salon_ids: vec![s1],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailed(_)));
    Ok(())
}

#[tokio::test]
async fn staff_cannot_edit_the_catalog() -> anyhow::Result<()> {
    let state = test_state().await?;
    let owner = insert_owner(&state, "Olga").await?;
    let s1 = insert_salon(&state, owner, "S1").await?;
    let staff = insert_staff(&state, owner, StaffSeed::active("Alice", Role::Staff, &[s1])).await?;
    let scope = scope_of(&state, staff).await?;

    let err = catalog_service::upsert_service(
        &state,
        &scope,
        None,
        UpsertServiceRequest {
            salon_id: s1,
            name: "Coupe".into(),
            price: 3000,
            duration: 30,
            is_active: true,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied));
    Ok(())
}

#[tokio::test]
async fn stock_adjustment_never_goes_negative() -> anyhow::Result<()> {
    let state = test_state().await?;
    let owner = insert_owner(&state, "Olga").await?;
    let s1 = insert_salon(&state, owner, "S1").await?;
    let serum = insert_product(&state, s1, "Serum", 2000, 4, 2).await?;
    let scope = scope_of(&state, owner).await?;

    let product = inventory_service::adjust_stock(&state, &scope, serum, StockAdjustRequest { delta: -10 })
        .await?
        .data
        .unwrap();
    assert_eq!(product.stock_qty, 0);
    assert!(product.is_critical);

    let critical = inventory_service::list_critical_stock(&state, &scope, SalonFilter { salon_id: None })
        .await?
        .data
        .unwrap()
        .items;
    assert_eq!(critical.len(), 1);

    let product = inventory_service::adjust_stock(&state, &scope, serum, StockAdjustRequest { delta: 5 })
        .await?
        .data
        .unwrap();
    assert_eq!(product.stock_qty, 5);
    assert!(!product.is_critical);
    Ok(())
}
