use salon_backoffice::routes::health::health_check;

#[tokio::test]
async fn health_check_reports_service_identity() {
    let response = health_check().await;
    assert_eq!(response.0.message, "Health check");
    assert!(response.0.meta.is_some());

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert_eq!(data.service, "salon-backoffice");
}
