use autoservice_api::routes::health::health_check;

#[tokio::test]
async fn health_check_returns_ok() {
    let response = health_check().await;
    assert_eq!(response.0.message, "Health check");
    assert_eq!(response.0.data.status, "ok");
    assert_eq!(response.0.data.version, env!("CARGO_PKG_VERSION"));
}
