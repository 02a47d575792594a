use actix_web::test;
use serde_json::Value;

use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn health_reports_counts_and_version() {
    let app = create_test_app(build_test_state()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
    assert!(resp.headers().contains_key("x-trace-id"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["app_version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["sessions"], 0);
    assert_eq!(body["connections"], 0);
    assert_eq!(body["catalog_characters"], 10);
    assert_eq!(body["catalog_bonuses"], 10);
    assert!(body["time"].as_str().is_some());
}

#[actix_web::test]
async fn root_answers_plain_text() {
    let app = create_test_app(build_test_state()).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
}
