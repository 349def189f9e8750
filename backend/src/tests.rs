//! Tests for the application bootstrap, covering readiness signalling, route
//! wiring and metrics initialisation.

use super::server::{AdapterSettings, ServerConfig, create_server, test_app};
#[cfg(feature = "metrics")]
use super::{PrometheusMetricsBuilder, initialize_metrics};
use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;

use schemaforge::domain::ConversionService;
use schemaforge::domain::TRACE_ID_HEADER;
use schemaforge::domain::openapi::Dereferencer;
use schemaforge::domain::ports::FixtureReferenceSource;
use schemaforge::inbound::http::health::HealthState;
use schemaforge::inbound::http::state::HttpState;

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

#[fixture]
fn http_state() -> web::Data<HttpState> {
    let service = ConversionService::new(Dereferencer::new(Arc::new(FixtureReferenceSource)));
    web::Data::new(HttpState::new(Arc::new(service)))
}

#[fixture]
fn bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 0))
}

#[cfg(feature = "metrics")]
#[test]
fn initialize_metrics_returns_none_on_error() {
    let metrics = initialize_metrics(|| -> Result<_, &str> { Err("boom") });
    assert!(metrics.is_none(), "expected metrics to be absent on error");
}

#[cfg(feature = "metrics")]
#[test]
fn initialize_metrics_returns_metrics_on_success() {
    let metrics = initialize_metrics(|| {
        PrometheusMetricsBuilder::new("test")
            .endpoint("/metrics")
            .build()
    });

    assert!(
        metrics.is_some(),
        "expected metrics to be present on success"
    );
}

#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready(
    health_state: web::Data<HealthState>,
    bind_address: SocketAddr,
) {
    assert!(!health_state.is_ready(), "state should start unready");

    let config =
        ServerConfig::new(bind_address).with_adapter_settings(AdapterSettings::default());
    let _server = create_server(health_state.clone(), config).expect("server should build");

    assert!(
        health_state.is_ready(),
        "server creation should mark readiness"
    );
}

#[rstest]
#[actix_web::test]
async fn app_serves_conversion_and_persistence_routes(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) {
    let app = actix_test::init_service(test_app(health_state, http_state)).await;

    let convert = actix_test::TestRequest::post()
        .uri("/convert")
        .set_json(json!({
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1"},
            "paths": {"/ping": {"get": {"responses": {"200": {"description": "ok"}}}}}
        }))
        .to_request();
    let res = actix_test::call_service(&app, convert).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
    let body: Value = actix_test::read_body_json(res).await;
    assert!(body["ans"]["/ping"]["GET"].is_object());

    let projects = actix_test::TestRequest::get()
        .uri("/api/v1/projects")
        .to_request();
    let res = actix_test::call_service(&app, projects).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn app_answers_cors_preflight(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) {
    let app = actix_test::init_service(test_app(health_state, http_state)).await;

    let preflight = actix_test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/convert")
        .insert_header(("Origin", "https://editor.example.test"))
        .insert_header(("Access-Control-Request-Method", "POST"))
        .to_request();
    let res = actix_test::call_service(&app, preflight).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("access-control-allow-origin"));
}

#[rstest]
#[actix_web::test]
async fn readiness_reflects_state(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) {
    let app = actix_test::init_service(test_app(health_state.clone(), http_state)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/health/ready")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    health_state.mark_ready();
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/health/ready")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}
