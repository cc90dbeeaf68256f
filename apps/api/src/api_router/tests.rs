use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use santiye_application::{
    AuditLogService, AuditRecorder, LedgerPolicy, ReportingService, StockLedgerService,
};
use santiye_domain::{AlertTierPolicy, ExpenseRecord, ExpenseStatus};
use santiye_infrastructure::InMemoryLedgerStore;
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use crate::actor::{ACTOR_ID_HEADER, ACTOR_NAME_HEADER};
use crate::state::AppState;

const ACTOR_ID: &str = "0b6f5f9e-3f38-4d52-9a43-6f2f1d9c7e21";

fn test_app(store: &Arc<InMemoryLedgerStore>) -> Router {
    let Ok(pool) = PgPoolOptions::new().connect_lazy("postgres://santiye@localhost/santiye") else {
        panic!("lazy pool should build without connecting");
    };

    let app_state = AppState {
        stock_ledger_service: StockLedgerService::new(
            store.clone(),
            AuditRecorder::new(store.clone()),
            LedgerPolicy::default(),
        ),
        reporting_service: ReportingService::new(store.clone(), AlertTierPolicy::default()),
        audit_log_service: AuditLogService::new(store.clone()),
        postgres_pool: pool,
    };

    let Ok(router) = super::build_router(app_state, "http://localhost:3000") else {
        panic!("router should build");
    };
    router
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(ACTOR_ID_HEADER, ACTOR_ID)
        .header(ACTOR_NAME_HEADER, "Depo Sorumlusu")
        .header("content-type", "application/json");
    let body = body.map_or_else(Body::empty, |value| Body::from(value.to_string()));
    let Ok(request) = builder.body(body) else {
        panic!("request should build");
    };

    let Ok(response) = app.clone().oneshot(request).await else {
        panic!("router is infallible");
    };
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, value)
}

async fn register_material(app: &Router, opening_stock: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/materials",
        Some(json!({
            "name": "Nervürlü Demir Ø12",
            "unit": "ton",
            "unit_price": "24500.00",
            "minimum_stock": "5",
            "opening_stock": opening_stock,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["material_id"].as_str().unwrap_or_default().to_owned()
}

#[tokio::test]
async fn overdrawing_outbound_is_unprocessable_and_leaves_balance() {
    let store = Arc::new(InMemoryLedgerStore::new());
    let app = test_app(&store);
    let material_id = register_material(&app, "12").await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/materials/{material_id}/adjustments"),
        Some(json!({ "kind": "OUT", "quantity": "13" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|message| message.contains("insufficient stock"))
    );

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/materials/{material_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stock_quantity"], "12");
}

#[tokio::test]
async fn quantities_the_ledger_cannot_store_are_bad_requests() {
    let store = Arc::new(InMemoryLedgerStore::new());
    let app = test_app(&store);
    let material_id = register_material(&app, "12").await;

    for (kind, quantity) in [("OUT", "0.00001"), ("IN", "0.00006"), ("IN", "100000000000000")] {
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/materials/{material_id}/adjustments"),
            Some(json!({ "kind": kind, "quantity": quantity })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (_, body) = send(
        &app,
        Method::GET,
        &format!("/api/materials/{material_id}"),
        None,
    )
    .await;
    assert_eq!(body["stock_quantity"], "12");
}

#[tokio::test]
async fn committed_adjustment_is_listed_and_audited() {
    let store = Arc::new(InMemoryLedgerStore::new());
    let app = test_app(&store);
    let material_id = register_material(&app, "4").await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/materials/{material_id}/adjustments"),
        Some(json!({ "kind": "in", "quantity": "2.5", "description": "İrsaliye 1042" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["kind"], "IN");
    assert_eq!(body["actor_id"], ACTOR_ID);

    let (_, adjustments) = send(
        &app,
        Method::GET,
        &format!("/api/materials/{material_id}/adjustments"),
        None,
    )
    .await;
    assert_eq!(adjustments.as_array().map(Vec::len), Some(2));

    let (_, reconciliation) = send(
        &app,
        Method::GET,
        &format!("/api/materials/{material_id}/reconciliation"),
        None,
    )
    .await;
    assert_eq!(reconciliation["consistent"], true);
    assert_eq!(reconciliation["cached_balance"], "6.5");

    let (status, entries) = send(
        &app,
        Method::GET,
        "/api/audit-log?entity_name=stock_adjustments&action=TRANSACTION",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let Some(entries) = entries.as_array() else {
        panic!("audit log should be a list");
    };
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|entry| entry["actor_name"] == "Depo Sorumlusu"));
}

#[tokio::test]
async fn mutations_require_an_actor() {
    let store = Arc::new(InMemoryLedgerStore::new());
    let app = test_app(&store);

    let Ok(request) = Request::builder()
        .method(Method::POST)
        .uri("/api/materials")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "name": "Kum", "unit": "m3", "unit_price": "350" }).to_string(),
        ))
    else {
        panic!("request should build");
    };
    let Ok(response) = app.oneshot(request).await else {
        panic!("router is infallible");
    };

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn usage_lifecycle_moves_the_balance() {
    let store = Arc::new(InMemoryLedgerStore::new());
    let app = test_app(&store);
    let material_id = register_material(&app, "10").await;
    let project_id = store
        .add_project("Kadıköy Konut Projesi", Decimal::from(1_000_000))
        .await
        .map(|project_id| project_id.to_string())
        .unwrap_or_default();

    let (status, usage) = send(
        &app,
        Method::POST,
        "/api/usages",
        Some(json!({
            "project_id": project_id,
            "material_id": material_id,
            "quantity_used": "3",
            "date_used": "2025-03-14",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(usage["unit_price_at_time"], "24500.00");
    let usage_id = usage["usage_id"].as_str().unwrap_or_default().to_owned();

    let (status, usage) = send(
        &app,
        Method::PUT,
        &format!("/api/usages/{usage_id}"),
        Some(json!({ "quantity_used": "1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(usage["date_used"], "2025-03-14");

    let (_, material) = send(
        &app,
        Method::GET,
        &format!("/api/materials/{material_id}"),
        None,
    )
    .await;
    assert_eq!(material["stock_quantity"], "9");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/usages/{usage_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, usages) = send(
        &app,
        Method::GET,
        &format!("/api/projects/{project_id}/usages"),
        None,
    )
    .await;
    assert_eq!(usages.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn malformed_identifiers_and_unknown_rows_are_distinguished() {
    let store = Arc::new(InMemoryLedgerStore::new());
    let app = test_app(&store);

    let (status, _) = send(&app, Method::GET, "/api/materials/cement", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/materials/5d7c0c1e-2a8b-4c0e-9a55-6e1b1c2d3e4f",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reports_validate_their_parameters() {
    let store = Arc::new(InMemoryLedgerStore::new());
    let app = test_app(&store);

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/reports/attendance?year=2025&month=13",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/reports/budget-alerts?threshold=-1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn budget_alerts_default_to_eighty_percent() {
    let store = Arc::new(InMemoryLedgerStore::new());
    let app = test_app(&store);
    let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap_or_default();

    for (name, spent) in [("Ataşehir Ofis", 85), ("Bostancı Okul", 40)] {
        let Ok(project_id) = store.add_project(name, Decimal::from(100)).await else {
            panic!("project should be added");
        };
        let added = store
            .add_expense(ExpenseRecord {
                project_id: Some(project_id),
                category: "Malzeme".to_owned(),
                amount: Decimal::from(spent),
                date,
                status: ExpenseStatus::Approved,
            })
            .await;
        assert!(added.is_ok());
    }

    let (status, rows) = send(&app, Method::GET, "/api/reports/budget-alerts", None).await;
    assert_eq!(status, StatusCode::OK);
    let Some(rows) = rows.as_array() else {
        panic!("report should be a list");
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["project_name"], "Ataşehir Ofis");
    assert_eq!(rows[0]["usage_percentage"], "85.00");
    assert_eq!(rows[0]["alert_level"], "YÜKSEK");
}
