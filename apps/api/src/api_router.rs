use axum::Router;
use axum::routing::{get, post, put};
use santiye_core::AppError;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

mod cors;

#[cfg(test)]
mod tests;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    Ok(api_routes()
        .layer(cors::build_cors_layer(frontend_url)?)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/api/materials",
            post(handlers::materials::register_material_handler),
        )
        .route(
            "/api/materials/low-stock",
            get(handlers::materials::list_low_stock_materials_handler),
        )
        .route(
            "/api/materials/{material_id}",
            get(handlers::materials::get_material_handler),
        )
        .route(
            "/api/materials/{material_id}/adjustments",
            get(handlers::materials::list_adjustments_handler)
                .post(handlers::materials::apply_adjustment_handler),
        )
        .route(
            "/api/materials/{material_id}/reconciliation",
            get(handlers::materials::verify_balance_handler),
        )
        .route("/api/usages", post(handlers::usages::record_usage_handler))
        .route(
            "/api/usages/{usage_id}",
            put(handlers::usages::update_usage_handler)
                .delete(handlers::usages::delete_usage_handler),
        )
        .route(
            "/api/projects/{project_id}/usages",
            get(handlers::usages::list_project_usages_handler),
        )
        .route(
            "/api/reports/attendance",
            get(handlers::reports::attendance_report_handler),
        )
        .route(
            "/api/reports/budget-alerts",
            get(handlers::reports::budget_alert_report_handler),
        )
        .route(
            "/api/audit-log",
            get(handlers::audit_log::list_audit_log_handler),
        )
}
