//! Route definitions for the profit ledger API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/ledger", ledger_routes())
        .nest("/reports", report_routes())
        .nest("/migrations", migration_routes())
}

/// Ledger entry routes
fn ledger_routes() -> Router<AppState> {
    Router::new()
        .route("/preview", post(handlers::preview_entry))
        .route(
            "/entries",
            get(handlers::list_entries).post(handlers::create_entry),
        )
        .route(
            "/entries/:entry_id",
            get(handlers::get_entry)
                .put(handlers::update_entry)
                .delete(handlers::delete_entry),
        )
}

/// Reporting routes
fn report_routes() -> Router<AppState> {
    Router::new().route("/profitability", get(handlers::get_profitability))
}

/// Backfill migration routes
fn migration_routes() -> Router<AppState> {
    Router::new().route("/:scope", post(handlers::run_migration))
}
