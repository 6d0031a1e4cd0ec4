use axum::{extract::State, response::IntoResponse};

use super::response::ok_or_internal_error;
use crate::services::DashboardService;

/// Counters shown on the admin dashboard
pub async fn dashboard_stats(State(dashboard): State<DashboardService>) -> impl IntoResponse {
    ok_or_internal_error(dashboard.stats().await, "Failed to fetch dashboard stats")
}
