//! Admin Dashboard Endpoint

use axum::{extract::State, Json};
use chrono::Local;

use crate::{
    error::ApiError,
    routes::auth::AdminAccess,
    services::{DashboardView, StatisticsReporter},
    AppState,
};

/// GET /dashboard
///
/// 요약 수치, 최근 확정 기부 10건, 상위 기부자 10명,
/// 최근 6개월 추이, 회원 구분별 분포
pub async fn dashboard(
    _admin: AdminAccess,
    State(state): State<AppState>,
) -> Result<Json<DashboardView>, ApiError> {
    let today = Local::now().date_naive();
    let view = StatisticsReporter::new(state.db.as_ref())
        .dashboard(today)
        .await?;
    Ok(Json(view))
}
