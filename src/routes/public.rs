//! Public Endpoints
//!
//! 인증 없이 접근하는 통계 페이지와 기부 문의 접수.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Local;

use crate::{
    db::DonationInquiry,
    error::ApiError,
    routes::extract::AppJson,
    services::{
        validation::{validate_inquiry, InquiryForm},
        PublicView, StatisticsReporter,
    },
    types::ApiResponse,
    AppState,
};

/// GET /
///
/// 공개 통계: 누적/이번 달 수치, 평균 기부액, 최근 12개월 추이
pub async fn public_statistics(
    State(state): State<AppState>,
) -> Result<Json<PublicView>, ApiError> {
    let today = Local::now().date_naive();
    let view = StatisticsReporter::new(state.db.as_ref())
        .public_overview(today)
        .await?;
    Ok(Json(view))
}

/// POST /donation-inquiry
///
/// # Request
///
/// ```json
/// { "name": "John Doe", "whatsapp_number": "08123456789" }
/// ```
///
/// 검증 실패 시 422와 필드별 메시지, 아무것도 저장하지 않음
pub async fn submit_inquiry(
    State(state): State<AppState>,
    AppJson(form): AppJson<InquiryForm>,
) -> Result<(StatusCode, Json<ApiResponse<DonationInquiry>>), ApiError> {
    let input = validate_inquiry(&form)?;
    let inquiry = state.db.create_inquiry(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Terima kasih atas minat Anda! Tim kami akan menghubungi Anda segera.",
            inquiry,
        )),
    ))
}
