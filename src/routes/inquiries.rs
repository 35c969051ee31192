//! Inquiry Follow-up Endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    db::DonationInquiry,
    error::ApiError,
    routes::{auth::AdminAccess, extract::AppJson},
    services::{
        validation::{validate_inquiry_update, InquiryUpdateForm},
        FieldErrors,
    },
    types::{ApiResponse, InquiryStatus, Page},
    AppState,
};

pub const INQUIRIES_PER_PAGE: u32 = 20;

#[derive(Debug, Default, Deserialize)]
pub struct InquiryQuery {
    /// new | contacted | converted | declined (`all`이면 필터 없음)
    pub status: Option<String>,
    pub page: Option<u32>,
}

/// GET /inquiries?status=&page=
///
/// 최신 접수순
pub async fn list_inquiries(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Query(query): Query<InquiryQuery>,
) -> Result<Json<Page<DonationInquiry>>, ApiError> {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(
            raw.parse::<InquiryStatus>()
                .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        ),
    };
    let page = query.page.unwrap_or(1).max(1);

    let (inquiries, total) = state.db.list_inquiries(status, page, INQUIRIES_PER_PAGE).await?;
    Ok(Json(Page::new(inquiries, page, INQUIRIES_PER_PAGE, total)))
}

/// PUT /inquiries/:id
///
/// `new` 이외의 상태로 처음 바뀔 때 `contacted_at`이 기록된다
pub async fn update_inquiry(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(form): AppJson<InquiryUpdateForm>,
) -> Result<Json<ApiResponse<DonationInquiry>>, ApiError> {
    let update = validate_inquiry_update(&form)?;

    if let Some(donor_id) = update.converted_donor_id {
        if state.db.find_donor(donor_id).await?.is_none() {
            return Err(ApiError::Validation(FieldErrors::single(
                "converted_donor_id",
                "Donatur tidak valid.",
            )));
        }
    }

    let inquiry = state
        .db
        .update_inquiry(id, &update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Inquiry".to_string()))?;

    Ok(Json(ApiResponse::success(
        "Status tindak lanjut berhasil diperbarui.",
        inquiry,
    )))
}
