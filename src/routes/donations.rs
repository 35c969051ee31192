//! Donation Endpoints
//!
//! 모든 쓰기는 저장소에서 기부자 합계 재계산과 한 트랜잭션으로 처리된다.
//! 존재하지 않는 기부자를 가리키면 `donor_id` 필드 에러(422)로 응답한다.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::{Donation, DonationWithDonor, DonationWrite, Donor},
    error::ApiError,
    routes::{auth::AdminAccess, extract::AppJson},
    services::{
        validation::{validate_donation, DonationForm},
        FieldErrors,
    },
    types::{ApiResponse, DonationStatus, Page},
    AppState,
};

pub const DONATIONS_PER_PAGE: u32 = 20;

#[derive(Debug, Default, Deserialize)]
pub struct DonationQuery {
    /// pending | confirmed | cancelled (`all`이면 필터 없음)
    pub status: Option<String>,
    pub page: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct DonationDetail {
    pub donation: Donation,
    pub donor: Option<Donor>,
}

/// GET /donations?status=&page=
pub async fn list_donations(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Query(query): Query<DonationQuery>,
) -> Result<Json<Page<DonationWithDonor>>, ApiError> {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(
            raw.parse::<DonationStatus>()
                .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        ),
    };
    let page = query.page.unwrap_or(1).max(1);

    let (donations, total) = state.db.list_donations(status, page, DONATIONS_PER_PAGE).await?;
    Ok(Json(Page::new(donations, page, DONATIONS_PER_PAGE, total)))
}

/// POST /donations
///
/// # Request
///
/// ```json
/// {
///   "donor_id": 1,
///   "amount": 100000,
///   "status": "confirmed",
///   "donation_date": "2024-01-15",
///   "notes": "Transfer BSI"
/// }
/// ```
pub async fn create_donation(
    _admin: AdminAccess,
    State(state): State<AppState>,
    AppJson(form): AppJson<DonationForm>,
) -> Result<(StatusCode, Json<ApiResponse<Donation>>), ApiError> {
    let input = validate_donation(&form)?;

    match state.db.create_donation(&input).await? {
        DonationWrite::Saved(donation) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success("Donasi berhasil dicatat.", donation)),
        )),
        DonationWrite::DonorMissing => Err(unknown_donor()),
        DonationWrite::DonationMissing => Err(ApiError::InternalError),
    }
}

/// GET /donations/:id
pub async fn show_donation(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DonationDetail>, ApiError> {
    let donation = state
        .db
        .find_donation(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Donation".to_string()))?;
    let donor = state.db.find_donor(donation.donor_id).await?;

    Ok(Json(DonationDetail { donation, donor }))
}

/// PUT /donations/:id
///
/// 다른 기부자로 옮기면 이전/새 기부자 모두 재계산
pub async fn update_donation(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(form): AppJson<DonationForm>,
) -> Result<Json<ApiResponse<Donation>>, ApiError> {
    let input = validate_donation(&form)?;

    match state.db.update_donation(id, &input).await? {
        DonationWrite::Saved(donation) => Ok(Json(ApiResponse::success(
            "Data donasi berhasil diperbarui.",
            donation,
        ))),
        DonationWrite::DonorMissing => Err(unknown_donor()),
        DonationWrite::DonationMissing => Err(ApiError::NotFound("Donation".to_string())),
    }
}

/// DELETE /donations/:id
pub async fn delete_donation(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.db.delete_donation(id).await? {
        return Err(ApiError::NotFound("Donation".to_string()));
    }
    Ok(Json(ApiResponse::message("Donasi berhasil dihapus.")))
}

fn unknown_donor() -> ApiError {
    ApiError::Validation(FieldErrors::single("donor_id", "Donatur tidak valid."))
}
