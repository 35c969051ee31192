//! Donor Endpoints
//!
//! 관리자 전용 기부자 CRUD. 기부자 삭제 시 기부 내역은 함께 삭제된다.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::{Donation, Donor, DonorFilter},
    error::ApiError,
    routes::{auth::AdminAccess, extract::AppJson},
    services::validation::{validate_donor, DonorForm},
    types::{ApiResponse, MembershipCategory, Page},
    AppState,
};

/// 기부자 목록 페이지 크기
pub const DONORS_PER_PAGE: u32 = 15;

// ============ Request/Response Types ============

#[derive(Debug, Default, Deserialize)]
pub struct DonorQuery {
    /// 이름 또는 WhatsApp 번호 부분 일치
    pub search: Option<String>,
    /// 회원 구분 (`all`이면 필터 없음)
    pub category: Option<String>,
    /// 1부터 시작
    pub page: Option<u32>,
}

/// 생성/수정 폼에 필요한 선택지
#[derive(Debug, Serialize)]
pub struct DonorFormOptions {
    pub categories: [MembershipCategory; 4],
}

impl DonorFormOptions {
    fn new() -> Self {
        Self {
            categories: MembershipCategory::ALL,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DonorDetail {
    pub donor: Donor,
    /// 기부일 최신순
    pub donations: Vec<Donation>,
}

#[derive(Debug, Serialize)]
pub struct DonorEdit {
    pub donor: Donor,
    #[serde(flatten)]
    pub options: DonorFormOptions,
}

// ============ Handlers ============

/// GET /donors?search=&category=&page=
///
/// 누적 기부액 내림차순, 페이지당 15명
pub async fn list_donors(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Query(query): Query<DonorQuery>,
) -> Result<Json<Page<Donor>>, ApiError> {
    let filter = donor_filter(&query)?;
    let page = query.page.unwrap_or(1).max(1);

    let (donors, total) = state.db.list_donors(&filter, page, DONORS_PER_PAGE).await?;
    Ok(Json(Page::new(donors, page, DONORS_PER_PAGE, total)))
}

/// GET /donors/create
pub async fn create_form(_admin: AdminAccess) -> Json<DonorFormOptions> {
    Json(DonorFormOptions::new())
}

/// POST /donors
pub async fn create_donor(
    _admin: AdminAccess,
    State(state): State<AppState>,
    AppJson(form): AppJson<DonorForm>,
) -> Result<(StatusCode, Json<ApiResponse<Donor>>), ApiError> {
    let input = validate_donor(&form)?;
    let donor = state.db.create_donor(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Donor berhasil ditambahkan.", donor)),
    ))
}

/// GET /donors/:id
pub async fn show_donor(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DonorDetail>, ApiError> {
    let donor = find_or_404(&state, id).await?;
    let donations = state.db.donations_for_donor(id).await?;
    Ok(Json(DonorDetail { donor, donations }))
}

/// GET /donors/:id/edit
pub async fn edit_donor(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DonorEdit>, ApiError> {
    let donor = find_or_404(&state, id).await?;
    Ok(Json(DonorEdit {
        donor,
        options: DonorFormOptions::new(),
    }))
}

/// PUT /donors/:id
///
/// 누적 합계는 폼으로 바꿀 수 없다
pub async fn update_donor(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(form): AppJson<DonorForm>,
) -> Result<Json<ApiResponse<Donor>>, ApiError> {
    let input = validate_donor(&form)?;
    let donor = state
        .db
        .update_donor(id, &input)
        .await?
        .ok_or_else(|| ApiError::NotFound("Donor".to_string()))?;

    Ok(Json(ApiResponse::success("Data donor berhasil diperbarui.", donor)))
}

/// DELETE /donors/:id
pub async fn delete_donor(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.db.delete_donor(id).await? {
        return Err(ApiError::NotFound("Donor".to_string()));
    }
    Ok(Json(ApiResponse::message("Donor berhasil dihapus.")))
}

// ============ Helpers ============

async fn find_or_404(state: &AppState, id: i64) -> Result<Donor, ApiError> {
    state
        .db
        .find_donor(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Donor".to_string()))
}

fn donor_filter(query: &DonorQuery) -> Result<DonorFilter, ApiError> {
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let category = match query.category.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(
            raw.parse::<MembershipCategory>()
                .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        ),
    };

    Ok(DonorFilter { search, category })
}
