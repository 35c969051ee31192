//! API Routes Module
//!
//! 모든 HTTP 엔드포인트 정의
//!
//! # Routes
//!
//! ```text
//! GET    /                    - 공개 통계
//! POST   /donation-inquiry    - 기부 문의 접수
//! GET    /health-check        - 서버 상태 확인
//!
//! (관리자, Bearer 토큰 필요)
//! GET    /dashboard           - 대시보드
//! GET    /donors              - 기부자 목록 (검색/필터/페이지)
//! POST   /donors              - 기부자 등록
//! GET    /donors/create       - 등록 폼 선택지
//! GET    /donors/:id          - 기부자 상세 + 기부 내역
//! GET    /donors/:id/edit     - 수정 폼
//! PUT    /donors/:id          - 기부자 수정
//! DELETE /donors/:id          - 기부자 삭제 (기부 내역 cascade)
//! GET    /donations           - 기부 목록
//! POST   /donations           - 기부 기록
//! GET    /donations/:id       - 기부 상세
//! PUT    /donations/:id       - 기부 수정
//! DELETE /donations/:id       - 기부 삭제
//! GET    /inquiries           - 문의 목록
//! PUT    /inquiries/:id       - 문의 처리 상태 변경
//! ```

pub mod auth;
pub mod dashboard;
pub mod donations;
pub mod donors;
pub mod extract;
pub mod health;
pub mod inquiries;
pub mod public;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// 라우터 생성
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state);

    Router::new()
        // Public
        .route("/", get(public::public_statistics))
        .route("/donation-inquiry", post(public::submit_inquiry))
        .route("/health-check", get(health::health_check))

        // Admin
        .route("/dashboard", get(dashboard::dashboard))
        .route("/donors", get(donors::list_donors).post(donors::create_donor))
        .route("/donors/create", get(donors::create_form))
        .route(
            "/donors/:id",
            get(donors::show_donor)
                .put(donors::update_donor)
                .delete(donors::delete_donor),
        )
        .route("/donors/:id/edit", get(donors::edit_donor))
        .route(
            "/donations",
            get(donations::list_donations).post(donations::create_donation),
        )
        .route(
            "/donations/:id",
            get(donations::show_donation)
                .put(donations::update_donation)
                .delete(donations::delete_donation),
        )
        .route("/inquiries", get(inquiries::list_inquiries))
        .route("/inquiries/:id", put(inquiries::update_inquiry))

        // 미들웨어
        .layer(TraceLayer::new_for_http())
        .layer(cors)

        // 상태 주입
        .with_state(state)
}

/// CORS 설정
///
/// 프로덕션: `ALLOWED_ORIGINS`에 지정된 도메인만 허용
/// 개발: 로컬 프론트엔드 개발 서버 허용
fn cors_layer(state: &AppState) -> CorsLayer {
    if state.config.is_production() {
        let origins: Vec<HeaderValue> = state
            .config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        if origins.is_empty() {
            tracing::warn!("ALLOWED_ORIGINS is empty, cross-origin requests will be rejected");
        }
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        CorsLayer::new()
            .allow_origin([
                HeaderValue::from_static("http://localhost:5173"), // Vite dev server
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://127.0.0.1:5173"),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
