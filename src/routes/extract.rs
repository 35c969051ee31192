//! Request Extractors

use axum::extract::FromRequest;

use crate::error::ApiError;

/// `axum::Json`과 같지만 거부 응답이 `ApiError` (JSON 본문)
///
/// 필드 타입 오류는 폼 검증에서 필드 에러로 처리되므로,
/// 여기서 거부되는 것은 JSON 자체가 잘못된 요청뿐이다.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);
