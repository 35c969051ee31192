//! Common Types Module
//!
//! 애플리케이션 전반에서 사용되는 공통 타입 정의.
//! 고정된 열거형(회원 구분, 기부 상태, 문의 상태)은 PostgreSQL enum 타입과 1:1 대응한다.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 알 수 없는 열거형 값
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// 기부자 회원 구분
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "membership_category")]
pub enum MembershipCategory {
    Yayasan,
    #[serde(rename = "PCNU")]
    #[sqlx(rename = "PCNU")]
    Pcnu,
    #[serde(rename = "MWCNU")]
    #[sqlx(rename = "MWCNU")]
    Mwcnu,
    Umum,
}

impl MembershipCategory {
    /// 선언 순서 = DB enum 정렬 순서
    pub const ALL: [MembershipCategory; 4] = [
        MembershipCategory::Yayasan,
        MembershipCategory::Pcnu,
        MembershipCategory::Mwcnu,
        MembershipCategory::Umum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipCategory::Yayasan => "Yayasan",
            MembershipCategory::Pcnu => "PCNU",
            MembershipCategory::Mwcnu => "MWCNU",
            MembershipCategory::Umum => "Umum",
        }
    }
}

impl Default for MembershipCategory {
    fn default() -> Self {
        MembershipCategory::Umum
    }
}

impl fmt::Display for MembershipCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembershipCategory {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MembershipCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "membership category",
                value: s.to_string(),
            })
    }
}

/// 기부 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "donation_status", rename_all = "lowercase")]
pub enum DonationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl DonationStatus {
    pub const ALL: [DonationStatus; 3] = [
        DonationStatus::Pending,
        DonationStatus::Confirmed,
        DonationStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Pending => "pending",
            DonationStatus::Confirmed => "confirmed",
            DonationStatus::Cancelled => "cancelled",
        }
    }

    /// 기부자 누적 합계 및 통계에 포함되는 상태인지
    pub fn counts_toward_totals(&self) -> bool {
        match self {
            DonationStatus::Confirmed => true,
            DonationStatus::Pending | DonationStatus::Cancelled => false,
        }
    }
}

impl Default for DonationStatus {
    fn default() -> Self {
        DonationStatus::Confirmed
    }
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DonationStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DonationStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "donation status",
                value: s.to_string(),
            })
    }
}

/// 기부 문의 처리 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "inquiry_status", rename_all = "lowercase")]
pub enum InquiryStatus {
    New,
    Contacted,
    Converted,
    Declined,
}

impl InquiryStatus {
    pub const ALL: [InquiryStatus; 4] = [
        InquiryStatus::New,
        InquiryStatus::Contacted,
        InquiryStatus::Converted,
        InquiryStatus::Declined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryStatus::New => "new",
            InquiryStatus::Contacted => "contacted",
            InquiryStatus::Converted => "converted",
            InquiryStatus::Declined => "declined",
        }
    }

    /// `new` 이외의 상태는 이미 연락이 이루어졌음을 의미
    pub fn implies_contact(&self) -> bool {
        !matches!(self, InquiryStatus::New)
    }
}

impl Default for InquiryStatus {
    fn default() -> Self {
        InquiryStatus::New
    }
}

impl FromStr for InquiryStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InquiryStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "inquiry status",
                value: s.to_string(),
            })
    }
}

/// 쓰기 요청 응답 래퍼
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

/// 페이지네이션 정보 (page는 1부터 시작)
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub has_next: bool,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32, total: i64) -> Self {
        let total = total.max(0) as u64;
        Self {
            page,
            per_page,
            total,
            has_next: (page as u64) * (per_page as u64) < total,
        }
    }

    /// SQL OFFSET
    pub fn offset(page: u32, per_page: u32) -> i64 {
        (page.max(1) as i64 - 1) * per_page as i64
    }
}

/// 페이지 단위 목록 응답
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: i64) -> Self {
        Self {
            data,
            pagination: Pagination::new(page, per_page, total),
        }
    }
}
