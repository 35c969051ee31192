//! Database Models
//!
//! Row types for the donor, donation and inquiry ledgers, plus the write inputs
//! and query bounds the repository accepts. Money columns are `NUMERIC(15,2)`
//! and map to `rust_decimal::Decimal`; they are serialized as JSON numbers for
//! presentation only.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use crate::types::{DonationStatus, InquiryStatus, MembershipCategory};

/// 기부자
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct Donor {
    pub id: i64,
    pub full_name: String,
    pub whatsapp_number: String,
    pub membership_category: MembershipCategory,

    /// 확정 기부 합계 (캐시)
    #[serde(with = "rust_decimal::serde::float")]
    pub total_donations: Decimal,

    /// 확정 기부 건수 (캐시)
    pub donation_count: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 기부 거래
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct Donation {
    pub id: i64,
    pub donor_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub notes: Option<String>,
    /// 업로드된 입금 증빙의 저장 경로
    pub proof_of_payment_path: Option<String>,
    pub status: DonationStatus,
    /// 실제 기부일 (생성 시각과 별개)
    pub donation_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 기부자 이름/구분이 함께 조회된 기부 (목록, 최근 기부)
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct DonationWithDonor {
    pub id: i64,
    pub donor_id: i64,
    pub donor_name: String,
    pub membership_category: MembershipCategory,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub notes: Option<String>,
    pub status: DonationStatus,
    pub donation_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// 기부 문의
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct DonationInquiry {
    pub id: i64,
    pub name: String,
    pub whatsapp_number: String,
    pub status: InquiryStatus,
    pub notes: Option<String>,
    pub contacted_at: Option<DateTime<Utc>>,
    pub converted_donor_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 회원 구분별 집계
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct CategoryBreakdown {
    pub membership_category: MembershipCategory,
    pub count: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

/// 확정 기부 합계/건수
#[derive(Debug, Clone, Copy, Default, FromRow, PartialEq)]
pub struct ConfirmedSummary {
    pub amount: Decimal,
    pub count: i64,
}

/// 문의 건수
#[derive(Debug, Clone, Copy, Default, FromRow, PartialEq)]
pub struct InquiryCounts {
    pub new_count: i64,
    pub total: i64,
}

// ============ Write Inputs ============

/// 기부자 생성/수정 입력 (검증 완료 상태)
#[derive(Debug, Clone, PartialEq)]
pub struct DonorInput {
    pub full_name: String,
    pub whatsapp_number: String,
    pub membership_category: MembershipCategory,
}

/// 기부 생성/수정 입력 (검증 완료 상태)
#[derive(Debug, Clone, PartialEq)]
pub struct DonationInput {
    pub donor_id: i64,
    pub amount: Decimal,
    pub notes: Option<String>,
    pub proof_of_payment_path: Option<String>,
    pub status: DonationStatus,
    pub donation_date: NaiveDate,
}

/// 공개 문의 입력
#[derive(Debug, Clone, PartialEq)]
pub struct InquiryInput {
    pub name: String,
    pub whatsapp_number: String,
}

/// 관리자 문의 처리 입력
#[derive(Debug, Clone, PartialEq)]
pub struct InquiryUpdate {
    pub status: InquiryStatus,
    pub notes: Option<String>,
    pub converted_donor_id: Option<i64>,
}

/// 기부 쓰기 결과
///
/// 기부자 행을 잠근 뒤 존재 여부를 확인하므로
/// "기부자 없음"은 검증 에러로 처리할 수 있다.
#[derive(Debug, Clone, PartialEq)]
pub enum DonationWrite {
    Saved(Donation),
    DonationMissing,
    DonorMissing,
}

// ============ Query Bounds ============

/// 기부자 목록 필터
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DonorFilter {
    /// 이름 또는 WhatsApp 번호 부분 일치
    pub search: Option<String>,
    pub category: Option<MembershipCategory>,
}

/// 기부일 범위 (양끝 포함)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateBounds {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateBounds {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn since(from: NaiveDate) -> Self {
        Self { from: Some(from), to: None }
    }

    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from: Some(from), to: Some(to) }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |f| date >= f) && self.to.map_or(true, |t| date <= t)
    }
}

/// 생성 시각 범위 `[from, until)`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CreatedWindow {
    pub from: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl CreatedWindow {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn since(from: DateTime<Utc>) -> Self {
        Self { from: Some(from), until: None }
    }

    pub fn between(from: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        Self { from: Some(from), until: Some(until) }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.map_or(true, |f| at >= f) && self.until.map_or(true, |u| at < u)
    }
}
