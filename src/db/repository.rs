//! Repository Pattern Implementation
//!
//! 핸들러와 통계 서비스는 `DonationRepository` trait만 의존한다.
//! - PostgreSQL 구현: `db/mod.rs`의 `Database`
//! - 테스트용 메모리 구현: 아래 `mock` 모듈
//!
//! 기부 쓰기(create/update/delete)는 같은 트랜잭션 안에서
//! 해당 기부자의 합계를 다시 계산해야 한다.

use anyhow::Result;
use async_trait::async_trait;

use super::models::*;
use crate::services::DonorTotals;
use crate::types::{DonationStatus, InquiryStatus};

/// 기부자/기부/문의 원장 인터페이스
#[async_trait]
pub trait DonationRepository: Send + Sync {
    async fn health_check(&self) -> Result<()>;

    // ============ Donors ============

    async fn create_donor(&self, input: &DonorInput) -> Result<Donor>;
    async fn update_donor(&self, id: i64, input: &DonorInput) -> Result<Option<Donor>>;
    async fn find_donor(&self, id: i64) -> Result<Option<Donor>>;
    /// 기부자 삭제 (기부 내역은 cascade 삭제)
    async fn delete_donor(&self, id: i64) -> Result<bool>;
    async fn list_donors(
        &self,
        filter: &DonorFilter,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<Donor>, i64)>;

    // ============ Donations ============

    async fn create_donation(&self, input: &DonationInput) -> Result<DonationWrite>;
    async fn update_donation(&self, id: i64, input: &DonationInput) -> Result<DonationWrite>;
    async fn delete_donation(&self, id: i64) -> Result<bool>;
    async fn find_donation(&self, id: i64) -> Result<Option<Donation>>;
    /// 기부일 최신순
    async fn donations_for_donor(&self, donor_id: i64) -> Result<Vec<Donation>>;
    async fn list_donations(
        &self,
        status: Option<DonationStatus>,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<DonationWithDonor>, i64)>;
    /// 확정 기부 기준으로 합계를 다시 계산해 저장 (기부자가 없으면 None)
    async fn recalculate_totals(&self, donor_id: i64) -> Result<Option<DonorTotals>>;

    // ============ Inquiries ============

    async fn create_inquiry(&self, input: &InquiryInput) -> Result<DonationInquiry>;
    async fn update_inquiry(&self, id: i64, update: &InquiryUpdate)
        -> Result<Option<DonationInquiry>>;
    async fn list_inquiries(
        &self,
        status: Option<InquiryStatus>,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<DonationInquiry>, i64)>;

    // ============ Aggregates ============

    async fn count_donors(&self, window: CreatedWindow) -> Result<i64>;
    async fn confirmed_summary(&self, bounds: DateBounds) -> Result<ConfirmedSummary>;
    async fn recent_confirmed_donations(&self, limit: u32) -> Result<Vec<DonationWithDonor>>;
    /// total_donations > 0 인 기부자만, 합계 내림차순 (동률은 등록순)
    async fn top_donors(&self, limit: u32) -> Result<Vec<Donor>>;
    async fn inquiry_counts(&self) -> Result<InquiryCounts>;
    async fn category_breakdown(&self) -> Result<Vec<CategoryBreakdown>>;
}
