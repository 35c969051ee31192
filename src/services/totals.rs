//! Donor Totals
//!
//! `total_donations` / `donation_count` on a donor are caches derived from the
//! donor's confirmed donations. They are always recomputed as a pair from the
//! full donation set, never adjusted by deltas.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use crate::db::Donation;

/// 기부자 누적 합계 (확정 기부 기준)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, FromRow)]
pub struct DonorTotals {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_donations: Decimal,
    pub donation_count: i32,
}

impl DonorTotals {
    /// 한 기부자의 기부 목록에서 합계를 다시 계산
    ///
    /// 확정되지 않은 기부는 무시한다. 빈 목록이면 (0, 0).
    pub fn from_donations<'a, I>(donations: I) -> Self
    where
        I: IntoIterator<Item = &'a Donation>,
    {
        donations
            .into_iter()
            .filter(|d| d.status.counts_toward_totals())
            .fold(Self::default(), |acc, d| Self {
                total_donations: acc.total_donations + d.amount,
                donation_count: acc.donation_count + 1,
            })
    }
}
