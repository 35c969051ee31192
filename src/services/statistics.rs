//! Statistics Reporter
//!
//! Builds the read-only dashboard and public views straight from the ledgers.
//! Nothing is cached: every call re-runs the aggregate queries.
//!
//! Month buckets follow the server's local calendar. A donation bucket covers
//! `donation_date` from the first to the last day of the month (inclusive); a
//! donor-creation bucket covers instants from local midnight of the first day
//! up to, but excluding, local midnight of the next month's first day.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, Local, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::{
    CategoryBreakdown, CreatedWindow, DateBounds, DonationRepository, DonationWithDonor, Donor,
};

/// 대시보드 최근 기부 / 상위 기부자 개수
pub const DASHBOARD_LIST_LIMIT: u32 = 10;
/// 대시보드 월별 추이 개월 수
pub const DASHBOARD_TREND_MONTHS: u32 = 6;
/// 공개 페이지 성장 추이 개월 수
pub const PUBLIC_GROWTH_MONTHS: u32 = 12;

// ============ Month Buckets ============

/// 달력 기준 한 달
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBucket {
    /// 예: "Jan 2024"
    pub label: String,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
}

impl MonthBucket {
    /// `date`가 속한 달
    pub fn containing(date: NaiveDate) -> Option<Self> {
        let first_day = date.with_day(1)?;
        let next_first = first_day.checked_add_months(Months::new(1))?;
        Some(Self {
            label: first_day.format("%b %Y").to_string(),
            first_day,
            last_day: next_first.pred_opt()?,
        })
    }

    /// 기부일 기준 범위 (양끝 포함)
    pub fn date_bounds(&self) -> DateBounds {
        DateBounds::between(self.first_day, self.last_day)
    }

    /// 생성 시각 기준 범위 (로컬 자정 ~ 다음 달 로컬 자정 전)
    pub fn created_window(&self) -> Option<CreatedWindow> {
        let next_first = self.last_day.succ_opt()?;
        Some(CreatedWindow::between(
            local_midnight(self.first_day),
            local_midnight(next_first),
        ))
    }
}

/// `today`가 속한 달로 끝나는 최근 `count`개월 (오래된 달부터)
pub fn trailing_months(today: NaiveDate, count: u32) -> Result<Vec<MonthBucket>> {
    let current_first = today
        .with_day(1)
        .ok_or_else(|| anyhow!("invalid reporting date {today}"))?;

    (0..count)
        .rev()
        .map(|back| {
            current_first
                .checked_sub_months(Months::new(back))
                .and_then(MonthBucket::containing)
                .ok_or_else(|| anyhow!("month bucket out of range ({back} months before {today})"))
        })
        .collect()
}

/// 로컬 시간대 기준 `date` 00:00 을 UTC 시각으로
///
/// DST 전환으로 자정이 없거나 두 번 있으면 가장 이른 시각을 사용한다.
pub fn local_midnight(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

// ============ View Models ============

/// 대시보드/공개 페이지 공통 수치
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HeadlineFigures {
    pub total_donors: i64,
    pub donors_this_month: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_donations: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub donations_this_month: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardStatistics {
    #[serde(flatten)]
    pub headline: HeadlineFigures,
    pub new_inquiries: i64,
    pub total_inquiries: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlyTrend {
    pub month: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub count: i64,
}

/// GET /dashboard
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardView {
    pub statistics: DashboardStatistics,
    pub recent_donations: Vec<DonationWithDonor>,
    pub top_donors: Vec<Donor>,
    pub monthly_trends: Vec<MonthlyTrend>,
    pub category_breakdown: Vec<CategoryBreakdown>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PublicStatistics {
    #[serde(flatten)]
    pub headline: HeadlineFigures,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_donation: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DonationGrowthPoint {
    pub month: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DonorGrowthPoint {
    pub month: String,
    pub count: i64,
}

/// GET /
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PublicView {
    pub statistics: PublicStatistics,
    pub donation_growth: Vec<DonationGrowthPoint>,
    pub donor_growth: Vec<DonorGrowthPoint>,
}

// ============ Reporter ============

/// 통계 리포터
pub struct StatisticsReporter<'a> {
    repo: &'a dyn DonationRepository,
}

impl<'a> StatisticsReporter<'a> {
    pub fn new(repo: &'a dyn DonationRepository) -> Self {
        Self { repo }
    }

    /// 관리자 대시보드
    pub async fn dashboard(&self, today: NaiveDate) -> Result<DashboardView> {
        let headline = self.headline(today).await?;
        let inquiries = self.repo.inquiry_counts().await?;
        let recent_donations = self
            .repo
            .recent_confirmed_donations(DASHBOARD_LIST_LIMIT)
            .await?;
        let top_donors = self.repo.top_donors(DASHBOARD_LIST_LIMIT).await?;

        let mut monthly_trends = Vec::with_capacity(DASHBOARD_TREND_MONTHS as usize);
        for bucket in trailing_months(today, DASHBOARD_TREND_MONTHS)? {
            let summary = self.repo.confirmed_summary(bucket.date_bounds()).await?;
            monthly_trends.push(MonthlyTrend {
                month: bucket.label,
                amount: summary.amount,
                count: summary.count,
            });
        }

        let category_breakdown = self.repo.category_breakdown().await?;

        Ok(DashboardView {
            statistics: DashboardStatistics {
                headline,
                new_inquiries: inquiries.new_count,
                total_inquiries: inquiries.total,
            },
            recent_donations,
            top_donors,
            monthly_trends,
            category_breakdown,
        })
    }

    /// 공개 통계 페이지
    pub async fn public_overview(&self, today: NaiveDate) -> Result<PublicView> {
        let headline = self.headline(today).await?;
        let all_time = self.repo.confirmed_summary(DateBounds::all()).await?;

        let mut donation_growth = Vec::with_capacity(PUBLIC_GROWTH_MONTHS as usize);
        let mut donor_growth = Vec::with_capacity(PUBLIC_GROWTH_MONTHS as usize);
        for bucket in trailing_months(today, PUBLIC_GROWTH_MONTHS)? {
            let summary = self.repo.confirmed_summary(bucket.date_bounds()).await?;
            let window = bucket
                .created_window()
                .ok_or_else(|| anyhow!("month bucket {} out of range", bucket.label))?;
            let new_donors = self.repo.count_donors(window).await?;

            donation_growth.push(DonationGrowthPoint {
                month: bucket.label.clone(),
                amount: summary.amount,
            });
            donor_growth.push(DonorGrowthPoint {
                month: bucket.label,
                count: new_donors,
            });
        }

        Ok(PublicView {
            statistics: PublicStatistics {
                headline,
                average_donation: average_donation(all_time.amount, all_time.count),
            },
            donation_growth,
            donor_growth,
        })
    }

    async fn headline(&self, today: NaiveDate) -> Result<HeadlineFigures> {
        let month = MonthBucket::containing(today)
            .ok_or_else(|| anyhow!("invalid reporting date {today}"))?;

        let total_donors = self.repo.count_donors(CreatedWindow::all()).await?;
        let donors_this_month = self
            .repo
            .count_donors(CreatedWindow::since(local_midnight(month.first_day)))
            .await?;
        let total = self.repo.confirmed_summary(DateBounds::all()).await?;
        let this_month = self
            .repo
            .confirmed_summary(DateBounds::since(month.first_day))
            .await?;

        Ok(HeadlineFigures {
            total_donors,
            donors_this_month,
            total_donations: total.amount,
            donations_this_month: this_month.amount,
        })
    }
}

/// 평균 기부액 (확정 기부가 없으면 0)
pub fn average_donation(total: Decimal, count: i64) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}
