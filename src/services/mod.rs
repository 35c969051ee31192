//! Services Module
//!
//! 비즈니스 로직을 담당하는 서비스 레이어
//!
//! # Services
//! - `DonorTotals`: 기부자 누적 합계 재계산
//! - `StatisticsReporter`: 대시보드 / 공개 통계 집계
//! - `validation`: 요청 폼 검증 (필드별 에러)

mod totals;
mod statistics;
pub mod validation;

pub use totals::DonorTotals;
pub use statistics::{
    average_donation, local_midnight, trailing_months, DashboardStatistics, DashboardView,
    DonationGrowthPoint, DonorGrowthPoint, HeadlineFigures, MonthBucket, MonthlyTrend,
    PublicStatistics, PublicView, StatisticsReporter, DASHBOARD_LIST_LIMIT,
    DASHBOARD_TREND_MONTHS, PUBLIC_GROWTH_MONTHS,
};
pub use validation::FieldErrors;
