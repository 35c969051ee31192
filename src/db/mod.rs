//! Database Module
//!
//! PostgreSQL 구현 (`sqlx::PgPool`).
//!
//! 기부 쓰기는 모두 하나의 트랜잭션 안에서 처리된다:
//! 1. 기부자 행을 `SELECT ... FOR UPDATE`로 잠금
//! 2. 기부 INSERT/UPDATE/DELETE
//! 3. 확정 기부 기준으로 합계 재계산 후 기부자 행에 저장
//!
//! 같은 기부자에 대한 동시 쓰기는 1번 잠금에서 직렬화된다.
//! 기존 기부를 수정/삭제할 때는 기부 행을 먼저 `FOR UPDATE`로 잠근 뒤
//! 기부자 행을 잠근다 (잠금 순서가 같아야 교착이 생기지 않는다).

mod models;
mod repository;

pub use models::*;
#[cfg(test)]
pub use repository::mock;
pub use repository::DonationRepository;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgConnection, PgPool};

use crate::services::DonorTotals;
use crate::types::{DonationStatus, InquiryStatus, Pagination};

/// 데이터베이스 연결 및 쿼리 담당
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// 데이터베이스 연결
    ///
    /// # Connection Pool Settings
    ///
    /// - max_connections: 10
    /// - min_connections: 1
    /// - acquire_timeout: 3초
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .acquire_timeout(std::time::Duration::from_secs(3))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// 마이그레이션 실행
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// 기부자 행 잠금. 행이 없으면 false
async fn lock_donor(conn: &mut PgConnection, donor_id: i64) -> sqlx::Result<bool> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM donors WHERE id = $1 FOR UPDATE")
        .bind(donor_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}

/// 확정 기부 합계/건수를 한 번에 다시 계산해서 저장
///
/// 호출 전에 `lock_donor`로 행을 잠가야 한다.
async fn recalculate_in(conn: &mut PgConnection, donor_id: i64) -> sqlx::Result<Option<DonorTotals>> {
    sqlx::query_as::<_, DonorTotals>(
        r#"
        UPDATE donors
        SET total_donations = totals.total_donations,
            donation_count = totals.donation_count,
            updated_at = NOW()
        FROM (
            SELECT
                COALESCE(SUM(amount), 0) AS total_donations,
                COUNT(*)::INT AS donation_count
            FROM donations
            WHERE donor_id = $1 AND status = 'confirmed'
        ) AS totals
        WHERE donors.id = $1
        RETURNING donors.total_donations, donors.donation_count
        "#,
    )
    .bind(donor_id)
    .fetch_optional(&mut *conn)
    .await
}

#[async_trait]
impl DonationRepository for Database {
    /// Health check
    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // ============ Donors ============

    async fn create_donor(&self, input: &DonorInput) -> Result<Donor> {
        let donor = sqlx::query_as::<_, Donor>(
            r#"
            INSERT INTO donors (full_name, whatsapp_number, membership_category)
            VALUES ($1, $2, $3)
            RETURNING
                id, full_name, whatsapp_number, membership_category,
                total_donations, donation_count, created_at, updated_at
            "#,
        )
        .bind(&input.full_name)
        .bind(&input.whatsapp_number)
        .bind(input.membership_category)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(donor_id = donor.id, "Donor created");
        Ok(donor)
    }

    async fn update_donor(&self, id: i64, input: &DonorInput) -> Result<Option<Donor>> {
        let donor = sqlx::query_as::<_, Donor>(
            r#"
            UPDATE donors
            SET full_name = $2,
                whatsapp_number = $3,
                membership_category = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, full_name, whatsapp_number, membership_category,
                total_donations, donation_count, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.full_name)
        .bind(&input.whatsapp_number)
        .bind(input.membership_category)
        .fetch_optional(&self.pool)
        .await?;

        Ok(donor)
    }

    async fn find_donor(&self, id: i64) -> Result<Option<Donor>> {
        let donor = sqlx::query_as::<_, Donor>(
            r#"
            SELECT
                id, full_name, whatsapp_number, membership_category,
                total_donations, donation_count, created_at, updated_at
            FROM donors
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(donor)
    }

    async fn delete_donor(&self, id: i64) -> Result<bool> {
        // donations: ON DELETE CASCADE, donation_inquiries: ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM donors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(donor_id = id, "Donor deleted with its donations");
        }
        Ok(deleted)
    }

    async fn list_donors(
        &self,
        filter: &DonorFilter,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<Donor>, i64)> {
        let donors = sqlx::query_as::<_, Donor>(
            r#"
            SELECT
                id, full_name, whatsapp_number, membership_category,
                total_donations, donation_count, created_at, updated_at
            FROM donors
            WHERE ($1::TEXT IS NULL
                   OR full_name ILIKE '%' || $1 || '%'
                   OR whatsapp_number ILIKE '%' || $1 || '%')
              AND ($2::membership_category IS NULL OR membership_category = $2)
            ORDER BY total_donations DESC, id ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filter.search.as_deref())
        .bind(filter.category)
        .bind(per_page as i64)
        .bind(Pagination::offset(page, per_page))
        .fetch_all(&self.pool)
        .await?;

        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM donors
            WHERE ($1::TEXT IS NULL
                   OR full_name ILIKE '%' || $1 || '%'
                   OR whatsapp_number ILIKE '%' || $1 || '%')
              AND ($2::membership_category IS NULL OR membership_category = $2)
            "#,
        )
        .bind(filter.search.as_deref())
        .bind(filter.category)
        .fetch_one(&self.pool)
        .await?;

        Ok((donors, count.0))
    }

    // ============ Donations ============

    async fn create_donation(&self, input: &DonationInput) -> Result<DonationWrite> {
        let mut tx = self.pool.begin().await?;

        if !lock_donor(&mut tx, input.donor_id).await? {
            return Ok(DonationWrite::DonorMissing);
        }

        let donation = sqlx::query_as::<_, Donation>(
            r#"
            INSERT INTO donations (
                donor_id, amount, notes, proof_of_payment_path, status, donation_date
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING
                id, donor_id, amount, notes, proof_of_payment_path,
                status, donation_date, created_at, updated_at
            "#,
        )
        .bind(input.donor_id)
        .bind(input.amount)
        .bind(&input.notes)
        .bind(&input.proof_of_payment_path)
        .bind(input.status)
        .bind(input.donation_date)
        .fetch_one(&mut *tx)
        .await?;

        let totals = recalculate_in(&mut tx, input.donor_id).await?;
        tx.commit().await?;

        tracing::debug!(
            donation_id = donation.id,
            donor_id = donation.donor_id,
            ?totals,
            "Donation created"
        );
        Ok(DonationWrite::Saved(donation))
    }

    async fn update_donation(&self, id: i64, input: &DonationInput) -> Result<DonationWrite> {
        let mut tx = self.pool.begin().await?;

        let current: Option<(i64,)> =
            sqlx::query_as("SELECT donor_id FROM donations WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((previous_donor,)) = current else {
            return Ok(DonationWrite::DonationMissing);
        };

        // 기부자가 바뀌는 경우 두 행 모두 id 순서대로 잠금
        let mut affected = vec![previous_donor, input.donor_id];
        affected.sort_unstable();
        affected.dedup();
        for donor_id in &affected {
            if !lock_donor(&mut tx, *donor_id).await? {
                return Ok(DonationWrite::DonorMissing);
            }
        }

        let donation = sqlx::query_as::<_, Donation>(
            r#"
            UPDATE donations
            SET donor_id = $2,
                amount = $3,
                notes = $4,
                proof_of_payment_path = $5,
                status = $6,
                donation_date = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, donor_id, amount, notes, proof_of_payment_path,
                status, donation_date, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(input.donor_id)
        .bind(input.amount)
        .bind(&input.notes)
        .bind(&input.proof_of_payment_path)
        .bind(input.status)
        .bind(input.donation_date)
        .fetch_one(&mut *tx)
        .await?;

        for donor_id in &affected {
            recalculate_in(&mut tx, *donor_id).await?;
        }
        tx.commit().await?;

        tracing::debug!(donation_id = id, donors = ?affected, "Donation updated");
        Ok(DonationWrite::Saved(donation))
    }

    async fn delete_donation(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        // update_donation과 같은 순서: 기부 행 → 기부자 행
        let owner: Option<(i64,)> =
            sqlx::query_as("SELECT donor_id FROM donations WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((donor_id,)) = owner else {
            return Ok(false);
        };

        lock_donor(&mut tx, donor_id).await?;
        let result = sqlx::query("DELETE FROM donations WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        recalculate_in(&mut tx, donor_id).await?;
        tx.commit().await?;

        tracing::debug!(donation_id = id, donor_id, "Donation deleted");
        Ok(true)
    }

    async fn find_donation(&self, id: i64) -> Result<Option<Donation>> {
        let donation = sqlx::query_as::<_, Donation>(
            r#"
            SELECT
                id, donor_id, amount, notes, proof_of_payment_path,
                status, donation_date, created_at, updated_at
            FROM donations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(donation)
    }

    async fn donations_for_donor(&self, donor_id: i64) -> Result<Vec<Donation>> {
        let donations = sqlx::query_as::<_, Donation>(
            r#"
            SELECT
                id, donor_id, amount, notes, proof_of_payment_path,
                status, donation_date, created_at, updated_at
            FROM donations
            WHERE donor_id = $1
            ORDER BY donation_date DESC, created_at DESC, id DESC
            "#,
        )
        .bind(donor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(donations)
    }

    async fn list_donations(
        &self,
        status: Option<DonationStatus>,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<DonationWithDonor>, i64)> {
        let donations = sqlx::query_as::<_, DonationWithDonor>(
            r#"
            SELECT
                d.id,
                d.donor_id,
                r.full_name AS donor_name,
                r.membership_category,
                d.amount,
                d.notes,
                d.status,
                d.donation_date,
                d.created_at
            FROM donations d
            JOIN donors r ON r.id = d.donor_id
            WHERE ($1::donation_status IS NULL OR d.status = $1)
            ORDER BY d.donation_date DESC, d.created_at DESC, d.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status)
        .bind(per_page as i64)
        .bind(Pagination::offset(page, per_page))
        .fetch_all(&self.pool)
        .await?;

        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM donations WHERE ($1::donation_status IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok((donations, count.0))
    }

    async fn recalculate_totals(&self, donor_id: i64) -> Result<Option<DonorTotals>> {
        let mut tx = self.pool.begin().await?;
        if !lock_donor(&mut tx, donor_id).await? {
            return Ok(None);
        }
        let totals = recalculate_in(&mut tx, donor_id).await?;
        tx.commit().await?;
        Ok(totals)
    }

    // ============ Inquiries ============

    async fn create_inquiry(&self, input: &InquiryInput) -> Result<DonationInquiry> {
        let inquiry = sqlx::query_as::<_, DonationInquiry>(
            r#"
            INSERT INTO donation_inquiries (name, whatsapp_number)
            VALUES ($1, $2)
            RETURNING
                id, name, whatsapp_number, status, notes,
                contacted_at, converted_donor_id, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.whatsapp_number)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(inquiry_id = inquiry.id, "Donation inquiry received");
        Ok(inquiry)
    }

    async fn update_inquiry(
        &self,
        id: i64,
        update: &InquiryUpdate,
    ) -> Result<Option<DonationInquiry>> {
        let inquiry = sqlx::query_as::<_, DonationInquiry>(
            r#"
            UPDATE donation_inquiries
            SET status = $2,
                notes = $3,
                converted_donor_id = $4,
                contacted_at = CASE
                    WHEN $5 AND contacted_at IS NULL THEN NOW()
                    ELSE contacted_at
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, name, whatsapp_number, status, notes,
                contacted_at, converted_donor_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(update.status)
        .bind(&update.notes)
        .bind(update.converted_donor_id)
        .bind(update.status.implies_contact())
        .fetch_optional(&self.pool)
        .await?;

        Ok(inquiry)
    }

    async fn list_inquiries(
        &self,
        status: Option<InquiryStatus>,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<DonationInquiry>, i64)> {
        let inquiries = sqlx::query_as::<_, DonationInquiry>(
            r#"
            SELECT
                id, name, whatsapp_number, status, notes,
                contacted_at, converted_donor_id, created_at, updated_at
            FROM donation_inquiries
            WHERE ($1::inquiry_status IS NULL OR status = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status)
        .bind(per_page as i64)
        .bind(Pagination::offset(page, per_page))
        .fetch_all(&self.pool)
        .await?;

        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM donation_inquiries WHERE ($1::inquiry_status IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok((inquiries, count.0))
    }

    // ============ Aggregates ============

    async fn count_donors(&self, window: CreatedWindow) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM donors
            WHERE ($1::TIMESTAMPTZ IS NULL OR created_at >= $1)
              AND ($2::TIMESTAMPTZ IS NULL OR created_at < $2)
            "#,
        )
        .bind(window.from)
        .bind(window.until)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    async fn confirmed_summary(&self, bounds: DateBounds) -> Result<ConfirmedSummary> {
        let summary = sqlx::query_as::<_, ConfirmedSummary>(
            r#"
            SELECT
                COALESCE(SUM(amount), 0) AS amount,
                COUNT(*) AS count
            FROM donations
            WHERE status = 'confirmed'
              AND ($1::DATE IS NULL OR donation_date >= $1)
              AND ($2::DATE IS NULL OR donation_date <= $2)
            "#,
        )
        .bind(bounds.from)
        .bind(bounds.to)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }

    async fn recent_confirmed_donations(&self, limit: u32) -> Result<Vec<DonationWithDonor>> {
        let (donations, _) = self
            .list_donations(Some(DonationStatus::Confirmed), 1, limit)
            .await?;
        Ok(donations)
    }

    async fn top_donors(&self, limit: u32) -> Result<Vec<Donor>> {
        let donors = sqlx::query_as::<_, Donor>(
            r#"
            SELECT
                id, full_name, whatsapp_number, membership_category,
                total_donations, donation_count, created_at, updated_at
            FROM donors
            WHERE total_donations > 0
            ORDER BY total_donations DESC, id ASC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(donors)
    }

    async fn inquiry_counts(&self) -> Result<InquiryCounts> {
        let counts = sqlx::query_as::<_, InquiryCounts>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'new') AS new_count,
                COUNT(*) AS total
            FROM donation_inquiries
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    async fn category_breakdown(&self) -> Result<Vec<CategoryBreakdown>> {
        let rows = sqlx::query_as::<_, CategoryBreakdown>(
            r#"
            SELECT
                membership_category,
                COUNT(*) AS count,
                COALESCE(SUM(total_donations), 0) AS total_amount
            FROM donors
            GROUP BY membership_category
            ORDER BY membership_category
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
