use sqlx::{PgPool, Row};

use crate::dto::stats_dto::{DashboardStats, RecentScreening};
use crate::error::Result;
use crate::utils::time::format_time_ago;

#[derive(Clone)]
pub struct StatsService {
    pool: PgPool,
}

impl StatsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let processed = sqlx::query(
            r#"
            SELECT COUNT(*) AS total_processed,
                   COALESCE(ROUND(AVG(ai_score)::numeric, 2), 0)::float8 AS avg_score
            FROM applicants
            WHERE status != 'pending'
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        let processed_count: i64 = processed.try_get("total_processed")?;
        let average_score: f64 = processed.try_get("avg_score")?;

        let qualified = sqlx::query("SELECT COUNT(*) AS n FROM applicants WHERE status = 'interview'")
            .fetch_one(&self.pool)
            .await?;
        let qualified_count: i64 = qualified.try_get("n")?;

        let pending = sqlx::query("SELECT COUNT(*) AS n FROM applicants WHERE status = 'pending'")
            .fetch_one(&self.pool)
            .await?;
        let pending_count: i64 = pending.try_get("n")?;

        // Week-over-week change in received applications; an empty previous
        // week counts as a 100% increase.
        let weekly = sqlx::query(
            r#"
            WITH current_week AS (
                SELECT COUNT(*) AS current_count
                FROM applicants
                WHERE created_at >= NOW() - INTERVAL '7 days'
            ),
            previous_week AS (
                SELECT COUNT(*) AS previous_count
                FROM applicants
                WHERE created_at >= NOW() - INTERVAL '14 days'
                  AND created_at < NOW() - INTERVAL '7 days'
            )
            SELECT
                CASE
                    WHEN previous_count = 0 THEN 100
                    ELSE ROUND(((current_count - previous_count) / previous_count::float * 100)::numeric, 1)
                END::float8 AS weekly_change
            FROM current_week, previous_week
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        let weekly_change: f64 = weekly.try_get("weekly_change")?;

        let recent_rows = sqlx::query(
            r#"
            SELECT
                a.fullname AS name,
                l.title AS position,
                a.ai_score AS score,
                a.updated_at,
                CASE
                    WHEN a.ai_score >= 80 THEN 'bg-green-500'
                    WHEN a.ai_score >= 60 THEN 'bg-yellow-500'
                    ELSE 'bg-red-500'
                END AS status_color
            FROM applicants a
            JOIN listings l ON a.listing_id = l.id
            WHERE a.status != 'pending'
            ORDER BY a.updated_at DESC
            LIMIT 4
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut recent_screenings = Vec::with_capacity(recent_rows.len());
        for row in recent_rows {
            let updated_at: chrono::DateTime<chrono::Utc> = row.try_get("updated_at")?;
            recent_screenings.push(RecentScreening {
                name: row.try_get("name")?,
                position: row.try_get("position")?,
                score: row.try_get("score")?,
                status_color: row.try_get("status_color")?,
                time: format_time_ago(updated_at),
            });
        }

        let success_rate = if processed_count > 0 {
            ((qualified_count as f64 / processed_count as f64) * 100.0).round() as i64
        } else {
            0
        };

        Ok(DashboardStats {
            processed_count,
            qualified_count,
            pending_count,
            average_score,
            weekly_change,
            success_rate,
            recent_screenings,
        })
    }
}
