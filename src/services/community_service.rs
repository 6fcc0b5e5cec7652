use crate::error::AppResult;
use crate::models::*;
use crate::services::points_service;
use crate::utils::{estimate_impacts, nudge_message};
use sqlx::SqlitePool;
use std::collections::BTreeMap;

#[derive(Clone)]
pub struct CommunityService {
    pool: SqlitePool,
}

impl CommunityService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Per-item quantity totals, community-wide or for one user.
    async fn by_item(&self, user_id: Option<i64>) -> AppResult<BTreeMap<String, i64>> {
        let rows: Vec<(String, i64)> = match user_id {
            Some(user_id) => {
                sqlx::query_as(
                    "SELECT item, SUM(quantity) FROM plastic_logs WHERE user_id = ? GROUP BY item",
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as("SELECT item, SUM(quantity) FROM plastic_logs GROUP BY item")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows.into_iter().collect())
    }

    pub async fn stats(&self) -> AppResult<CommunityStats> {
        let by_item = self.by_item(None).await?;
        let total_items = by_item.values().sum();

        let total_logs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM plastic_logs")
            .fetch_one(&self.pool)
            .await?;
        let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        let total_points: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(delta), 0) FROM points_entries")
                .fetch_one(&self.pool)
                .await?;

        let impact = estimate_impacts(&by_item);

        Ok(CommunityStats {
            total_items,
            total_logs,
            total_users,
            total_points,
            by_item,
            impact,
        })
    }

    pub async fn nudge(&self, user_id: i64) -> AppResult<NudgeResponse> {
        let by_item = self.by_item(Some(user_id)).await?;
        let items_count: i64 = by_item.values().sum();
        let details = estimate_impacts(&by_item);

        Ok(NudgeResponse {
            message: nudge_message(items_count, &details),
            details,
            items_count,
            by_item,
        })
    }

    pub async fn dashboard(&self, user_id: i64) -> AppResult<DashboardResponse> {
        let points = points_service::balance(&self.pool, user_id).await?;

        let quantity_today: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(quantity), 0) FROM plastic_logs
            WHERE user_id = ? AND date(created_at) = date('now')
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let quantity_week: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(quantity), 0) FROM plastic_logs
            WHERE user_id = ? AND date(created_at) >= date('now', '-6 days')
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let last_logs = sqlx::query_as::<_, PlasticLog>(
            r#"
            SELECT id, user_id, item, quantity, created_at
            FROM plastic_logs
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT 10
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let nudge = self.nudge(user_id).await?;
        let by_item = nudge.by_item.clone();

        Ok(DashboardResponse {
            points,
            quantity_today,
            quantity_week,
            last_logs,
            by_item,
            nudge,
        })
    }
}
