use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::points_service;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct RewardsService {
    pool: SqlitePool,
}

impl RewardsService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Reward>> {
        let rewards = sqlx::query_as::<_, Reward>(
            "SELECT id, name, cost_points, description FROM rewards ORDER BY cost_points ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rewards)
    }

    /// Exchange points for a reward. The debit insert carries the balance
    /// check in its WHERE clause, so check and write are one statement
    /// inside one transaction; a concurrent redemption cannot slip between
    /// them. Returns the balance after the debit.
    pub async fn redeem(&self, user_id: i64, reward_id: i64) -> AppResult<i64> {
        let reward = sqlx::query_as::<_, Reward>(
            "SELECT id, name, cost_points, description FROM rewards WHERE id = ?",
        )
        .bind(reward_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Reward not found".to_string()))?;

        let mut tx = self.pool.begin().await?;

        let debited = sqlx::query(
            r#"
            INSERT INTO points_entries (user_id, delta, reason)
            SELECT ?, ?, ?
            WHERE (SELECT COALESCE(SUM(delta), 0) FROM points_entries WHERE user_id = ?) >= ?
            "#,
        )
        .bind(user_id)
        .bind(-reward.cost_points)
        .bind(format!("redeem:{}", reward.name))
        .bind(user_id)
        .bind(reward.cost_points)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if debited == 0 {
            // Dropping the transaction rolls back; nothing was written.
            return Err(AppError::InsufficientPoints);
        }

        sqlx::query("INSERT INTO redemptions (user_id, reward_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(reward.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        log::info!(
            "user {user_id} redeemed reward '{}' for {} points",
            reward.name,
            reward.cost_points
        );

        points_service::balance(&self.pool, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{insert_reward, insert_user, memory_pool};

    #[tokio::test]
    async fn test_redeem_success_debits_exact_cost() {
        let pool = memory_pool().await;
        let user_id = insert_user(&pool, "alice").await;
        let reward_id = insert_reward(&pool, "Tote Bag", 10).await;
        points_service::award(&pool, user_id, 15, "plastic_log")
            .await
            .unwrap();

        let svc = RewardsService::new(pool.clone());
        let remaining = svc.redeem(user_id, reward_id).await.unwrap();

        assert_eq!(remaining, 5);

        let redemptions: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM redemptions WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(redemptions, 1);

        let reason: String = sqlx::query_scalar(
            "SELECT reason FROM points_entries WHERE user_id = ? AND delta < 0",
        )
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(reason, "redeem:Tote Bag");
    }

    #[tokio::test]
    async fn test_redeem_insufficient_points_writes_nothing() {
        let pool = memory_pool().await;
        let user_id = insert_user(&pool, "alice").await;
        let reward_id = insert_reward(&pool, "Tote Bag", 10).await;
        points_service::award(&pool, user_id, 9, "plastic_log")
            .await
            .unwrap();

        let svc = RewardsService::new(pool.clone());
        let result = svc.redeem(user_id, reward_id).await;

        assert!(matches!(result, Err(AppError::InsufficientPoints)));
        assert_eq!(points_service::balance(&pool, user_id).await.unwrap(), 9);

        let redemptions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM redemptions")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(redemptions, 0);
    }

    #[tokio::test]
    async fn test_redeem_exact_balance_succeeds() {
        let pool = memory_pool().await;
        let user_id = insert_user(&pool, "alice").await;
        let reward_id = insert_reward(&pool, "Sticker", 7).await;
        points_service::award(&pool, user_id, 7, "plastic_log")
            .await
            .unwrap();

        let svc = RewardsService::new(pool.clone());
        assert_eq!(svc.redeem(user_id, reward_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_redeem_unknown_reward() {
        let pool = memory_pool().await;
        let user_id = insert_user(&pool, "alice").await;

        let svc = RewardsService::new(pool);
        assert!(matches!(
            svc.redeem(user_id, 999).await,
            Err(AppError::NotFound(_))
        ));
    }
}
