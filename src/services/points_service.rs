use crate::error::AppResult;
use crate::models::LeaderboardEntry;
use sqlx::SqlitePool;

/// Derived balance: the sum of the user's signed ledger deltas, zero when
/// no rows exist. Balances are never stored as a mutable column.
pub async fn balance<'e, E>(executor: E, user_id: i64) -> AppResult<i64>
where
    E: sqlx::SqliteExecutor<'e>,
{
    let total: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(delta), 0) FROM points_entries WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(executor)
            .await?;

    Ok(total)
}

/// Append one signed entry to the ledger.
pub async fn award<'e, E>(executor: E, user_id: i64, delta: i64, reason: &str) -> AppResult<()>
where
    E: sqlx::SqliteExecutor<'e>,
{
    sqlx::query("INSERT INTO points_entries (user_id, delta, reason) VALUES (?, ?, ?)")
        .bind(user_id)
        .bind(delta)
        .bind(reason)
        .execute(executor)
        .await?;

    Ok(())
}

#[derive(Clone)]
pub struct PointsService {
    pool: SqlitePool,
}

impl PointsService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn balance(&self, user_id: i64) -> AppResult<i64> {
        balance(&self.pool, user_id).await
    }

    /// Users ordered by balance descending; ties break on username
    /// ascending so the ordering is deterministic.
    pub async fn leaderboard(&self, limit: i64) -> AppResult<Vec<LeaderboardEntry>> {
        let entries = sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT u.username AS username, COALESCE(SUM(p.delta), 0) AS points
            FROM users u
            LEFT JOIN points_entries p ON p.user_id = u.id
            GROUP BY u.id
            ORDER BY points DESC, u.username ASC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{insert_user, memory_pool};

    #[tokio::test]
    async fn test_balance_defaults_to_zero() {
        let pool = memory_pool().await;
        let user_id = insert_user(&pool, "alice").await;

        assert_eq!(balance(&pool, user_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_balance_is_sum_of_deltas() {
        let pool = memory_pool().await;
        let user_id = insert_user(&pool, "alice").await;

        award(&pool, user_id, 5, "plastic_log").await.unwrap();
        award(&pool, user_id, 3, "scan").await.unwrap();
        award(&pool, user_id, -4, "redeem:Tote Bag").await.unwrap();

        assert_eq!(balance(&pool, user_id).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_leaderboard_order_and_tie_break() {
        let pool = memory_pool().await;
        let alice = insert_user(&pool, "alice").await;
        let bob = insert_user(&pool, "bob").await;
        let carol = insert_user(&pool, "carol").await;

        award(&pool, bob, 10, "plastic_log").await.unwrap();
        award(&pool, carol, 10, "plastic_log").await.unwrap();
        award(&pool, alice, 3, "plastic_log").await.unwrap();

        let svc = PointsService::new(pool);
        let board = svc.leaderboard(10).await.unwrap();
        let names: Vec<&str> = board.iter().map(|e| e.username.as_str()).collect();

        // bob and carol tie on 10 points, username ascending decides.
        assert_eq!(names, vec!["bob", "carol", "alice"]);
        assert_eq!(board[0].points, 10);
        assert_eq!(board[2].points, 3);
    }
}
