use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::NaiveDate;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct ChallengeService {
    pool: SqlitePool,
}

impl ChallengeService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Challenge>> {
        let challenges = sqlx::query_as::<_, Challenge>(
            r#"
            SELECT id, name, description, start_date, end_date, points_bonus
            FROM challenges
            ORDER BY start_date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(challenges)
    }

    pub async fn detail(&self, challenge_id: i64, user_id: i64) -> AppResult<ChallengeDetailResponse> {
        let challenge = self.get(challenge_id).await?;

        let joined: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM challenge_participations WHERE challenge_id = ? AND user_id = ?",
        )
        .bind(challenge_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        // Participants ranked by total balance, username breaking ties.
        let user_leaderboard = sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT u.username AS username, COALESCE(SUM(p.delta), 0) AS points
            FROM challenge_participations cp
            JOIN users u ON u.id = cp.user_id
            LEFT JOIN points_entries p ON p.user_id = u.id
            WHERE cp.challenge_id = ?
            GROUP BY u.id
            ORDER BY points DESC, u.username ASC
            "#,
        )
        .bind(challenge_id)
        .fetch_all(&self.pool)
        .await?;

        // Teams ranked by the summed balances of their participating members.
        let team_leaderboard = sqlx::query_as::<_, TeamScore>(
            r#"
            SELECT t.id AS id, t.name AS name, COALESCE(SUM(p.delta), 0) AS points
            FROM challenge_participations cp
            JOIN team_memberships m ON m.user_id = cp.user_id
            JOIN teams t ON t.id = m.team_id
            LEFT JOIN points_entries p ON p.user_id = cp.user_id
            WHERE cp.challenge_id = ?
            GROUP BY t.id
            ORDER BY points DESC, t.name ASC
            "#,
        )
        .bind(challenge_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ChallengeDetailResponse {
            challenge,
            joined: joined.is_some(),
            user_leaderboard,
            team_leaderboard,
        })
    }

    /// At most one participation per (user, challenge); the schema backs
    /// this with a UNIQUE constraint.
    pub async fn join(&self, challenge_id: i64, user_id: i64) -> AppResult<()> {
        self.get(challenge_id).await?;

        let joined = sqlx::query(
            r#"
            INSERT INTO challenge_participations (challenge_id, user_id)
            SELECT ?, ?
            WHERE NOT EXISTS (
                SELECT 1 FROM challenge_participations WHERE challenge_id = ? AND user_id = ?
            )
            "#,
        )
        .bind(challenge_id)
        .bind(user_id)
        .bind(challenge_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if joined == 0 {
            return Err(AppError::Conflict(
                "Already joined this challenge".to_string(),
            ));
        }

        Ok(())
    }

    pub async fn host(&self, request: HostChallengeRequest) -> AppResult<Challenge> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::ValidationError(
                "Challenge name required".to_string(),
            ));
        }

        let start_date = parse_day(&request.start_date)?;
        let end_date = parse_day(&request.end_date)?;
        let points_bonus = request.points_bonus.unwrap_or(10);

        let challenge_id = sqlx::query(
            r#"
            INSERT INTO challenges (name, description, start_date, end_date, points_bonus)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(request.description.unwrap_or_default())
        .bind(start_date)
        .bind(end_date)
        .bind(points_bonus)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.get(challenge_id).await
    }

    async fn get(&self, challenge_id: i64) -> AppResult<Challenge> {
        sqlx::query_as::<_, Challenge>(
            r#"
            SELECT id, name, description, start_date, end_date, points_bonus
            FROM challenges
            WHERE id = ?
            "#,
        )
        .bind(challenge_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Challenge not found".to_string()))
    }
}

fn parse_day(value: &str) -> AppResult<chrono::NaiveDateTime> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
        .map_err(|_| AppError::ValidationError("Invalid date, expected YYYY-MM-DD".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{points_service, team_service::TeamService};
    use crate::test_utils::{insert_user, memory_pool};

    fn host_request(name: &str) -> HostChallengeRequest {
        HostChallengeRequest {
            name: name.to_string(),
            description: Some("one week without plastic".to_string()),
            start_date: "2025-09-01".to_string(),
            end_date: "2025-09-07".to_string(),
            points_bonus: None,
        }
    }

    #[tokio::test]
    async fn test_host_defaults_bonus() {
        let pool = memory_pool().await;
        let svc = ChallengeService::new(pool);

        let challenge = svc.host(host_request("Plastic-Free Week")).await.unwrap();
        assert_eq!(challenge.points_bonus, 10);
        assert!(challenge.start_date.is_some());
    }

    #[tokio::test]
    async fn test_host_rejects_bad_date() {
        let pool = memory_pool().await;
        let svc = ChallengeService::new(pool);

        let mut request = host_request("Plastic-Free Week");
        request.start_date = "September 1st".to_string();
        assert!(svc.host(request).await.is_err());
    }

    #[tokio::test]
    async fn test_join_twice_rejected() {
        let pool = memory_pool().await;
        let user_id = insert_user(&pool, "alice").await;
        let svc = ChallengeService::new(pool.clone());

        let challenge = svc.host(host_request("Plastic-Free Week")).await.unwrap();
        svc.join(challenge.id, user_id).await.unwrap();
        assert!(matches!(
            svc.join(challenge.id, user_id).await,
            Err(AppError::Conflict(_))
        ));

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM challenge_participations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_detail_leaderboards() {
        let pool = memory_pool().await;
        let alice = insert_user(&pool, "alice").await;
        let bob = insert_user(&pool, "bob").await;
        let challenges = ChallengeService::new(pool.clone());
        let teams = TeamService::new(pool.clone());

        let challenge = challenges.host(host_request("Plastic-Free Week")).await.unwrap();
        challenges.join(challenge.id, alice).await.unwrap();
        challenges.join(challenge.id, bob).await.unwrap();

        let team = teams.create("Hostel A").await.unwrap();
        teams.join(bob, team.id).await.unwrap();

        points_service::award(&pool, alice, 4, "plastic_log")
            .await
            .unwrap();
        points_service::award(&pool, bob, 9, "plastic_log")
            .await
            .unwrap();

        let detail = challenges.detail(challenge.id, alice).await.unwrap();
        assert!(detail.joined);
        assert_eq!(detail.user_leaderboard[0].username, "bob");
        assert_eq!(detail.user_leaderboard[0].points, 9);
        assert_eq!(detail.user_leaderboard[1].username, "alice");
        assert_eq!(detail.team_leaderboard.len(), 1);
        assert_eq!(detail.team_leaderboard[0].points, 9);
    }
}
