use crate::error::{AppError, AppResult};
use crate::models::*;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct TeamService {
    pool: SqlitePool,
}

impl TeamService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All teams with their summed member balances, plus the caller's
    /// current team if any.
    pub async fn list(&self, user_id: i64) -> AppResult<TeamsResponse> {
        let teams = sqlx::query_as::<_, TeamScore>(
            r#"
            SELECT
                t.id AS id,
                t.name AS name,
                COALESCE((
                    SELECT SUM(p.delta)
                    FROM team_memberships m
                    JOIN points_entries p ON p.user_id = m.user_id
                    WHERE m.team_id = t.id
                ), 0) AS points
            FROM teams t
            ORDER BY points DESC, t.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let joined_team = sqlx::query_as::<_, Team>(
            r#"
            SELECT t.id, t.name
            FROM team_memberships m
            JOIN teams t ON t.id = m.team_id
            WHERE m.user_id = ?
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(TeamsResponse { teams, joined_team })
    }

    pub async fn create(&self, name: &str) -> AppResult<Team> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::ValidationError("Team name required".to_string()));
        }

        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM teams WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict("Team already exists".to_string()));
        }

        let team_id = sqlx::query("INSERT INTO teams (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        Ok(Team {
            id: team_id,
            name: name.to_string(),
        })
    }

    /// One active membership per user: joining while already on any team
    /// is rejected without writing.
    pub async fn join(&self, user_id: i64, team_id: i64) -> AppResult<()> {
        let team: Option<i64> = sqlx::query_scalar("SELECT id FROM teams WHERE id = ?")
            .bind(team_id)
            .fetch_optional(&self.pool)
            .await?;
        if team.is_none() {
            return Err(AppError::NotFound("Team not found".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let joined = sqlx::query(
            r#"
            INSERT INTO team_memberships (user_id, team_id)
            SELECT ?, ?
            WHERE NOT EXISTS (SELECT 1 FROM team_memberships WHERE user_id = ?)
            "#,
        )
        .bind(user_id)
        .bind(team_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if joined == 0 {
            return Err(AppError::Conflict(
                "You are already a member of a team".to_string(),
            ));
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn leave(&self, user_id: i64, team_id: i64) -> AppResult<()> {
        let removed =
            sqlx::query("DELETE FROM team_memberships WHERE user_id = ? AND team_id = ?")
                .bind(user_id)
                .bind(team_id)
                .execute(&self.pool)
                .await?
                .rows_affected();

        if removed == 0 {
            return Err(AppError::NotFound(
                "You are not a member of this team".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::points_service;
    use crate::test_utils::{insert_user, memory_pool};

    #[tokio::test]
    async fn test_create_duplicate_rejected() {
        let pool = memory_pool().await;
        let svc = TeamService::new(pool);

        svc.create("Green Hostel").await.unwrap();
        assert!(matches!(
            svc.create("Green Hostel").await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_join_second_team_rejected() {
        let pool = memory_pool().await;
        let user_id = insert_user(&pool, "alice").await;
        let svc = TeamService::new(pool.clone());

        let first = svc.create("Hostel A").await.unwrap();
        let second = svc.create("Hostel B").await.unwrap();

        svc.join(user_id, first.id).await.unwrap();
        assert!(matches!(
            svc.join(user_id, second.id).await,
            Err(AppError::Conflict(_))
        ));

        let memberships: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM team_memberships WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(memberships, 1);
    }

    #[tokio::test]
    async fn test_leave_then_rejoin() {
        let pool = memory_pool().await;
        let user_id = insert_user(&pool, "alice").await;
        let svc = TeamService::new(pool);

        let team = svc.create("Hostel A").await.unwrap();
        svc.join(user_id, team.id).await.unwrap();
        svc.leave(user_id, team.id).await.unwrap();

        assert!(matches!(
            svc.leave(user_id, team.id).await,
            Err(AppError::NotFound(_))
        ));
        svc.join(user_id, team.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_sums_member_points() {
        let pool = memory_pool().await;
        let alice = insert_user(&pool, "alice").await;
        let bob = insert_user(&pool, "bob").await;
        let svc = TeamService::new(pool.clone());

        let team = svc.create("Hostel A").await.unwrap();
        svc.join(alice, team.id).await.unwrap();
        svc.join(bob, team.id).await.unwrap();
        points_service::award(&pool, alice, 5, "plastic_log")
            .await
            .unwrap();
        points_service::award(&pool, bob, 7, "plastic_log")
            .await
            .unwrap();

        let listing = svc.list(alice).await.unwrap();
        assert_eq!(listing.teams.len(), 1);
        assert_eq!(listing.teams[0].points, 12);
        assert_eq!(listing.joined_team.as_ref().map(|t| t.id), Some(team.id));
    }
}
