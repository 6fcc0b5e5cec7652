use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::estimate_impacts;
use chrono::NaiveDateTime;
use sqlx::SqlitePool;
use std::collections::BTreeMap;

#[derive(Clone)]
pub struct AdminService {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct UserPointsRow {
    id: i64,
    username: String,
    email: String,
    role: Role,
    created_at: NaiveDateTime,
    points: i64,
}

impl From<UserPointsRow> for UserResponse {
    fn from(row: UserPointsRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            role: row.role,
            points: row.points,
            created_at: row.created_at,
        }
    }
}

impl AdminService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Admin gate for the /admin surface. The role set is closed, so the
    /// match is exhaustive.
    pub async fn ensure_admin(&self, user_id: i64) -> AppResult<()> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, role, created_at FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        match user.role {
            Role::Admin => Ok(()),
            Role::Vendor | Role::Member => Err(AppError::PermissionDenied),
        }
    }

    pub async fn overview(&self) -> AppResult<AdminOverview> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT item, SUM(quantity) FROM plastic_logs GROUP BY item")
                .fetch_all(&self.pool)
                .await?;
        let by_item: BTreeMap<String, i64> = rows.into_iter().collect();
        let items: i64 = by_item.values().sum();

        let logs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM plastic_logs")
            .fetch_one(&self.pool)
            .await?;
        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        let points: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(delta), 0) FROM points_entries")
            .fetch_one(&self.pool)
            .await?;

        let trend = sqlx::query_as::<_, TrendPoint>(
            r#"
            SELECT date(created_at) AS date, SUM(quantity) AS quantity
            FROM plastic_logs
            GROUP BY date(created_at)
            ORDER BY date ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut recommendations: Vec<String> = [
            "Ban single-use plastics at all campus events and canteens",
            "Install mandatory water refill stations in every building",
            "Vendor contracts must use reusable/compostable packaging",
            "Offer BYO discounts at partner vendors",
            "Run a 'Plastic-Free Week' each semester",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        if items > 500 {
            recommendations
                .push("Set department-level reduction targets with monthly reporting".to_string());
        }
        if users > 50 {
            recommendations
                .push("Launch inter-department eco-leaderboards with small grants".to_string());
        }

        let impact = estimate_impacts(&by_item);

        Ok(AdminOverview {
            totals: OverviewTotals {
                logs,
                users,
                points,
                items,
            },
            by_item,
            impact,
            trend,
            recommendations,
        })
    }

    pub async fn list_users(
        &self,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<UserResponse>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, UserPointsRow>(
            r#"
            SELECT
                u.id, u.username, u.email, u.role, u.created_at,
                COALESCE(SUM(p.delta), 0) AS points
            FROM users u
            LEFT JOIN points_entries p ON p.user_id = u.id
            GROUP BY u.id
            ORDER BY u.id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(params.get_limit() as i64)
        .bind(params.get_offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let items: Vec<UserResponse> = rows.into_iter().map(UserResponse::from).collect();

        Ok(PaginatedResponse::new(items, params, total))
    }

    pub async fn user_detail(&self, user_id: i64) -> AppResult<UserResponse> {
        let row = sqlx::query_as::<_, UserPointsRow>(
            r#"
            SELECT
                u.id, u.username, u.email, u.role, u.created_at,
                COALESCE(SUM(p.delta), 0) AS points
            FROM users u
            LEFT JOIN points_entries p ON p.user_id = u.id
            WHERE u.id = ?
            GROUP BY u.id
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(UserResponse::from(row))
    }

    pub async fn list_vendors(&self) -> AppResult<Vec<Vendor>> {
        let vendors = sqlx::query_as::<_, Vendor>(
            "SELECT id, name, discount, description FROM vendors ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(vendors)
    }

    pub async fn vendor_detail(&self, vendor_id: i64) -> AppResult<VendorDetailResponse> {
        let vendor = sqlx::query_as::<_, Vendor>(
            "SELECT id, name, discount, description FROM vendors WHERE id = ?",
        )
        .bind(vendor_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Vendor not found".to_string()))?;

        let alternatives = sqlx::query_as::<_, AlternativeItem>(
            r#"
            SELECT id, for_item_key, name, description, vendor_id, estimated_cost, co2_saving_kg
            FROM alternative_items
            WHERE vendor_id = ?
            ORDER BY for_item_key ASC
            "#,
        )
        .bind(vendor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(VendorDetailResponse {
            vendor,
            alternatives,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::plastic_service::PlasticService;
    use crate::test_utils::{insert_user, insert_user_with_role, memory_pool};

    #[tokio::test]
    async fn test_ensure_admin_rejects_member_and_vendor() {
        let pool = memory_pool().await;
        let member = insert_user(&pool, "alice").await;
        let vendor = insert_user_with_role(&pool, "shop", "vendor").await;
        let admin = insert_user_with_role(&pool, "root", "admin").await;
        let svc = AdminService::new(pool);

        assert!(matches!(
            svc.ensure_admin(member).await,
            Err(AppError::PermissionDenied)
        ));
        assert!(matches!(
            svc.ensure_admin(vendor).await,
            Err(AppError::PermissionDenied)
        ));
        assert!(svc.ensure_admin(admin).await.is_ok());
    }

    #[tokio::test]
    async fn test_overview_totals_and_trend() {
        let pool = memory_pool().await;
        let alice = insert_user(&pool, "alice").await;
        let plastic = PlasticService::new(pool.clone());

        plastic.add_log(alice, "bottle", 3, "plastic_log").await.unwrap();
        plastic.add_log(alice, "bag", 5, "plastic_log").await.unwrap();

        let overview = AdminService::new(pool).overview().await.unwrap();
        assert_eq!(overview.totals.logs, 2);
        assert_eq!(overview.totals.users, 1);
        assert_eq!(overview.totals.points, 8);
        assert_eq!(overview.totals.items, 8);
        assert_eq!(overview.trend.len(), 1);
        assert_eq!(overview.trend[0].quantity, 8);
        assert_eq!(overview.recommendations.len(), 5);
        assert_eq!(overview.impact.plastic_kg, 0.11);
    }

    #[tokio::test]
    async fn test_user_detail_carries_balance() {
        let pool = memory_pool().await;
        let alice = insert_user(&pool, "alice").await;
        let plastic = PlasticService::new(pool.clone());
        plastic.add_log(alice, "straw", 4, "plastic_log").await.unwrap();

        let detail = AdminService::new(pool).user_detail(alice).await.unwrap();
        assert_eq!(detail.points, 4);
    }
}
