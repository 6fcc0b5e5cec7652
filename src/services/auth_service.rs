use crate::config::AdminConfig;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::points_service;
use crate::utils::{JwtService, hash_password, validate_password, verify_password};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AuthService {
    pool: SqlitePool,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: SqlitePool, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        let username = request.username.trim();
        let email = request.email.trim();
        if username.is_empty() || email.is_empty() || request.password.is_empty() {
            return Err(AppError::ValidationError(
                "All fields are required".to_string(),
            ));
        }
        validate_password(&request.password)?;

        self.ensure_unique_user(username, email).await?;

        let password_hash = hash_password(&request.password)?;
        let user_id = sqlx::query(
            "INSERT INTO users (username, email, password_hash, role) VALUES (?, ?, ?, ?)",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(Role::Member)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        log::info!("registered user '{username}'");
        self.auth_response(user_id).await
    }

    /// Vendor sign-up creates both the vendor login and the catalog row,
    /// in one transaction.
    pub async fn register_vendor(&self, request: RegisterVendorRequest) -> AppResult<AuthResponse> {
        let name = request.name.trim();
        let email = request.email.trim();
        if name.is_empty() || email.is_empty() || request.password.is_empty() {
            return Err(AppError::ValidationError(
                "All fields are required".to_string(),
            ));
        }
        validate_password(&request.password)?;

        self.ensure_unique_user(name, email).await?;

        let existing_vendor: Option<i64> =
            sqlx::query_scalar("SELECT id FROM vendors WHERE name = ?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        if existing_vendor.is_some() {
            return Err(AppError::Conflict("Vendor already exists".to_string()));
        }

        let password_hash = hash_password(&request.password)?;
        let mut tx = self.pool.begin().await?;

        let user_id = sqlx::query(
            "INSERT INTO users (username, email, password_hash, role) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(Role::Vendor)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        sqlx::query("INSERT INTO vendors (name, discount, description) VALUES (?, ?, ?)")
            .bind(name)
            .bind(request.discount.unwrap_or(0))
            .bind(request.description.unwrap_or_default())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        log::info!("registered vendor '{name}'");
        self.auth_response(user_id).await
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, role, created_at FROM users WHERE email = ?",
        )
        .bind(request.email.trim())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::AuthError("Invalid credentials".to_string()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::AuthError("Invalid credentials".to_string()));
        }

        self.auth_response(user.id).await
    }

    pub async fn refresh_token(&self, token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(token)?;
        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::AuthError("Invalid refresh token".to_string()))?;

        self.auth_response(user_id).await
    }

    /// Current user with the derived points balance.
    pub async fn me(&self, user_id: i64) -> AppResult<UserResponse> {
        let user = self.get_user(user_id).await?;
        let points = points_service::balance(&self.pool, user_id).await?;

        let mut response = UserResponse::from(user);
        response.points = points;
        Ok(response)
    }

    /// Create the configured admin account when missing. Safe to run at
    /// every startup.
    pub async fn seed_admin(&self, admin: &AdminConfig) -> AppResult<()> {
        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = ?")
            .bind(&admin.username)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Ok(());
        }

        let password_hash = hash_password(&admin.password)?;
        sqlx::query("INSERT INTO users (username, email, password_hash, role) VALUES (?, ?, ?, ?)")
            .bind(&admin.username)
            .bind(&admin.email)
            .bind(password_hash)
            .bind(Role::Admin)
            .execute(&self.pool)
            .await?;

        log::info!("seeded admin user '{}'", admin.username);
        Ok(())
    }

    async fn ensure_unique_user(&self, username: &str, email: &str) -> AppResult<()> {
        let by_email: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        if by_email.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let by_username: Option<i64> =
            sqlx::query_scalar("SELECT id FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        if by_username.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        Ok(())
    }

    async fn get_user(&self, user_id: i64) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, role, created_at FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn auth_response(&self, user_id: i64) -> AppResult<AuthResponse> {
        let user = self.get_user(user_id).await?;
        let role = user.role.to_string();

        let access_token = self.jwt_service.generate_access_token(user.id, &role)?;
        let refresh_token = self.jwt_service.generate_refresh_token(user.id, &role)?;

        let points = points_service::balance(&self.pool, user.id).await?;
        let mut user_response = UserResponse::from(user);
        user_response.points = points;

        Ok(AuthResponse {
            user: user_response,
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::memory_pool;

    fn jwt() -> JwtService {
        JwtService::new("test-secret", 3600, 7200)
    }

    fn register_request(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "test123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let pool = memory_pool().await;
        let svc = AuthService::new(pool, jwt());

        let registered = svc
            .register(register_request("alice", "alice@test.com"))
            .await
            .unwrap();
        assert_eq!(registered.user.role, Role::Member);
        assert_eq!(registered.user.points, 0);

        let logged_in = svc
            .login(LoginRequest {
                email: "alice@test.com".to_string(),
                password: "test123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.user.username, "alice");

        let wrong = svc
            .login(LoginRequest {
                email: "alice@test.com".to_string(),
                password: "wrong".to_string(),
            })
            .await;
        assert!(matches!(wrong, Err(AppError::AuthError(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_never_creates_second_row() {
        let pool = memory_pool().await;
        let svc = AuthService::new(pool.clone(), jwt());

        svc.register(register_request("alice", "alice@test.com"))
            .await
            .unwrap();

        // Same username, different email.
        assert!(matches!(
            svc.register(register_request("alice", "other@test.com")).await,
            Err(AppError::Conflict(_))
        ));
        // Same email, different username.
        assert!(matches!(
            svc.register(register_request("alice2", "alice@test.com")).await,
            Err(AppError::Conflict(_))
        ));

        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(users, 1);
    }

    #[tokio::test]
    async fn test_register_vendor_creates_catalog_row() {
        let pool = memory_pool().await;
        let svc = AuthService::new(pool.clone(), jwt());

        let response = svc
            .register_vendor(RegisterVendorRequest {
                name: "Green Refills".to_string(),
                email: "shop@test.com".to_string(),
                password: "test123".to_string(),
                discount: Some(10),
                description: None,
            })
            .await
            .unwrap();
        assert_eq!(response.user.role, Role::Vendor);

        let discount: i64 =
            sqlx::query_scalar("SELECT discount FROM vendors WHERE name = 'Green Refills'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(discount, 10);
    }

    #[tokio::test]
    async fn test_refresh_round_trip() {
        let pool = memory_pool().await;
        let svc = AuthService::new(pool, jwt());

        let registered = svc
            .register(register_request("alice", "alice@test.com"))
            .await
            .unwrap();

        let refreshed = svc.refresh_token(&registered.refresh_token).await.unwrap();
        assert_eq!(refreshed.user.id, registered.user.id);

        // Access tokens are not valid refresh tokens.
        assert!(svc.refresh_token(&registered.access_token).await.is_err());
    }

    #[tokio::test]
    async fn test_seed_admin_idempotent() {
        let pool = memory_pool().await;
        let svc = AuthService::new(pool.clone(), jwt());
        let admin = AdminConfig::default();

        svc.seed_admin(&admin).await.unwrap();
        svc.seed_admin(&admin).await.unwrap();

        let admins: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'admin'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(admins, 1);
    }
}
