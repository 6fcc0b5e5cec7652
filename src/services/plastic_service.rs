use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::points_service;
use sqlx::SqlitePool;

/// Static smart-bin registry: bin code to (item, quantity per drop).
fn smart_bin_item(bin_id: &str) -> Option<(&'static str, i64)> {
    match bin_id {
        "BIN001" => Some(("Plastic Bottle", 1)),
        "BIN002" => Some(("Plastic Bag", 1)),
        "BIN003" => Some(("Food Container", 1)),
        _ => None,
    }
}

/// Resolve a scan payload to (item, quantity). An explicit item wins;
/// otherwise the code is a `BIN:<id>` reference, a JSON `{item, quantity}`
/// string, or the item name itself.
fn resolve_scan(request: &ScanRequest) -> AppResult<(String, i64)> {
    let mut item = request
        .item
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_string();
    let mut quantity = request.quantity;
    let code = request.code.as_deref().unwrap_or_default().trim();

    if item.is_empty() && !code.is_empty() {
        if let Some(bin_id) = code
            .to_uppercase()
            .strip_prefix("BIN:")
            .map(|s| s.trim().to_string())
        {
            match smart_bin_item(&bin_id) {
                Some((bin_item, bin_quantity)) => {
                    item = bin_item.to_string();
                    quantity = Some(bin_quantity);
                }
                None => {
                    item = format!("Smart Bin {bin_id}");
                    quantity = Some(1);
                }
            }
        } else {
            match serde_json::from_str::<serde_json::Value>(code) {
                Ok(payload) => {
                    item = payload
                        .get("item")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .trim()
                        .to_string();
                    quantity = payload.get("quantity").and_then(|v| v.as_i64()).or(quantity);
                }
                Err(_) => {
                    // Opaque code: treat the raw string as the item name.
                    item = code.to_string();
                }
            }
        }
    }

    if item.is_empty() {
        return Err(AppError::ValidationError(
            "No item found in scan".to_string(),
        ));
    }

    let quantity = quantity.unwrap_or(1);
    if quantity <= 0 {
        return Err(AppError::ValidationError(
            "Quantity must be positive".to_string(),
        ));
    }

    Ok((item, quantity))
}

#[derive(Clone)]
pub struct PlasticService {
    pool: SqlitePool,
}

impl PlasticService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record one disposal event: a plastic_logs row plus a matching
    /// points ledger entry with delta = quantity, in one transaction.
    /// Returns the created log and the fresh balance.
    pub async fn add_log(
        &self,
        user_id: i64,
        item: &str,
        quantity: i64,
        reason: &str,
    ) -> AppResult<(PlasticLog, i64)> {
        let item = item.trim();
        if item.is_empty() {
            return Err(AppError::ValidationError("Item required".to_string()));
        }
        if quantity <= 0 {
            return Err(AppError::ValidationError(
                "Quantity must be positive".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let log_id = sqlx::query("INSERT INTO plastic_logs (user_id, item, quantity) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(item)
            .bind(quantity)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        points_service::award(&mut *tx, user_id, quantity, reason).await?;

        tx.commit().await?;

        let log = sqlx::query_as::<_, PlasticLog>(
            "SELECT id, user_id, item, quantity, created_at FROM plastic_logs WHERE id = ?",
        )
        .bind(log_id)
        .fetch_one(&self.pool)
        .await?;

        let points = points_service::balance(&self.pool, user_id).await?;

        Ok((log, points))
    }

    pub async fn scan(&self, user_id: i64, request: ScanRequest) -> AppResult<(PlasticLog, i64)> {
        let (item, quantity) = resolve_scan(&request)?;
        self.add_log(user_id, &item, quantity, "scan").await
    }

    pub async fn logs(&self, user_id: i64) -> AppResult<Vec<PlasticLog>> {
        let logs = sqlx::query_as::<_, PlasticLog>(
            r#"
            SELECT id, user_id, item, quantity, created_at
            FROM plastic_logs
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{insert_user, memory_pool};

    fn scan_request(code: &str) -> ScanRequest {
        ScanRequest {
            code: Some(code.to_string()),
            item: None,
            quantity: None,
        }
    }

    #[test]
    fn test_resolve_scan_explicit_item_wins() {
        let (item, quantity) = resolve_scan(&ScanRequest {
            code: Some("BIN:BIN001".to_string()),
            item: Some("straw".to_string()),
            quantity: Some(4),
        })
        .unwrap();

        assert_eq!(item, "straw");
        assert_eq!(quantity, 4);
    }

    #[test]
    fn test_resolve_scan_known_bin() {
        let (item, quantity) = resolve_scan(&scan_request("bin:bin002")).unwrap();
        assert_eq!(item, "Plastic Bag");
        assert_eq!(quantity, 1);
    }

    #[test]
    fn test_resolve_scan_unknown_bin() {
        let (item, quantity) = resolve_scan(&scan_request("BIN:BIN999")).unwrap();
        assert_eq!(item, "Smart Bin BIN999");
        assert_eq!(quantity, 1);
    }

    #[test]
    fn test_resolve_scan_json_code() {
        let (item, quantity) =
            resolve_scan(&scan_request(r#"{"item": "cup", "quantity": 3}"#)).unwrap();
        assert_eq!(item, "cup");
        assert_eq!(quantity, 3);
    }

    #[test]
    fn test_resolve_scan_opaque_code_is_item() {
        let (item, quantity) = resolve_scan(&scan_request("bottle")).unwrap();
        assert_eq!(item, "bottle");
        assert_eq!(quantity, 1);
    }

    #[test]
    fn test_resolve_scan_empty_rejected() {
        assert!(resolve_scan(&ScanRequest::default()).is_err());
    }

    #[test]
    fn test_resolve_scan_nonpositive_quantity_rejected() {
        let result = resolve_scan(&ScanRequest {
            code: None,
            item: Some("bag".to_string()),
            quantity: Some(0),
        });
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_add_log_creates_log_and_points_pair() {
        let pool = memory_pool().await;
        let user_id = insert_user(&pool, "alice").await;
        let svc = PlasticService::new(pool.clone());

        let (log, points) = svc.add_log(user_id, "bottle", 3, "plastic_log").await.unwrap();

        assert_eq!(log.item, "bottle");
        assert_eq!(log.quantity, 3);
        assert_eq!(points, 3);

        let entries: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM points_entries WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(entries, 1);

        let delta: i64 = sqlx::query_scalar(
            "SELECT delta FROM points_entries WHERE user_id = ? AND reason = 'plastic_log'",
        )
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(delta, 3);
    }

    #[tokio::test]
    async fn test_add_log_rejects_empty_item() {
        let pool = memory_pool().await;
        let user_id = insert_user(&pool, "alice").await;
        let svc = PlasticService::new(pool.clone());

        assert!(svc.add_log(user_id, "   ", 1, "plastic_log").await.is_err());

        let logs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM plastic_logs")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(logs, 0);
    }

    #[tokio::test]
    async fn test_scan_awards_scan_reason() {
        let pool = memory_pool().await;
        let user_id = insert_user(&pool, "alice").await;
        let svc = PlasticService::new(pool.clone());

        let (_, points) = svc.scan(user_id, scan_request("BIN:BIN001")).await.unwrap();
        assert_eq!(points, 1);

        let reason: String =
            sqlx::query_scalar("SELECT reason FROM points_entries WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(reason, "scan");
    }
}
