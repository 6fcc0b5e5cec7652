use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reward {
    pub id: i64,
    pub name: String,
    pub cost_points: i64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Redemption {
    pub id: i64,
    pub user_id: i64,
    pub reward_id: i64,
    pub created_at: NaiveDateTime,
}
