use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::utils::ImpactEstimate;

/// One signed ledger entry. Rows are only ever appended; a user's balance
/// is the sum of their deltas.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PointsEntry {
    pub id: i64,
    pub user_id: i64,
    pub delta: i64,
    pub reason: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaderboardEntry {
    pub username: String,
    pub points: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommunityStats {
    pub total_items: i64,
    pub total_logs: i64,
    pub total_users: i64,
    pub total_points: i64,
    pub by_item: BTreeMap<String, i64>,
    pub impact: ImpactEstimate,
}
