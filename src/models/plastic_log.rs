use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::utils::ImpactEstimate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PlasticLog {
    pub id: i64,
    pub user_id: i64,
    pub item: String,
    pub quantity: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddLogRequest {
    #[schema(example = "bottle")]
    pub item: String,
    #[schema(example = 2)]
    pub quantity: Option<i64>,
}

/// Scan payload: either an explicit item/quantity, or a raw code that is
/// a `BIN:<id>` smart-bin reference or an opaque JSON `{item, quantity}`
/// string.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ScanRequest {
    #[schema(example = "BIN:BIN001")]
    pub code: Option<String>,
    pub item: Option<String>,
    pub quantity: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NudgeResponse {
    pub message: String,
    pub details: ImpactEstimate,
    pub items_count: i64,
    pub by_item: BTreeMap<String, i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub points: i64,
    pub quantity_today: i64,
    pub quantity_week: i64,
    pub last_logs: Vec<PlasticLog>,
    pub by_item: BTreeMap<String, i64>,
    pub nudge: NudgeResponse,
}
