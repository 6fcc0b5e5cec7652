use serde::Serialize;
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::utils::ImpactEstimate;

#[derive(Debug, Serialize, ToSchema)]
pub struct OverviewTotals {
    pub logs: i64,
    pub users: i64,
    pub points: i64,
    pub items: i64,
}

/// One point of the daily quantity trend, date ascending.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct TrendPoint {
    pub date: String,
    pub quantity: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminOverview {
    pub totals: OverviewTotals,
    pub by_item: BTreeMap<String, i64>,
    pub impact: ImpactEstimate,
    pub trend: Vec<TrendPoint>,
    pub recommendations: Vec<String>,
}
