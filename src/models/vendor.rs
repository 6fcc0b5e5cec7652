use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Vendor {
    pub id: i64,
    pub name: String,
    pub discount: i64,
    pub description: String,
}

/// Eco-friendly replacement product a vendor offers for a plastic item.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AlternativeItem {
    pub id: i64,
    pub for_item_key: String,
    pub name: String,
    pub description: String,
    pub vendor_id: Option<i64>,
    pub estimated_cost: Option<i64>,
    pub co2_saving_kg: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VendorDetailResponse {
    pub vendor: Vendor,
    pub alternatives: Vec<AlternativeItem>,
}
