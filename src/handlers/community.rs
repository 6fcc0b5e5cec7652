use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde::Deserialize;
use serde_json::json;

use crate::middlewares::current_user_id;
use crate::services::{CommunityService, PointsService};
use crate::utils::alternatives_for;

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AlternativesQuery {
    pub item: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/community/stats",
    tag = "community",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Community-wide totals and estimated impact", body = crate::models::CommunityStats),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn stats(
    community_service: web::Data<CommunityService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    current_user_id(&req)?;

    match community_service.stats().await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({
            "ok": true,
            "data": data
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/community/leaderboard",
    tag = "community",
    security(("bearer_auth" = [])),
    params(("limit" = Option<i64>, Query, description = "Max entries, default 10")),
    responses(
        (status = 200, description = "Users ranked by points, ties broken by username"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn leaderboard(
    points_service: web::Data<PointsService>,
    req: HttpRequest,
    query: web::Query<LeaderboardQuery>,
) -> Result<HttpResponse> {
    current_user_id(&req)?;
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    match points_service.leaderboard(limit).await {
        Ok(entries) => Ok(HttpResponse::Ok().json(json!({
            "ok": true,
            "leaderboard": entries
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/nudges",
    tag = "community",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Personal nudge based on the caller's logged totals", body = crate::models::NudgeResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn nudges(
    community_service: web::Data<CommunityService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;

    match community_service.nudge(user_id).await {
        Ok(nudge) => Ok(HttpResponse::Ok().json(json!({
            "ok": true,
            "nudge": nudge
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/alternatives",
    tag = "community",
    security(("bearer_auth" = [])),
    params(("item" = Option<String>, Query, description = "Plastic item to suggest swaps for")),
    responses(
        (status = 200, description = "Reusable alternatives for the item"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn alternatives(
    req: HttpRequest,
    query: web::Query<AlternativesQuery>,
) -> Result<HttpResponse> {
    current_user_id(&req)?;
    let item = query.item.as_deref().unwrap_or("").trim().to_string();

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "item": item,
        "alternatives": alternatives_for(&item)
    })))
}

pub fn community_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/community")
            .route("/stats", web::get().to(stats))
            .route("/leaderboard", web::get().to(leaderboard)),
    )
    .route("/api/nudges", web::get().to(nudges))
    .route("/api/alternatives", web::get().to(alternatives));
}
