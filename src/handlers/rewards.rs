use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::middlewares::current_user_id;
use crate::services::{PointsService, RewardsService};

#[utoipa::path(
    get,
    path = "/rewards",
    tag = "rewards",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Catalogue ordered by cost plus the caller's balance", body = [crate::models::Reward]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list(
    rewards_service: web::Data<RewardsService>,
    points_service: web::Data<PointsService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;

    let rewards = match rewards_service.list().await {
        Ok(rewards) => rewards,
        Err(e) => return Ok(e.error_response()),
    };

    match points_service.balance(user_id).await {
        Ok(points) => Ok(HttpResponse::Ok().json(json!({
            "ok": true,
            "rewards": rewards,
            "points": points
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/rewards/redeem/{reward_id}",
    tag = "rewards",
    security(("bearer_auth" = [])),
    params(("reward_id" = i64, Path, description = "Reward id")),
    responses(
        (status = 200, description = "Redeemed; returns the remaining balance"),
        (status = 400, description = "Not enough points"),
        (status = 404, description = "Unknown reward")
    )
)]
pub async fn redeem(
    rewards_service: web::Data<RewardsService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    let reward_id = path.into_inner();

    match rewards_service.redeem(user_id, reward_id).await {
        Ok(points) => Ok(HttpResponse::Ok().json(json!({
            "ok": true,
            "points": points
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn rewards_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/rewards")
            .route("", web::get().to(list))
            .route("/redeem/{reward_id}", web::post().to(redeem)),
    );
}
