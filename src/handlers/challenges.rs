use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::middlewares::current_user_id;
use crate::services::ChallengeService;

#[utoipa::path(
    get,
    path = "/challenges",
    tag = "challenges",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All challenges, newest first", body = [crate::models::Challenge]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list(
    challenge_service: web::Data<ChallengeService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    current_user_id(&req)?;

    match challenge_service.list().await {
        Ok(challenges) => Ok(HttpResponse::Ok().json(json!({
            "ok": true,
            "challenges": challenges
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/challenges/{challenge_id}",
    tag = "challenges",
    security(("bearer_auth" = [])),
    params(("challenge_id" = i64, Path, description = "Challenge id")),
    responses(
        (status = 200, description = "Challenge with join state and leaderboards", body = crate::models::ChallengeDetailResponse),
        (status = 404, description = "Unknown challenge")
    )
)]
pub async fn detail(
    challenge_service: web::Data<ChallengeService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;

    match challenge_service.detail(path.into_inner(), user_id).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({
            "ok": true,
            "data": data
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/challenges/{challenge_id}/join",
    tag = "challenges",
    security(("bearer_auth" = [])),
    params(("challenge_id" = i64, Path, description = "Challenge id")),
    responses(
        (status = 200, description = "Joined"),
        (status = 404, description = "Unknown challenge"),
        (status = 409, description = "Already joined")
    )
)]
pub async fn join(
    challenge_service: web::Data<ChallengeService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;

    match challenge_service.join(path.into_inner(), user_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "ok": true,
            "message": "Joined challenge"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn challenges_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/challenges")
            .route("", web::get().to(list))
            .route("/{challenge_id}", web::get().to(detail))
            .route("/{challenge_id}/join", web::post().to(join)),
    );
}
