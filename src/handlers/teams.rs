use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::middlewares::current_user_id;
use crate::models::*;
use crate::services::TeamService;

#[utoipa::path(
    get,
    path = "/teams",
    tag = "teams",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All teams with aggregate points and the caller's team", body = TeamsResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list(team_service: web::Data<TeamService>, req: HttpRequest) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;

    match team_service.list(user_id).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({
            "ok": true,
            "data": data
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/teams/create",
    tag = "teams",
    security(("bearer_auth" = [])),
    request_body = CreateTeamRequest,
    responses(
        (status = 200, description = "Team created", body = Team),
        (status = 400, description = "Missing name"),
        (status = 409, description = "Team name already taken")
    )
)]
pub async fn create(
    team_service: web::Data<TeamService>,
    req: HttpRequest,
    request: web::Json<CreateTeamRequest>,
) -> Result<HttpResponse> {
    current_user_id(&req)?;

    match team_service.create(&request.name).await {
        Ok(team) => Ok(HttpResponse::Ok().json(json!({
            "ok": true,
            "team": team
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/teams/join",
    tag = "teams",
    security(("bearer_auth" = [])),
    request_body = TeamMembershipRequest,
    responses(
        (status = 200, description = "Joined"),
        (status = 404, description = "Unknown team"),
        (status = 409, description = "Already a member of a team")
    )
)]
pub async fn join(
    team_service: web::Data<TeamService>,
    req: HttpRequest,
    request: web::Json<TeamMembershipRequest>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;

    match team_service.join(user_id, request.team_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "ok": true,
            "message": "Joined team"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/teams/leave",
    tag = "teams",
    security(("bearer_auth" = [])),
    request_body = TeamMembershipRequest,
    responses(
        (status = 200, description = "Left"),
        (status = 404, description = "Not a member of that team")
    )
)]
pub async fn leave(
    team_service: web::Data<TeamService>,
    req: HttpRequest,
    request: web::Json<TeamMembershipRequest>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;

    match team_service.leave(user_id, request.team_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "ok": true,
            "message": "Left team"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn teams_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/teams")
            .route("", web::get().to(list))
            .route("/create", web::post().to(create))
            .route("/join", web::post().to(join))
            .route("/leave", web::post().to(leave)),
    );
}
