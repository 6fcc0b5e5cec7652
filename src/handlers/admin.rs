use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::middlewares::current_user_id;
use crate::models::*;
use crate::services::{AdminService, ChallengeService};

#[utoipa::path(
    get,
    path = "/admin",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Totals, per-item breakdown, daily trend and recommendations", body = AdminOverview),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn overview(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;

    if let Err(e) = admin_service.ensure_admin(user_id).await {
        return Ok(e.error_response());
    }

    match admin_service.overview().await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({
            "ok": true,
            "data": data
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u32>, Query, description = "Page number, default 1"),
        ("per_page" = Option<u32>, Query, description = "Page size, default 20, max 100")
    ),
    responses(
        (status = 200, description = "Paginated users with points balances"),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn users(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;

    if let Err(e) = admin_service.ensure_admin(user_id).await {
        return Ok(e.error_response());
    }

    match admin_service.list_users(&query).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({
            "ok": true,
            "data": data
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/user/{user_id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("user_id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User with points balance", body = UserResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn user_detail(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;

    if let Err(e) = admin_service.ensure_admin(user_id).await {
        return Ok(e.error_response());
    }

    match admin_service.user_detail(path.into_inner()).await {
        Ok(user) => Ok(HttpResponse::Ok().json(json!({
            "ok": true,
            "user": user
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/vendors",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All vendors", body = [Vendor]),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn vendors(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;

    if let Err(e) = admin_service.ensure_admin(user_id).await {
        return Ok(e.error_response());
    }

    match admin_service.list_vendors().await {
        Ok(vendors) => Ok(HttpResponse::Ok().json(json!({
            "ok": true,
            "vendors": vendors
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/vendor/{vendor_id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("vendor_id" = i64, Path, description = "Vendor id")),
    responses(
        (status = 200, description = "Vendor with its alternative items", body = VendorDetailResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Unknown vendor")
    )
)]
pub async fn vendor_detail(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;

    if let Err(e) = admin_service.ensure_admin(user_id).await {
        return Ok(e.error_response());
    }

    match admin_service.vendor_detail(path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({
            "ok": true,
            "data": data
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/host-challenge",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = HostChallengeRequest,
    responses(
        (status = 200, description = "Challenge created", body = Challenge),
        (status = 400, description = "Missing name or bad date"),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn host_challenge(
    admin_service: web::Data<AdminService>,
    challenge_service: web::Data<ChallengeService>,
    req: HttpRequest,
    request: web::Json<HostChallengeRequest>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;

    if let Err(e) = admin_service.ensure_admin(user_id).await {
        return Ok(e.error_response());
    }

    match challenge_service.host(request.into_inner()).await {
        Ok(challenge) => Ok(HttpResponse::Ok().json(json!({
            "ok": true,
            "challenge": challenge
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("", web::get().to(overview))
            .route("/users", web::get().to(users))
            .route("/user/{user_id}", web::get().to(user_detail))
            .route("/vendors", web::get().to(vendors))
            .route("/vendor/{vendor_id}", web::get().to(vendor_detail))
            .route("/host-challenge", web::post().to(host_challenge)),
    );
}
