use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::middlewares::current_user_id;
use crate::models::*;
use crate::services::PlasticService;

#[utoipa::path(
    get,
    path = "/api/plastic/logs",
    tag = "plastic",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logs for the current user, newest first", body = [PlasticLog]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn logs(
    plastic_service: web::Data<PlasticService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;

    match plastic_service.logs(user_id).await {
        Ok(logs) => Ok(HttpResponse::Ok().json(json!({
            "ok": true,
            "logs": logs
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/plastic/add",
    tag = "plastic",
    security(("bearer_auth" = [])),
    request_body = AddLogRequest,
    responses(
        (status = 201, description = "Log recorded, one point per item awarded"),
        (status = 400, description = "Missing item or non-positive quantity"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn add(
    plastic_service: web::Data<PlasticService>,
    req: HttpRequest,
    request: web::Json<AddLogRequest>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;
    let request = request.into_inner();
    let quantity = request.quantity.unwrap_or(1);

    match plastic_service
        .add_log(user_id, &request.item, quantity, "plastic_log")
        .await
    {
        Ok((log, points)) => Ok(HttpResponse::Created().json(json!({
            "ok": true,
            "log": {
                "id": log.id,
                "item": log.item,
                "quantity": log.quantity
            },
            "points": points
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/scan",
    tag = "plastic",
    security(("bearer_auth" = [])),
    request_body = ScanRequest,
    responses(
        (status = 201, description = "Scan recorded, one point per item awarded"),
        (status = 400, description = "Unresolvable code or non-positive quantity"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn scan(
    plastic_service: web::Data<PlasticService>,
    req: HttpRequest,
    request: web::Json<ScanRequest>,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;

    match plastic_service.scan(user_id, request.into_inner()).await {
        Ok((log, points)) => Ok(HttpResponse::Created().json(json!({
            "ok": true,
            "log": {
                "id": log.id,
                "item": log.item,
                "quantity": log.quantity
            },
            "points": points
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn plastic_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/plastic")
            .route("/logs", web::get().to(logs))
            .route("/add", web::post().to(add)),
    )
    .route("/api/scan", web::post().to(scan));
}
