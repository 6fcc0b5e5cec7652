use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::middlewares::current_user_id;
use crate::services::CommunityService;

#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Points balance, today/week totals, recent logs and a nudge", body = crate::models::DashboardResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn dashboard(
    community_service: web::Data<CommunityService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = current_user_id(&req)?;

    match community_service.dashboard(user_id).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({
            "ok": true,
            "data": data
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn dashboard_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(dashboard));
}
