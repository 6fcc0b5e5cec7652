use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;
use crate::utils::ImpactEstimate;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::register_vendor,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::me,
        handlers::auth::logout,
        handlers::plastic::logs,
        handlers::plastic::add,
        handlers::plastic::scan,
        handlers::dashboard::dashboard,
        handlers::rewards::list,
        handlers::rewards::redeem,
        handlers::teams::list,
        handlers::teams::create,
        handlers::teams::join,
        handlers::teams::leave,
        handlers::challenges::list,
        handlers::challenges::detail,
        handlers::challenges::join,
        handlers::community::stats,
        handlers::community::leaderboard,
        handlers::community::nudges,
        handlers::community::alternatives,
        handlers::admin::overview,
        handlers::admin::users,
        handlers::admin::user_detail,
        handlers::admin::vendors,
        handlers::admin::vendor_detail,
        handlers::admin::host_challenge,
    ),
    components(
        schemas(
            Role,
            User,
            UserResponse,
            RegisterRequest,
            RegisterVendorRequest,
            LoginRequest,
            AuthResponse,
            PlasticLog,
            AddLogRequest,
            ScanRequest,
            NudgeResponse,
            DashboardResponse,
            ImpactEstimate,
            PointsEntry,
            LeaderboardEntry,
            CommunityStats,
            Reward,
            Redemption,
            Vendor,
            AlternativeItem,
            VendorDetailResponse,
            Team,
            TeamScore,
            CreateTeamRequest,
            TeamMembershipRequest,
            TeamsResponse,
            Challenge,
            HostChallengeRequest,
            ChallengeDetailResponse,
            OverviewTotals,
            TrendPoint,
            AdminOverview,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and token refresh"),
        (name = "plastic", description = "Plastic usage logging and QR scans"),
        (name = "dashboard", description = "Personal dashboard"),
        (name = "rewards", description = "Reward catalogue and redemption"),
        (name = "teams", description = "Team membership and scores"),
        (name = "challenges", description = "Community challenges"),
        (name = "community", description = "Community stats, leaderboard and nudges"),
        (name = "admin", description = "Admin overview and management"),
    ),
    info(
        title = "ZeroPlast Backend API",
        version = "1.0.0",
        description = "Plastic usage tracking and points economy REST API"
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
