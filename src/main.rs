use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local;
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use zeroplast_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().expect("Failed to load configuration");

    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    let auth_service = AuthService::new(pool.clone(), jwt_service.clone());
    let plastic_service = PlasticService::new(pool.clone());
    let points_service = PointsService::new(pool.clone());
    let rewards_service = RewardsService::new(pool.clone());
    let team_service = TeamService::new(pool.clone());
    let challenge_service = ChallengeService::new(pool.clone());
    let community_service = CommunityService::new(pool.clone());
    let admin_service = AdminService::new(pool.clone());

    auth_service
        .seed_admin(&config.admin)
        .await
        .expect("Failed to seed admin account");

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(plastic_service.clone()))
            .app_data(web::Data::new(points_service.clone()))
            .app_data(web::Data::new(rewards_service.clone()))
            .app_data(web::Data::new(team_service.clone()))
            .app_data(web::Data::new(challenge_service.clone()))
            .app_data(web::Data::new(community_service.clone()))
            .app_data(web::Data::new(admin_service.clone()))
            .configure(swagger_config)
            .configure(handlers::auth_config)
            .configure(handlers::plastic_config)
            .configure(handlers::dashboard_config)
            .configure(handlers::rewards_config)
            .configure(handlers::teams_config)
            .configure(handlers::challenges_config)
            .configure(handlers::community_config)
            .configure(handlers::admin_config)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
