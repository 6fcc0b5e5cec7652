pub mod admin;
pub mod auth;
pub mod challenges;
pub mod community;
pub mod dashboard;
pub mod plastic;
pub mod rewards;
pub mod teams;

pub use admin::admin_config;
pub use auth::auth_config;
pub use challenges::challenges_config;
pub use community::community_config;
pub use dashboard::dashboard_config;
pub use plastic::plastic_config;
pub use rewards::rewards_config;
pub use teams::teams_config;
