pub mod admin_service;
pub mod auth_service;
pub mod challenge_service;
pub mod community_service;
pub mod plastic_service;
pub mod points_service;
pub mod rewards_service;
pub mod team_service;

pub use admin_service::*;
pub use auth_service::*;
pub use challenge_service::*;
pub use community_service::*;
pub use plastic_service::*;
pub use points_service::*;
pub use rewards_service::*;
pub use team_service::*;
