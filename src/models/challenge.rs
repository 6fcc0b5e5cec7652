use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::points_entry::LeaderboardEntry;
use super::team::TeamScore;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Challenge {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub points_bonus: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HostChallengeRequest {
    #[schema(example = "Plastic-Free Week")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "2025-09-01")]
    pub start_date: String,
    #[schema(example = "2025-09-07")]
    pub end_date: String,
    #[schema(example = 10)]
    pub points_bonus: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChallengeDetailResponse {
    pub challenge: Challenge,
    pub joined: bool,
    pub user_leaderboard: Vec<LeaderboardEntry>,
    pub team_leaderboard: Vec<TeamScore>,
}
