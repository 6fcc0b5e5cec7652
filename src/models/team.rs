use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Team {
    pub id: i64,
    pub name: String,
}

/// Team with the summed balance of its members.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TeamScore {
    pub id: i64,
    pub name: String,
    pub points: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateTeamRequest {
    #[schema(example = "Green Hostel")]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TeamMembershipRequest {
    pub team_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeamsResponse {
    pub teams: Vec<TeamScore>,
    pub joined_team: Option<Team>,
}
