use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::User;

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct RoleCount {
    pub role: String,
    pub count: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct RecentRegistration {
    pub id: Uuid,
    pub status: String,
    pub registered_at: DateTime<Utc>,
    pub user_full_name: String,
    pub user_email: String,
    pub workshop_title: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_workshops: i64,
    pub total_registrations: i64,
    pub total_feedback: i64,
    pub users_by_role: Vec<RoleCount>,
    pub workshops_by_category: Vec<CategoryCount>,
    pub recent_registrations: Vec<RecentRegistration>,
}

/// One calendar day of the registration trend, `day` as `YYYY-MM-DD`.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct TrendPoint {
    pub day: String,
    pub count: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct RatingCount {
    pub rating: i32,
    pub count: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct TopWorkshop {
    pub id: Uuid,
    pub title: String,
    pub current_participants: i32,
    pub max_participants: i32,
    pub rating: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Analytics {
    pub registration_trend: Vec<TrendPoint>,
    pub feedback_stats: Vec<RatingCount>,
    pub top_workshops: Vec<TopWorkshop>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserStatusRequest {
    pub is_active: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRoleRequest {
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserList {
    pub items: Vec<User>,
}
