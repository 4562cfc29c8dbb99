use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::workshops::Material;
use crate::models::Workshop;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateWorkshopRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub duration_hours: i32,
    pub max_participants: i32,
    #[serde(default)]
    pub price: i64,
    pub location: String,
    pub image: Option<String>,
    pub materials: Option<Vec<Material>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateWorkshopRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub duration_hours: Option<i32>,
    pub max_participants: Option<i32>,
    pub price: Option<i64>,
    pub location: Option<String>,
    pub image: Option<String>,
    pub materials: Option<Vec<Material>>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddReviewRequest {
    pub rating: i32,
    pub comment: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InstructorBrief {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InstructorDetail {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub bio: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewAuthor {
    pub id: Uuid,
    pub full_name: String,
    pub profile_image: Option<String>,
}

/// Embedded review with its author resolved. The author is absent when the
/// reviewing account no longer exists.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewEntry {
    pub author: Option<ReviewAuthor>,
    pub rating: i32,
    pub comment: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WorkshopWithInstructor {
    pub workshop: Workshop,
    pub instructor: Option<InstructorBrief>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WorkshopList {
    pub items: Vec<WorkshopWithInstructor>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WorkshopDetail {
    pub workshop: Workshop,
    pub instructor: Option<InstructorDetail>,
    pub reviews: Vec<ReviewEntry>,
}
