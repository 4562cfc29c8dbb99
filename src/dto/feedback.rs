use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::feedback::FeedbackCategories;
use crate::models::Feedback;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFeedbackRequest {
    pub workshop_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub categories: Option<FeedbackCategories>,
    pub is_anonymous: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedbackAuthor {
    pub full_name: String,
    pub profile_image: Option<String>,
}

/// Approved feedback as the public sees it. Anonymous entries carry no
/// author and the user id never appears in either case.
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicFeedback {
    pub id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub categories: Option<FeedbackCategories>,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
    pub author: Option<FeedbackAuthor>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PublicFeedbackList {
    pub items: Vec<PublicFeedback>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminFeedbackAuthor {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminFeedbackEntry {
    pub feedback: Feedback,
    pub author: Option<AdminFeedbackAuthor>,
    pub workshop_title: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminFeedbackList {
    pub items: Vec<AdminFeedbackEntry>,
}
