use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity;
use crate::entity::feedback::FeedbackCategories;
use crate::entity::workshops::Material;

pub const WORKSHOP_CATEGORIES: [&str; 5] = [
    "Technology",
    "Business",
    "Creative",
    "Personal Development",
    "Other",
];
pub const WORKSHOP_STATUSES: [&str; 4] = ["draft", "published", "completed", "cancelled"];
pub const REGISTRATION_STATUSES: [&str; 4] = ["registered", "attended", "completed", "cancelled"];
pub const PAYMENT_STATUSES: [&str; 3] = ["pending", "completed", "failed"];

/// User as the API exposes it. The password hash stays out of every
/// response; raw queries that load this ignore the extra column.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::users::Model> for User {
    fn from(model: entity::users::Model) -> Self {
        User {
            id: model.id,
            full_name: model.full_name,
            email: model.email,
            role: model.role,
            is_active: model.is_active,
            phone: model.phone,
            bio: model.bio,
            profile_image: model.profile_image,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

/// Workshop projection. Embedded reviews are not carried here; the detail
/// endpoint resolves them together with their authors.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Workshop {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub instructor_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub duration_hours: i32,
    pub max_participants: i32,
    pub current_participants: i32,
    pub price: i64,
    pub location: String,
    pub image: Option<String>,
    pub materials: Vec<Material>,
    pub status: String,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::workshops::Model> for Workshop {
    fn from(model: entity::workshops::Model) -> Self {
        Workshop {
            id: model.id,
            title: model.title,
            description: model.description,
            category: model.category,
            instructor_id: model.instructor_id,
            start_date: model.start_date.with_timezone(&Utc),
            end_date: model.end_date.with_timezone(&Utc),
            duration_hours: model.duration_hours,
            max_participants: model.max_participants,
            current_participants: model.current_participants,
            price: model.price,
            location: model.location,
            image: model.image,
            materials: model.materials.0,
            status: model.status,
            rating: model.rating,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Registration {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workshop_id: Uuid,
    pub status: String,
    pub payment_status: String,
    pub payment_amount: i64,
    pub certificate_url: Option<String>,
    pub attendance_record: bool,
    pub notes: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::registrations::Model> for Registration {
    fn from(model: entity::registrations::Model) -> Self {
        Registration {
            id: model.id,
            user_id: model.user_id,
            workshop_id: model.workshop_id,
            status: model.status,
            payment_status: model.payment_status,
            payment_amount: model.payment_amount,
            certificate_url: model.certificate_url,
            attendance_record: model.attendance_record,
            notes: model.notes,
            registered_at: model.registered_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Feedback {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workshop_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub categories: Option<FeedbackCategories>,
    pub is_anonymous: bool,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::feedback::Model> for Feedback {
    fn from(model: entity::feedback::Model) -> Self {
        Feedback {
            id: model.id,
            user_id: model.user_id,
            workshop_id: model.workshop_id,
            rating: model.rating,
            comment: model.comment,
            categories: model.categories,
            is_anonymous: model.is_anonymous,
            approved: model.approved,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
