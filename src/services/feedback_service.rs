use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_or_warn,
    dto::feedback::{
        AdminFeedbackAuthor, AdminFeedbackEntry, AdminFeedbackList, CreateFeedbackRequest,
        FeedbackAuthor, PublicFeedback, PublicFeedbackList,
    },
    entity::{
        feedback::{ActiveModel as FeedbackActive, Column, Entity as Feedback, FeedbackCategories},
        users::{Column as UserCol, Entity as Users},
        workshops::{Column as WorkshopCol, Entity as Workshops},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models,
    policy::{Action, Scope, ensure},
    response::ApiResponse,
    state::AppState,
};

/// Submit feedback for a workshop. New entries always start unapproved and
/// stay invisible to the public until a moderator approves them.
pub async fn create(
    state: &AppState,
    user: &AuthUser,
    payload: CreateFeedbackRequest,
) -> AppResult<ApiResponse<models::Feedback>> {
    ensure(user, Action::SubmitFeedback, Scope::Any)?;

    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::BadRequest("Rating must be between 1 and 5".into()));
    }
    if let Some(categories) = payload.categories.as_ref() {
        validate_categories(categories)?;
    }

    let workshop = Workshops::find_by_id(payload.workshop_id)
        .one(&state.orm)
        .await?;
    if workshop.is_none() {
        return Err(AppError::NotFound("Workshop"));
    }

    let feedback = FeedbackActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        workshop_id: Set(payload.workshop_id),
        rating: Set(payload.rating),
        comment: Set(payload.comment),
        categories: Set(payload.categories),
        is_anonymous: Set(payload.is_anonymous.unwrap_or(false)),
        approved: Set(false),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    log_or_warn(
        &state.pool,
        Some(user.user_id),
        "feedback_create",
        "feedback",
        serde_json::json!({ "feedback_id": feedback.id, "workshop_id": feedback.workshop_id }),
    )
    .await;

    Ok(ApiResponse::data(feedback.into()))
}

/// Approved feedback for one workshop, as the public sees it. Anonymous
/// entries come back without an author and the submitter id is never
/// exposed either way.
pub async fn workshop_feedback(
    state: &AppState,
    workshop_id: Uuid,
) -> AppResult<ApiResponse<PublicFeedbackList>> {
    let workshop = Workshops::find_by_id(workshop_id).one(&state.orm).await?;
    if workshop.is_none() {
        return Err(AppError::NotFound("Workshop"));
    }

    let rows = Feedback::find()
        .filter(
            Condition::all()
                .add(Column::WorkshopId.eq(workshop_id))
                .add(Column::Approved.eq(true)),
        )
        .find_also_related(Users)
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?;

    let items: Vec<PublicFeedback> = rows
        .into_iter()
        .map(|(feedback, author)| {
            let author = if feedback.is_anonymous {
                None
            } else {
                author.map(|u| FeedbackAuthor {
                    full_name: u.full_name,
                    profile_image: u.profile_image,
                })
            };
            PublicFeedback {
                id: feedback.id,
                rating: feedback.rating,
                comment: feedback.comment,
                categories: feedback.categories,
                is_anonymous: feedback.is_anonymous,
                created_at: feedback.created_at.with_timezone(&Utc),
                author,
            }
        })
        .collect();

    let count = items.len() as i64;
    Ok(ApiResponse::list(PublicFeedbackList { items }, count))
}

/// The moderation queue: every entry regardless of approval state, with
/// submitter and workshop resolved.
pub async fn all_feedback(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AdminFeedbackList>> {
    ensure(user, Action::ViewAllFeedback, Scope::Any)?;

    let rows = Feedback::find()
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?;

    let user_ids: Vec<Uuid> = rows.iter().map(|f| f.user_id).collect();
    let workshop_ids: Vec<Uuid> = rows.iter().map(|f| f.workshop_id).collect();

    let authors: HashMap<Uuid, AdminFeedbackAuthor> = if user_ids.is_empty() {
        HashMap::new()
    } else {
        Users::find()
            .filter(UserCol::Id.is_in(user_ids))
            .all(&state.orm)
            .await?
            .into_iter()
            .map(|u| {
                (
                    u.id,
                    AdminFeedbackAuthor {
                        id: u.id,
                        full_name: u.full_name,
                        email: u.email,
                    },
                )
            })
            .collect()
    };

    let titles: HashMap<Uuid, String> = if workshop_ids.is_empty() {
        HashMap::new()
    } else {
        Workshops::find()
            .filter(WorkshopCol::Id.is_in(workshop_ids))
            .all(&state.orm)
            .await?
            .into_iter()
            .map(|w| (w.id, w.title))
            .collect()
    };

    let items: Vec<AdminFeedbackEntry> = rows
        .into_iter()
        .map(|feedback| AdminFeedbackEntry {
            author: authors.get(&feedback.user_id).map(|a| AdminFeedbackAuthor {
                id: a.id,
                full_name: a.full_name.clone(),
                email: a.email.clone(),
            }),
            workshop_title: titles.get(&feedback.workshop_id).cloned(),
            feedback: feedback.into(),
        })
        .collect();

    let count = items.len() as i64;
    Ok(ApiResponse::list(AdminFeedbackList { items }, count))
}

/// Approve a feedback entry. Approving an already-approved entry is a no-op
/// that still succeeds.
pub async fn approve(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<models::Feedback>> {
    ensure(user, Action::ModerateFeedback, Scope::Any)?;

    let feedback = Feedback::find_by_id(id).one(&state.orm).await?;
    let feedback = match feedback {
        Some(f) => f,
        None => return Err(AppError::NotFound("Feedback")),
    };

    let mut active: FeedbackActive = feedback.into();
    active.approved = Set(true);
    active.updated_at = Set(Utc::now().into());
    let feedback = active.update(&state.orm).await?;

    log_or_warn(
        &state.pool,
        Some(user.user_id),
        "feedback_approve",
        "feedback",
        serde_json::json!({ "feedback_id": feedback.id }),
    )
    .await;

    Ok(ApiResponse::data(feedback.into()))
}

pub async fn delete(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let feedback = Feedback::find_by_id(id).one(&state.orm).await?;
    let feedback = match feedback {
        Some(f) => f,
        None => return Err(AppError::NotFound("Feedback")),
    };

    ensure(user, Action::DeleteFeedback, Scope::Owned(feedback.user_id))?;

    Feedback::delete_by_id(id).exec(&state.orm).await?;

    log_or_warn(
        &state.pool,
        Some(user.user_id),
        "feedback_delete",
        "feedback",
        serde_json::json!({ "feedback_id": id }),
    )
    .await;

    Ok(ApiResponse::message("Feedback deleted"))
}

fn validate_categories(categories: &FeedbackCategories) -> Result<(), AppError> {
    let fields = [
        ("content_quality", categories.content_quality),
        ("instructor_quality", categories.instructor_quality),
        ("course_organization", categories.course_organization),
        ("overall_experience", categories.overall_experience),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            if !(1..=5).contains(&value) {
                return Err(AppError::BadRequest(format!(
                    "{} must be between 1 and 5",
                    name
                )));
            }
        }
    }
    Ok(())
}
