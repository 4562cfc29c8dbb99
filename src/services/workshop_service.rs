use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::entity::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_or_warn,
    dto::workshops::{
        AddReviewRequest, CreateWorkshopRequest, InstructorBrief, InstructorDetail, ReviewAuthor,
        ReviewEntry, UpdateWorkshopRequest, WorkshopDetail, WorkshopList, WorkshopWithInstructor,
    },
    entity::{
        users::{Column as UserCol, Entity as Users},
        workshops::{
            ActiveModel as WorkshopActive, Column, Entity as Workshops, Materials,
            Model as WorkshopModel, Review, Reviews,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{self, Workshop},
    policy::{Action, Scope, ensure},
    response::ApiResponse,
    routes::params::WorkshopListQuery,
    state::AppState,
};

pub async fn list(
    state: &AppState,
    query: WorkshopListQuery,
) -> AppResult<ApiResponse<WorkshopList>> {
    let mut condition = Condition::all();

    if let Some(category) = query.category.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Column::Category.eq(category.clone()));
    }

    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Column::Status.eq(status.clone()));
    }

    if let Some(search) = query.search.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Title).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    let rows = Workshops::find()
        .filter(condition)
        .find_also_related(Users)
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?;

    let items: Vec<WorkshopWithInstructor> = rows
        .into_iter()
        .map(|(workshop, instructor)| WorkshopWithInstructor {
            workshop: workshop.into(),
            instructor: instructor.map(|u| InstructorBrief {
                id: u.id,
                full_name: u.full_name,
                email: u.email,
            }),
        })
        .collect();

    let count = items.len() as i64;
    Ok(ApiResponse::list(WorkshopList { items }, count))
}

pub async fn get(state: &AppState, id: Uuid) -> AppResult<ApiResponse<WorkshopDetail>> {
    let workshop = Workshops::find_by_id(id).one(&state.orm).await?;
    let workshop = match workshop {
        Some(w) => w,
        None => return Err(AppError::NotFound("Workshop")),
    };

    let detail = load_detail(state, workshop).await?;
    Ok(ApiResponse::data(detail))
}

pub async fn create(
    state: &AppState,
    user: &AuthUser,
    payload: CreateWorkshopRequest,
) -> AppResult<ApiResponse<Workshop>> {
    ensure(user, Action::CreateWorkshop, Scope::Any)?;

    validate_category(&payload.category)?;
    validate_schedule(
        payload.start_date.into(),
        payload.end_date.into(),
        payload.duration_hours,
    )?;
    validate_capacity(payload.max_participants, 0)?;
    validate_price(payload.price)?;

    let workshop = WorkshopActive {
        id: Set(Uuid::new_v4()),
        title: Set(payload.title),
        description: Set(payload.description),
        category: Set(payload.category),
        instructor_id: Set(user.user_id),
        start_date: Set(payload.start_date.into()),
        end_date: Set(payload.end_date.into()),
        duration_hours: Set(payload.duration_hours),
        max_participants: Set(payload.max_participants),
        current_participants: Set(0),
        price: Set(payload.price),
        location: Set(payload.location),
        image: Set(payload.image),
        materials: Set(Materials(payload.materials.unwrap_or_default())),
        status: Set("draft".into()),
        rating: Set(0.0),
        reviews: Set(Reviews::default()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    log_or_warn(
        &state.pool,
        Some(user.user_id),
        "workshop_create",
        "workshops",
        serde_json::json!({ "workshop_id": workshop.id }),
    )
    .await;

    Ok(ApiResponse::data(workshop.into()))
}

/// Partial update with validation re-run on the merged values. The row is
/// locked so capacity edits cannot race a concurrent registration.
pub async fn update(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateWorkshopRequest,
) -> AppResult<ApiResponse<Workshop>> {
    let txn = state.orm.begin().await?;

    let workshop = Workshops::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let workshop = match workshop {
        Some(w) => w,
        None => return Err(AppError::NotFound("Workshop")),
    };

    ensure(user, Action::EditWorkshop, Scope::Owned(workshop.instructor_id))?;

    let category = payload.category.unwrap_or_else(|| workshop.category.clone());
    let start_date = payload
        .start_date
        .map(Into::into)
        .unwrap_or(workshop.start_date);
    let end_date = payload.end_date.map(Into::into).unwrap_or(workshop.end_date);
    let duration_hours = payload.duration_hours.unwrap_or(workshop.duration_hours);
    let max_participants = payload.max_participants.unwrap_or(workshop.max_participants);
    let price = payload.price.unwrap_or(workshop.price);
    let status = payload.status.unwrap_or_else(|| workshop.status.clone());
    let occupancy = workshop.current_participants;

    validate_category(&category)?;
    validate_status(&status)?;
    validate_schedule(start_date, end_date, duration_hours)?;
    validate_capacity(max_participants, occupancy)?;
    validate_price(price)?;

    let mut active: WorkshopActive = workshop.into();
    if let Some(title) = payload.title {
        active.title = Set(title);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(location) = payload.location {
        active.location = Set(location);
    }
    if let Some(image) = payload.image {
        active.image = Set(Some(image));
    }
    if let Some(materials) = payload.materials {
        active.materials = Set(Materials(materials));
    }
    active.category = Set(category);
    active.start_date = Set(start_date);
    active.end_date = Set(end_date);
    active.duration_hours = Set(duration_hours);
    active.max_participants = Set(max_participants);
    active.price = Set(price);
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let workshop = active.update(&txn).await?;

    txn.commit().await?;

    log_or_warn(
        &state.pool,
        Some(user.user_id),
        "workshop_update",
        "workshops",
        serde_json::json!({ "workshop_id": workshop.id }),
    )
    .await;

    Ok(ApiResponse::data(workshop.into()))
}

pub async fn delete(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let workshop = Workshops::find_by_id(id).one(&state.orm).await?;
    let workshop = match workshop {
        Some(w) => w,
        None => return Err(AppError::NotFound("Workshop")),
    };

    ensure(user, Action::EditWorkshop, Scope::Owned(workshop.instructor_id))?;

    Workshops::delete_by_id(id).exec(&state.orm).await?;

    log_or_warn(
        &state.pool,
        Some(user.user_id),
        "workshop_delete",
        "workshops",
        serde_json::json!({ "workshop_id": id }),
    )
    .await;

    Ok(ApiResponse::message("Workshop deleted"))
}

/// Append an embedded review and recompute the workshop rating as the mean
/// of all embedded reviews. This list is independent of the moderated
/// feedback channel and has no per-user uniqueness rule.
pub async fn add_review(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: AddReviewRequest,
) -> AppResult<ApiResponse<WorkshopDetail>> {
    ensure(user, Action::ReviewWorkshop, Scope::Any)?;

    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::BadRequest("Rating must be between 1 and 5".into()));
    }

    let txn = state.orm.begin().await?;

    let workshop = Workshops::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let workshop = match workshop {
        Some(w) => w,
        None => return Err(AppError::NotFound("Workshop")),
    };

    let mut reviews = workshop.reviews.clone();
    reviews.0.push(Review {
        user_id: user.user_id,
        rating: payload.rating,
        comment: payload.comment,
        date: Utc::now(),
    });
    let rating = reviews.0.iter().map(|r| r.rating as f64).sum::<f64>() / reviews.0.len() as f64;

    let mut active: WorkshopActive = workshop.into();
    active.reviews = Set(reviews);
    active.rating = Set(rating);
    active.updated_at = Set(Utc::now().into());
    let workshop = active.update(&txn).await?;

    txn.commit().await?;

    log_or_warn(
        &state.pool,
        Some(user.user_id),
        "review_add",
        "workshops",
        serde_json::json!({ "workshop_id": workshop.id, "rating": payload.rating }),
    )
    .await;

    let detail = load_detail(state, workshop).await?;
    Ok(ApiResponse::data(detail))
}

/// Resolve the instructor and the embedded review authors for the detail
/// view. Authors that no longer exist resolve to nothing, mirroring the
/// dangling references the embedded list can hold.
async fn load_detail(state: &AppState, workshop: WorkshopModel) -> AppResult<WorkshopDetail> {
    let instructor = Users::find_by_id(workshop.instructor_id)
        .one(&state.orm)
        .await?
        .map(|u| InstructorDetail {
            id: u.id,
            full_name: u.full_name,
            email: u.email,
            bio: u.bio,
        });

    let reviews = workshop.reviews.0.clone();
    let author_ids: Vec<Uuid> = reviews.iter().map(|r| r.user_id).collect();
    let authors: HashMap<Uuid, ReviewAuthor> = if author_ids.is_empty() {
        HashMap::new()
    } else {
        Users::find()
            .filter(UserCol::Id.is_in(author_ids))
            .all(&state.orm)
            .await?
            .into_iter()
            .map(|u| {
                (
                    u.id,
                    ReviewAuthor {
                        id: u.id,
                        full_name: u.full_name,
                        profile_image: u.profile_image,
                    },
                )
            })
            .collect()
    };

    let reviews = reviews
        .into_iter()
        .map(|r| ReviewEntry {
            author: authors.get(&r.user_id).map(|a| ReviewAuthor {
                id: a.id,
                full_name: a.full_name.clone(),
                profile_image: a.profile_image.clone(),
            }),
            rating: r.rating,
            comment: r.comment,
            date: r.date,
        })
        .collect();

    Ok(WorkshopDetail {
        workshop: workshop.into(),
        instructor,
        reviews,
    })
}

fn validate_category(category: &str) -> Result<(), AppError> {
    if models::WORKSHOP_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid workshop category".into()))
    }
}

fn validate_status(status: &str) -> Result<(), AppError> {
    if models::WORKSHOP_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid workshop status".into()))
    }
}

fn validate_schedule(
    start_date: DateTimeWithTimeZone,
    end_date: DateTimeWithTimeZone,
    duration_hours: i32,
) -> Result<(), AppError> {
    if end_date <= start_date {
        return Err(AppError::BadRequest(
            "end_date must be after start_date".into(),
        ));
    }
    if duration_hours < 1 {
        return Err(AppError::BadRequest(
            "duration_hours must be at least 1".into(),
        ));
    }
    Ok(())
}

fn validate_capacity(max_participants: i32, occupancy: i32) -> Result<(), AppError> {
    if max_participants < 1 {
        return Err(AppError::BadRequest(
            "max_participants must be at least 1".into(),
        ));
    }
    if max_participants < occupancy {
        return Err(AppError::BadRequest(
            "max_participants cannot be below current participants".into(),
        ));
    }
    Ok(())
}

fn validate_price(price: i64) -> Result<(), AppError> {
    if price < 0 {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    Ok(())
}
