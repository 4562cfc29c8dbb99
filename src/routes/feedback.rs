use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::feedback::{AdminFeedbackList, CreateFeedbackRequest, PublicFeedbackList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Feedback,
    response::ApiResponse,
    services::feedback_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_feedback))
        .route("/workshop/{id}", get(workshop_feedback))
        .route("/admin/all", get(all_feedback))
        .route("/{id}/approve", put(approve_feedback))
        .route("/{id}", delete(delete_feedback))
}

#[utoipa::path(
    post,
    path = "/api/feedback",
    request_body = CreateFeedbackRequest,
    responses(
        (status = 201, description = "Feedback submitted for moderation", body = ApiResponse<Feedback>),
        (status = 400, description = "Rating out of range"),
        (status = 404, description = "Workshop not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Feedback"
)]
pub async fn submit_feedback(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateFeedbackRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Feedback>>)> {
    let resp = feedback_service::create(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/feedback/workshop/{id}",
    params(("id" = Uuid, Path, description = "Workshop ID")),
    responses(
        (status = 200, description = "Approved feedback for the workshop", body = ApiResponse<PublicFeedbackList>),
        (status = 404, description = "Workshop not found"),
    ),
    tag = "Feedback"
)]
pub async fn workshop_feedback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PublicFeedbackList>>> {
    let resp = feedback_service::workshop_feedback(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/feedback/admin/all",
    responses(
        (status = 200, description = "Moderation queue (admin only)", body = ApiResponse<AdminFeedbackList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Feedback"
)]
pub async fn all_feedback(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AdminFeedbackList>>> {
    let resp = feedback_service::all_feedback(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/feedback/{id}/approve",
    params(("id" = Uuid, Path, description = "Feedback ID")),
    responses(
        (status = 200, description = "Feedback approved", body = ApiResponse<Feedback>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Feedback"
)]
pub async fn approve_feedback(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Feedback>>> {
    let resp = feedback_service::approve(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/feedback/{id}",
    params(("id" = Uuid, Path, description = "Feedback ID")),
    responses(
        (status = 200, description = "Feedback deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Feedback"
)]
pub async fn delete_feedback(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = feedback_service::delete(&state, &user, id).await?;
    Ok(Json(resp))
}
