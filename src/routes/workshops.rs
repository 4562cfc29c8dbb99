use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::workshops::{
        AddReviewRequest, CreateWorkshopRequest, UpdateWorkshopRequest, WorkshopDetail,
        WorkshopList,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Workshop,
    response::ApiResponse,
    routes::params::WorkshopListQuery,
    services::workshop_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_workshops).post(create_workshop))
        .route(
            "/{id}",
            get(get_workshop)
                .put(update_workshop)
                .delete(delete_workshop),
        )
        .route("/{id}/reviews", post(add_review))
}

#[utoipa::path(
    get,
    path = "/api/workshops",
    params(
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("search" = Option<String>, Query, description = "Case-insensitive match on title or description"),
    ),
    responses(
        (status = 200, description = "List workshops", body = ApiResponse<WorkshopList>),
    ),
    tag = "Workshops"
)]
pub async fn list_workshops(
    State(state): State<AppState>,
    Query(query): Query<WorkshopListQuery>,
) -> AppResult<Json<ApiResponse<WorkshopList>>> {
    let resp = workshop_service::list(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/workshops/{id}",
    params(("id" = Uuid, Path, description = "Workshop ID")),
    responses(
        (status = 200, description = "Workshop with instructor and reviews", body = ApiResponse<WorkshopDetail>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Workshops"
)]
pub async fn get_workshop(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<WorkshopDetail>>> {
    let resp = workshop_service::get(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/workshops",
    request_body = CreateWorkshopRequest,
    responses(
        (status = 201, description = "Workshop created as draft", body = ApiResponse<Workshop>),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Workshops"
)]
pub async fn create_workshop(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateWorkshopRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Workshop>>)> {
    let resp = workshop_service::create(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/workshops/{id}",
    params(("id" = Uuid, Path, description = "Workshop ID")),
    request_body = UpdateWorkshopRequest,
    responses(
        (status = 200, description = "Workshop updated", body = ApiResponse<Workshop>),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Workshops"
)]
pub async fn update_workshop(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateWorkshopRequest>,
) -> AppResult<Json<ApiResponse<Workshop>>> {
    let resp = workshop_service::update(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/workshops/{id}",
    params(("id" = Uuid, Path, description = "Workshop ID")),
    responses(
        (status = 200, description = "Workshop deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Workshops"
)]
pub async fn delete_workshop(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = workshop_service::delete(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/workshops/{id}/reviews",
    params(("id" = Uuid, Path, description = "Workshop ID")),
    request_body = AddReviewRequest,
    responses(
        (status = 200, description = "Review added, rating recomputed", body = ApiResponse<WorkshopDetail>),
        (status = 400, description = "Rating out of range"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Workshops"
)]
pub async fn add_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddReviewRequest>,
) -> AppResult<Json<ApiResponse<WorkshopDetail>>> {
    let resp = workshop_service::add_review(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
