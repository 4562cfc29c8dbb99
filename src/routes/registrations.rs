use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::registrations::{
        RegisterRequest, RegistrationList, RosterList, UpdateRegistrationStatusRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Registration,
    response::ApiResponse,
    services::registration_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(register))
        .route("/user", get(my_registrations))
        .route("/workshop/{id}", get(workshop_roster))
        .route("/{id}", delete(cancel_registration))
        .route("/{id}/status", put(update_registration_status))
}

#[utoipa::path(
    post,
    path = "/api/registrations",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = ApiResponse<Registration>),
        (status = 404, description = "Workshop not found"),
        (status = 409, description = "Already registered or workshop full"),
    ),
    security(("bearer_auth" = [])),
    tag = "Registrations"
)]
pub async fn register(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Registration>>)> {
    let resp = registration_service::register(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/registrations/user",
    responses(
        (status = 200, description = "Caller's registrations with their workshops", body = ApiResponse<RegistrationList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Registrations"
)]
pub async fn my_registrations(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<RegistrationList>>> {
    let resp = registration_service::list_for_user(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/registrations/workshop/{id}",
    params(("id" = Uuid, Path, description = "Workshop ID")),
    responses(
        (status = 200, description = "Roster with attendee details", body = ApiResponse<RosterList>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Registrations"
)]
pub async fn workshop_roster(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<RosterList>>> {
    let resp = registration_service::list_for_workshop(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/registrations/{id}",
    params(("id" = Uuid, Path, description = "Registration ID")),
    responses(
        (status = 200, description = "Registration cancelled, seat released"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Registrations"
)]
pub async fn cancel_registration(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = registration_service::cancel(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/registrations/{id}/status",
    params(("id" = Uuid, Path, description = "Registration ID")),
    request_body = UpdateRegistrationStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<Registration>),
        (status = 400, description = "Invalid status"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Registrations"
)]
pub async fn update_registration_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRegistrationStatusRequest>,
) -> AppResult<Json<ApiResponse<Registration>>> {
    let resp = registration_service::update_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
