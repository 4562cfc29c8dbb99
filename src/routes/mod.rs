use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod doc;
pub mod feedback;
pub mod health;
pub mod params;
pub mod registrations;
pub mod workshops;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/workshops", workshops::router())
        .nest("/registrations", registrations::router())
        .nest("/feedback", feedback::router())
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
}
