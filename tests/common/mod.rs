#![allow(dead_code)]

use std::sync::Once;

use axum_workshop_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    entity::{
        users::ActiveModel as UserActive,
        workshops::{ActiveModel as WorkshopActive, Materials, Reviews},
    },
    state::AppState,
};
use chrono::{Duration, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

static INIT: Once = Once::new();

/// Build state from the environment, or `None` to skip when no database is
/// configured. Token issuance needs a signing secret, so one is defaulted in
/// before any test body runs.
pub async fn try_state() -> anyhow::Result<Option<AppState>> {
    INIT.call_once(|| {
        if std::env::var("JWT_SECRET").is_err() {
            unsafe { std::env::set_var("JWT_SECRET", "integration-test-secret") };
        }
    });

    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
                );
                return Ok(None);
            }
        };

    let pool = create_pool(&database_url).await?;
    run_migrations(&pool).await?;
    let orm = create_orm_conn(&database_url).await?;

    Ok(Some(AppState { pool, orm }))
}

/// Emails carry a fresh uuid so concurrently running tests never collide on
/// the unique index.
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4().simple())
}

pub async fn create_user(state: &AppState, role: &str, email: &str) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        full_name: Set(format!("Test {}", role)),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        role: Set(role.into()),
        is_active: Set(true),
        phone: Set(None),
        bio: Set(None),
        profile_image: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

pub async fn create_workshop(
    state: &AppState,
    instructor_id: Uuid,
    title: &str,
    max_participants: i32,
) -> anyhow::Result<Uuid> {
    let workshop = WorkshopActive {
        id: Set(Uuid::new_v4()),
        title: Set(title.to_string()),
        description: Set("A workshop for testing".into()),
        category: Set("Technology".into()),
        instructor_id: Set(instructor_id),
        start_date: Set((Utc::now() + Duration::days(7)).into()),
        end_date: Set((Utc::now() + Duration::days(9)).into()),
        duration_hours: Set(8),
        max_participants: Set(max_participants),
        current_participants: Set(0),
        price: Set(9999),
        location: Set("Online".into()),
        image: Set(None),
        materials: Set(Materials::default()),
        status: Set("published".into()),
        rating: Set(0.0),
        reviews: Set(Reviews::default()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(workshop.id)
}
