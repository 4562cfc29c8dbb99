use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    audit::log_or_warn,
    db::DbPool,
    dto::auth::{Claims, LoginRequest, LoginResponse, SignupRequest, UpdateProfileRequest},
    error::{AppError, AppResult},
    models::User,
    response::ApiResponse,
};

/// User row with the hash, for verification only. Never serialized.
#[derive(sqlx::FromRow)]
struct Credentials {
    id: Uuid,
    role: String,
    is_active: bool,
    password_hash: String,
}

pub async fn signup(pool: &DbPool, payload: SignupRequest) -> AppResult<ApiResponse<User>> {
    let SignupRequest {
        full_name,
        email,
        password,
        phone,
    } = payload;

    let exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(pool)
        .await?;
    if exist.is_some() {
        return Err(AppError::BadRequest("Email is already registered".into()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let id = Uuid::new_v4();

    // The role column defaults to student; sign-up never sets it.
    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (id, full_name, email, password_hash, phone)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(full_name.as_str())
    .bind(email.as_str())
    .bind(password_hash)
    .bind(phone)
    .fetch_one(pool)
    .await?;

    log_or_warn(
        pool,
        Some(user.id),
        "user_signup",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::data(user))
}

pub async fn login(pool: &DbPool, payload: LoginRequest) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;

    let creds: Option<Credentials> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(pool)
        .await?;

    // Missing account and wrong password answer identically.
    let creds = match creds {
        Some(c) => c,
        None => return Err(AppError::BadRequest("Invalid email or password".into())),
    };

    let parsed_hash = PasswordHash::new(&creds.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest("Invalid email or password".into()));
    }

    if !creds.is_active {
        return Err(AppError::Forbidden);
    }

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: creds.id.to_string(),
        role: creds.role.clone(),
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    let user: User = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(creds.id)
        .fetch_one(pool)
        .await?;

    let resp = LoginResponse {
        token: format!("Bearer {}", token),
        user,
    };

    log_or_warn(
        pool,
        Some(creds.id),
        "user_login",
        "users",
        serde_json::json!({ "user_id": creds.id }),
    )
    .await;

    Ok(ApiResponse::data(resp))
}

pub async fn me(pool: &DbPool, user_id: Uuid) -> AppResult<ApiResponse<User>> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    match user {
        Some(u) => Ok(ApiResponse::data(u)),
        None => Err(AppError::NotFound("User")),
    }
}

pub async fn update_profile(
    pool: &DbPool,
    user_id: Uuid,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<User>> {
    let current: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    let current = match current {
        Some(u) => u,
        None => return Err(AppError::NotFound("User")),
    };

    let full_name = payload.full_name.unwrap_or(current.full_name);
    let phone = payload.phone.or(current.phone);
    let bio = payload.bio.or(current.bio);
    let profile_image = payload.profile_image.or(current.profile_image);

    let user: User = sqlx::query_as(
        r#"
        UPDATE users
        SET full_name = $2, phone = $3, bio = $4, profile_image = $5, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(full_name)
    .bind(phone)
    .bind(bio)
    .bind(profile_image)
    .fetch_one(pool)
    .await?;

    log_or_warn(
        pool,
        Some(user.id),
        "profile_update",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::data(user))
}
