use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_or_warn,
    dto::admin::{
        Analytics, CategoryCount, DashboardStats, RatingCount, RecentRegistration, RoleCount,
        TopWorkshop, TrendPoint, UpdateUserRoleRequest, UpdateUserStatusRequest, UserList,
    },
    entity::users::{ActiveModel as UserActive, Column, Entity as Users},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    policy::{self, Action, Scope, ensure},
    response::ApiResponse,
    routes::params::UserListQuery,
    state::AppState,
};

/// Headline totals plus role, category and recent-activity breakdowns.
/// Aggregations go through raw SQL; the ORM adds nothing over a GROUP BY.
pub async fn dashboard(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<DashboardStats>> {
    ensure(user, Action::ViewReports, Scope::Any)?;

    let (total_users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&state.pool)
        .await?;
    let (total_workshops,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM workshops")
        .fetch_one(&state.pool)
        .await?;
    let (total_registrations,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM registrations")
        .fetch_one(&state.pool)
        .await?;
    let (total_feedback,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM feedback")
        .fetch_one(&state.pool)
        .await?;

    let users_by_role: Vec<RoleCount> =
        sqlx::query_as("SELECT role, COUNT(*) AS count FROM users GROUP BY role ORDER BY role")
            .fetch_all(&state.pool)
            .await?;

    let workshops_by_category: Vec<CategoryCount> = sqlx::query_as(
        "SELECT category, COUNT(*) AS count FROM workshops GROUP BY category ORDER BY category",
    )
    .fetch_all(&state.pool)
    .await?;

    let recent_registrations: Vec<RecentRegistration> = sqlx::query_as(
        r#"
        SELECT r.id, r.status, r.registered_at,
               u.full_name AS user_full_name, u.email AS user_email,
               w.title AS workshop_title
        FROM registrations r
        JOIN users u ON u.id = r.user_id
        JOIN workshops w ON w.id = r.workshop_id
        ORDER BY r.registered_at DESC
        LIMIT 10
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    let stats = DashboardStats {
        total_users,
        total_workshops,
        total_registrations,
        total_feedback,
        users_by_role,
        workshops_by_category,
        recent_registrations,
    };
    Ok(ApiResponse::data(stats))
}

pub async fn analytics(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Analytics>> {
    ensure(user, Action::ViewReports, Scope::Any)?;

    let registration_trend: Vec<TrendPoint> = sqlx::query_as(
        r#"
        SELECT to_char(registered_at, 'YYYY-MM-DD') AS day, COUNT(*) AS count
        FROM registrations
        GROUP BY day
        ORDER BY day ASC
        LIMIT 30
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    let feedback_stats: Vec<RatingCount> = sqlx::query_as(
        "SELECT rating, COUNT(*) AS count FROM feedback GROUP BY rating ORDER BY rating ASC",
    )
    .fetch_all(&state.pool)
    .await?;

    let top_workshops: Vec<TopWorkshop> = sqlx::query_as(
        r#"
        SELECT id, title, current_participants, max_participants, rating
        FROM workshops
        ORDER BY current_participants DESC, rating DESC
        LIMIT 5
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    let data = Analytics {
        registration_trend,
        feedback_stats,
        top_workshops,
    };
    Ok(ApiResponse::data(data))
}

pub async fn list_users(
    state: &AppState,
    user: &AuthUser,
    query: UserListQuery,
) -> AppResult<ApiResponse<UserList>> {
    ensure(user, Action::ManageUsers, Scope::Any)?;

    let mut condition = Condition::all();
    if let Some(role) = query.role.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Column::Role.eq(role.clone()));
    }
    if let Some(search) = query.search.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::FullName).ilike(pattern.clone()))
                .add(Expr::col(Column::Email).ilike(pattern)),
        );
    }

    let items: Vec<User> = Users::find()
        .filter(condition)
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    let count = items.len() as i64;
    Ok(ApiResponse::list(UserList { items }, count))
}

pub async fn update_user_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateUserStatusRequest,
) -> AppResult<ApiResponse<User>> {
    ensure(user, Action::ManageUsers, Scope::Any)?;

    let target = Users::find_by_id(id).one(&state.orm).await?;
    let target = match target {
        Some(u) => u,
        None => return Err(AppError::NotFound("User")),
    };

    let mut active: UserActive = target.into();
    active.is_active = Set(payload.is_active);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    log_or_warn(
        &state.pool,
        Some(user.user_id),
        "user_status_update",
        "users",
        serde_json::json!({ "target_id": updated.id, "is_active": updated.is_active }),
    )
    .await;

    Ok(ApiResponse::data(updated.into()))
}

pub async fn update_user_role(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateUserRoleRequest,
) -> AppResult<ApiResponse<User>> {
    ensure(user, Action::ManageUsers, Scope::Any)?;

    if !policy::ROLES.contains(&payload.role.as_str()) {
        return Err(AppError::BadRequest("Invalid role".into()));
    }

    let target = Users::find_by_id(id).one(&state.orm).await?;
    let target = match target {
        Some(u) => u,
        None => return Err(AppError::NotFound("User")),
    };

    let mut active: UserActive = target.into();
    active.role = Set(payload.role);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    log_or_warn(
        &state.pool,
        Some(user.user_id),
        "user_role_update",
        "users",
        serde_json::json!({ "target_id": updated.id, "role": updated.role }),
    )
    .await;

    Ok(ApiResponse::data(updated.into()))
}

/// Remove an account. Registrations and feedback go with it; audit entries
/// survive with their user reference cleared.
pub async fn delete_user(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure(user, Action::ManageUsers, Scope::Any)?;

    let result = Users::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("User"));
    }

    log_or_warn(
        &state.pool,
        Some(user.user_id),
        "user_delete",
        "users",
        serde_json::json!({ "target_id": id }),
    )
    .await;

    Ok(ApiResponse::message("User deleted"))
}
