use std::collections::HashMap;

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum_workshop_api::{config::AppConfig, db::create_pool};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let john = ensure_user(&pool, "John Doe", "john@example.com", "password123", "student").await?;
    let jane = ensure_user(
        &pool,
        "Jane Smith",
        "jane@example.com",
        "password123",
        "instructor",
    )
    .await?;
    ensure_user(
        &pool,
        "Admin User",
        "admin@example.com",
        "password123",
        "admin",
    )
    .await?;
    let mike = ensure_user(
        &pool,
        "Mike Johnson",
        "mike@example.com",
        "password123",
        "student",
    )
    .await?;

    seed_workshops(&pool, jane).await?;

    let react = workshop_id(&pool, "React Advanced Patterns").await?;
    let node = workshop_id(&pool, "Node.js Backend Development").await?;
    let strategy = workshop_id(&pool, "Business Strategy 2024").await?;

    ensure_registration(&pool, john, react, "registered", "completed", 9999, false).await?;
    ensure_registration(&pool, john, node, "registered", "completed", 8999, false).await?;
    ensure_registration(&pool, mike, react, "attended", "completed", 9999, true).await?;
    ensure_registration(&pool, mike, strategy, "registered", "pending", 14999, false).await?;

    ensure_feedback(
        &pool,
        mike,
        react,
        5,
        "Excellent course! Very informative and well-structured.",
        serde_json::json!({
            "content_quality": 5,
            "instructor_quality": 5,
            "course_organization": 4,
            "overall_experience": 5
        }),
        true,
    )
    .await?;
    ensure_feedback(
        &pool,
        john,
        node,
        4,
        "Great content, could use more practical examples.",
        serde_json::json!({
            "content_quality": 4,
            "instructor_quality": 4,
            "course_organization": 4,
            "overall_experience": 4
        }),
        true,
    )
    .await?;
    ensure_feedback(
        &pool,
        mike,
        strategy,
        3,
        "Good workshop, but needs better time management.",
        serde_json::json!({
            "content_quality": 3,
            "instructor_quality": 3,
            "course_organization": 2,
            "overall_experience": 3
        }),
        false,
    )
    .await?;

    sync_workshop_stats(&pool).await?;

    println!("Seed completed");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    full_name: &str,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    // DO UPDATE so RETURNING always yields the id, new row or old.
    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, full_name, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(full_name)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_workshops(pool: &sqlx::PgPool, instructor_id: Uuid) -> anyhow::Result<()> {
    let workshops: Vec<(&str, &str, &str, &str, &str, i32, i32, i64, &str)> = vec![
        (
            "React Advanced Patterns",
            "Learn advanced patterns and best practices in React development",
            "Technology",
            "2024-12-15T00:00:00Z",
            "2024-12-20T00:00:00Z",
            40,
            30,
            9999,
            "Online",
        ),
        (
            "Node.js Backend Development",
            "Master backend development with Node.js and Express",
            "Technology",
            "2024-12-22T00:00:00Z",
            "2024-12-27T00:00:00Z",
            35,
            25,
            8999,
            "Online",
        ),
        (
            "Business Strategy 2024",
            "Essential strategies for business growth and success",
            "Business",
            "2025-01-05T00:00:00Z",
            "2025-01-10T00:00:00Z",
            20,
            50,
            14999,
            "In-Person",
        ),
        (
            "Digital Marketing Fundamentals",
            "Learn the basics of digital marketing and SEO",
            "Business",
            "2025-01-12T00:00:00Z",
            "2025-01-17T00:00:00Z",
            25,
            40,
            7999,
            "Hybrid",
        ),
        (
            "Creative Writing Workshop",
            "Develop your creative writing skills with professional writers",
            "Creative",
            "2025-01-20T00:00:00Z",
            "2025-01-25T00:00:00Z",
            15,
            20,
            5999,
            "Online",
        ),
    ];

    for (title, description, category, start, end, duration, max, price, location) in workshops {
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM workshops WHERE title = $1")
            .bind(title)
            .fetch_optional(pool)
            .await?;
        if exists.is_some() {
            continue;
        }

        sqlx::query(
            r#"
            INSERT INTO workshops
                (id, title, description, category, instructor_id, start_date, end_date,
                 duration_hours, max_participants, price, location, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'published')
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(description)
        .bind(category)
        .bind(instructor_id)
        .bind(start.parse::<DateTime<Utc>>()?)
        .bind(end.parse::<DateTime<Utc>>()?)
        .bind(duration)
        .bind(max)
        .bind(price)
        .bind(location)
        .execute(pool)
        .await?;
    }

    println!("Seeded workshops");
    Ok(())
}

async fn workshop_id(pool: &sqlx::PgPool, title: &str) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as("SELECT id FROM workshops WHERE title = $1")
        .bind(title)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

async fn ensure_registration(
    pool: &sqlx::PgPool,
    user_id: Uuid,
    workshop_id: Uuid,
    status: &str,
    payment_status: &str,
    payment_amount: i64,
    attended: bool,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO registrations
            (id, user_id, workshop_id, status, payment_status, payment_amount, attendance_record)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (user_id, workshop_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(workshop_id)
    .bind(status)
    .bind(payment_status)
    .bind(payment_amount)
    .bind(attended)
    .execute(pool)
    .await?;
    Ok(())
}

async fn ensure_feedback(
    pool: &sqlx::PgPool,
    user_id: Uuid,
    workshop_id: Uuid,
    rating: i32,
    comment: &str,
    categories: serde_json::Value,
    approved: bool,
) -> anyhow::Result<()> {
    let exists: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM feedback WHERE user_id = $1 AND workshop_id = $2")
            .bind(user_id)
            .bind(workshop_id)
            .fetch_optional(pool)
            .await?;
    if exists.is_some() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO feedback (id, user_id, workshop_id, rating, comment, categories, approved)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(workshop_id)
    .bind(rating)
    .bind(comment)
    .bind(categories)
    .bind(approved)
    .execute(pool)
    .await?;
    Ok(())
}

/// Bring occupancy, embedded reviews and the mean rating in line with the
/// seeded registrations and feedback, the same shape the API maintains.
async fn sync_workshop_stats(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE workshops w
        SET current_participants = (
            SELECT COUNT(*) FROM registrations r
            WHERE r.workshop_id = w.id AND r.status <> 'cancelled'
        )
        "#,
    )
    .execute(pool)
    .await?;

    let rows: Vec<(Uuid, Uuid, i32, String, DateTime<Utc>)> = sqlx::query_as(
        "SELECT workshop_id, user_id, rating, comment, created_at FROM feedback ORDER BY created_at ASC",
    )
    .fetch_all(pool)
    .await?;

    let mut by_workshop: HashMap<Uuid, Vec<serde_json::Value>> = HashMap::new();
    for (workshop_id, user_id, rating, comment, created_at) in rows {
        by_workshop
            .entry(workshop_id)
            .or_default()
            .push(serde_json::json!({
                "user_id": user_id,
                "rating": rating,
                "comment": comment,
                "date": created_at,
            }));
    }

    for (workshop_id, reviews) in by_workshop {
        let total: i64 = reviews
            .iter()
            .filter_map(|r| r.get("rating").and_then(|v| v.as_i64()))
            .sum();
        let rating = total as f64 / reviews.len() as f64;

        sqlx::query("UPDATE workshops SET reviews = $2, rating = $3 WHERE id = $1")
            .bind(workshop_id)
            .bind(serde_json::Value::Array(reviews))
            .bind(rating)
            .execute(pool)
            .await?;
    }

    println!("Synced workshop stats");
    Ok(())
}
