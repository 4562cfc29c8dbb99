mod common;

use axum_workshop_api::{
    dto::workshops::{AddReviewRequest, CreateWorkshopRequest, UpdateWorkshopRequest},
    error::AppError,
    middleware::auth::AuthUser,
    policy::Role,
    routes::params::WorkshopListQuery,
    services::workshop_service,
};
use chrono::{Duration, Utc};
use uuid::Uuid;

fn create_payload(title: &str) -> CreateWorkshopRequest {
    CreateWorkshopRequest {
        title: title.into(),
        description: "Hands-on session".into(),
        category: "Technology".into(),
        start_date: Utc::now() + Duration::days(7),
        end_date: Utc::now() + Duration::days(9),
        duration_hours: 8,
        max_participants: 10,
        price: 4999,
        location: "Online".into(),
        image: None,
        materials: None,
    }
}

#[tokio::test]
async fn create_update_delete_flow() -> anyhow::Result<()> {
    let state = match common::try_state().await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let instructor_id =
        common::create_user(&state, "instructor", &common::unique_email("ws-instructor")).await?;
    let rival_id =
        common::create_user(&state, "instructor", &common::unique_email("ws-rival")).await?;
    let student_id =
        common::create_user(&state, "student", &common::unique_email("ws-student")).await?;

    let instructor = AuthUser {
        user_id: instructor_id,
        role: Role::Instructor,
    };
    let rival = AuthUser {
        user_id: rival_id,
        role: Role::Instructor,
    };
    let student = AuthUser {
        user_id: student_id,
        role: Role::Student,
    };
    let admin = AuthUser {
        user_id: Uuid::new_v4(),
        role: Role::Admin,
    };

    let denied = workshop_service::create(&state, &student, create_payload("Student Workshop"))
        .await
        .expect_err("students cannot create workshops");
    assert!(matches!(denied, AppError::Forbidden));

    let bad_category = {
        let mut payload = create_payload("Bad Category");
        payload.category = "Cooking".into();
        workshop_service::create(&state, &instructor, payload)
            .await
            .expect_err("unknown category must be rejected")
    };
    assert!(matches!(bad_category, AppError::BadRequest(_)));

    let bad_dates = {
        let mut payload = create_payload("Bad Dates");
        payload.end_date = payload.start_date - Duration::days(1);
        workshop_service::create(&state, &instructor, payload)
            .await
            .expect_err("end before start must be rejected")
    };
    assert!(matches!(bad_dates, AppError::BadRequest(_)));

    let created = workshop_service::create(&state, &instructor, create_payload("Ownership Flow"))
        .await?
        .data
        .unwrap();
    assert_eq!(created.status, "draft");
    assert_eq!(created.current_participants, 0);
    assert_eq!(created.instructor_id, instructor_id);

    let foreign_edit = workshop_service::update(
        &state,
        &rival,
        created.id,
        UpdateWorkshopRequest {
            title: Some("Hijacked".into()),
            description: None,
            category: None,
            start_date: None,
            end_date: None,
            duration_hours: None,
            max_participants: None,
            price: None,
            location: None,
            image: None,
            materials: None,
            status: None,
        },
    )
    .await
    .expect_err("other instructors cannot edit");
    assert!(matches!(foreign_edit, AppError::Forbidden));

    let published = workshop_service::update(
        &state,
        &instructor,
        created.id,
        UpdateWorkshopRequest {
            title: Some("Ownership Flow v2".into()),
            description: None,
            category: None,
            start_date: None,
            end_date: None,
            duration_hours: None,
            max_participants: None,
            price: None,
            location: None,
            image: None,
            materials: None,
            status: Some("published".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(published.title, "Ownership Flow v2");
    assert_eq!(published.status, "published");

    let bad_status = workshop_service::update(
        &state,
        &instructor,
        created.id,
        UpdateWorkshopRequest {
            title: None,
            description: None,
            category: None,
            start_date: None,
            end_date: None,
            duration_hours: None,
            max_participants: None,
            price: None,
            location: None,
            image: None,
            materials: None,
            status: Some("archived".into()),
        },
    )
    .await
    .expect_err("unknown status must be rejected");
    assert!(matches!(bad_status, AppError::BadRequest(_)));

    let bad_capacity = workshop_service::update(
        &state,
        &instructor,
        created.id,
        UpdateWorkshopRequest {
            title: None,
            description: None,
            category: None,
            start_date: None,
            end_date: None,
            duration_hours: None,
            max_participants: Some(0),
            price: None,
            location: None,
            image: None,
            materials: None,
            status: None,
        },
    )
    .await
    .expect_err("capacity below one must be rejected");
    assert!(matches!(bad_capacity, AppError::BadRequest(_)));

    // Admins can edit anyone's workshop.
    let admin_edit = workshop_service::update(
        &state,
        &admin,
        created.id,
        UpdateWorkshopRequest {
            title: None,
            description: Some("Admin touched this".into()),
            category: None,
            start_date: None,
            end_date: None,
            duration_hours: None,
            max_participants: None,
            price: None,
            location: None,
            image: None,
            materials: None,
            status: None,
        },
    )
    .await?;
    assert_eq!(admin_edit.data.unwrap().description, "Admin touched this");

    let foreign_delete = workshop_service::delete(&state, &rival, created.id)
        .await
        .expect_err("other instructors cannot delete");
    assert!(matches!(foreign_delete, AppError::Forbidden));

    let deleted = workshop_service::delete(&state, &instructor, created.id).await?;
    assert!(deleted.success);

    let gone = workshop_service::get(&state, created.id)
        .await
        .expect_err("deleted workshop is gone");
    assert!(matches!(gone, AppError::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn listing_filters_and_search() -> anyhow::Result<()> {
    let state = match common::try_state().await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let instructor_id =
        common::create_user(&state, "instructor", &common::unique_email("list-instructor")).await?;
    let marker = Uuid::new_v4().simple().to_string();

    let tech_id = common::create_workshop(
        &state,
        instructor_id,
        &format!("Rust Deep Dive {}", marker),
        10,
    )
    .await?;
    let second_id = common::create_workshop(
        &state,
        instructor_id,
        &format!("Another Session {}", marker),
        10,
    )
    .await?;

    // Search is case-insensitive over title and description.
    let found = workshop_service::list(
        &state,
        WorkshopListQuery {
            category: None,
            status: None,
            search: Some(marker.to_uppercase()),
        },
    )
    .await?;
    let found = found.data.unwrap().items;
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|w| {
        w.workshop.id == tech_id || w.workshop.id == second_id
    }));
    let instructor = found[0].instructor.as_ref().expect("instructor resolved");
    assert_eq!(instructor.id, instructor_id);

    let published_only = workshop_service::list(
        &state,
        WorkshopListQuery {
            category: Some("Technology".into()),
            status: Some("published".into()),
            search: Some(marker.clone()),
        },
    )
    .await?;
    assert_eq!(published_only.count, Some(2));

    let nothing = workshop_service::list(
        &state,
        WorkshopListQuery {
            category: Some("Creative".into()),
            status: None,
            search: Some(marker),
        },
    )
    .await?;
    assert_eq!(nothing.count, Some(0));

    Ok(())
}

#[tokio::test]
async fn reviews_recompute_the_mean_rating() -> anyhow::Result<()> {
    let state = match common::try_state().await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let instructor_id =
        common::create_user(&state, "instructor", &common::unique_email("rev-instructor")).await?;
    let workshop_id = common::create_workshop(&state, instructor_id, "Review Target", 10).await?;

    let first_id = common::create_user(&state, "student", &common::unique_email("rev-a")).await?;
    let second_id = common::create_user(&state, "student", &common::unique_email("rev-b")).await?;
    let first = AuthUser {
        user_id: first_id,
        role: Role::Student,
    };
    let second = AuthUser {
        user_id: second_id,
        role: Role::Student,
    };

    let out_of_range = workshop_service::add_review(
        &state,
        &first,
        workshop_id,
        AddReviewRequest {
            rating: 6,
            comment: "Too good".into(),
        },
    )
    .await
    .expect_err("rating above 5 must be rejected");
    assert!(matches!(out_of_range, AppError::BadRequest(_)));

    workshop_service::add_review(
        &state,
        &first,
        workshop_id,
        AddReviewRequest {
            rating: 5,
            comment: "Loved it".into(),
        },
    )
    .await?;

    let detail = workshop_service::add_review(
        &state,
        &second,
        workshop_id,
        AddReviewRequest {
            rating: 4,
            comment: "Solid".into(),
        },
    )
    .await?
    .data
    .unwrap();

    assert_eq!(detail.workshop.rating, 4.5);
    assert_eq!(detail.reviews.len(), 2);
    assert!(
        detail
            .reviews
            .iter()
            .all(|r| r.author.is_some() && (1..=5).contains(&r.rating))
    );

    let missing = workshop_service::add_review(
        &state,
        &first,
        Uuid::new_v4(),
        AddReviewRequest {
            rating: 3,
            comment: "Where is it".into(),
        },
    )
    .await
    .expect_err("unknown workshop is 404");
    assert!(matches!(missing, AppError::NotFound(_)));

    Ok(())
}
