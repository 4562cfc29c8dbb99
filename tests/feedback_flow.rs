mod common;

use axum_workshop_api::{
    dto::feedback::CreateFeedbackRequest,
    entity::feedback::FeedbackCategories,
    error::AppError,
    middleware::auth::AuthUser,
    policy::Role,
    services::feedback_service,
};
use uuid::Uuid;

fn feedback_payload(workshop_id: Uuid, rating: i32) -> CreateFeedbackRequest {
    CreateFeedbackRequest {
        workshop_id,
        rating,
        comment: "Thoughtful remarks".into(),
        categories: None,
        is_anonymous: None,
    }
}

// Submissions start hidden, approval makes them public, anonymity hides the
// author, and only owners or admins can delete.
#[tokio::test]
async fn moderation_and_visibility_flow() -> anyhow::Result<()> {
    let state = match common::try_state().await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let instructor_id =
        common::create_user(&state, "instructor", &common::unique_email("fb-instructor")).await?;
    let workshop_id = common::create_workshop(&state, instructor_id, "Feedback Target", 10).await?;

    let carol_id = common::create_user(&state, "student", &common::unique_email("fb-carol")).await?;
    let dave_id = common::create_user(&state, "student", &common::unique_email("fb-dave")).await?;
    let admin_id = common::create_user(&state, "admin", &common::unique_email("fb-admin")).await?;
    let carol = AuthUser {
        user_id: carol_id,
        role: Role::Student,
    };
    let dave = AuthUser {
        user_id: dave_id,
        role: Role::Student,
    };
    let admin = AuthUser {
        user_id: admin_id,
        role: Role::Admin,
    };

    let submitted = feedback_service::create(&state, &carol, feedback_payload(workshop_id, 5))
        .await?
        .data
        .unwrap();
    assert!(!submitted.approved);

    // Unapproved entries are invisible to the public.
    let public = feedback_service::workshop_feedback(&state, workshop_id).await?;
    assert_eq!(public.count, Some(0));

    let denied_queue = feedback_service::all_feedback(&state, &carol)
        .await
        .expect_err("the moderation queue is admin only");
    assert!(matches!(denied_queue, AppError::Forbidden));

    let queue = feedback_service::all_feedback(&state, &admin).await?;
    let queue = queue.data.unwrap().items;
    let queued = queue
        .iter()
        .find(|entry| entry.feedback.id == submitted.id)
        .expect("submission reaches the queue");
    assert!(!queued.feedback.approved);
    assert_eq!(queued.author.as_ref().map(|a| a.id), Some(carol_id));
    assert_eq!(queued.workshop_title.as_deref(), Some("Feedback Target"));

    let denied_approve = feedback_service::approve(&state, &carol, submitted.id)
        .await
        .expect_err("students cannot approve");
    assert!(matches!(denied_approve, AppError::Forbidden));

    let approved = feedback_service::approve(&state, &admin, submitted.id).await?;
    assert!(approved.data.unwrap().approved);

    let public = feedback_service::workshop_feedback(&state, workshop_id).await?;
    let public = public.data.unwrap().items;
    assert_eq!(public.len(), 1);
    assert!(public[0].author.is_some());

    // Anonymous feedback keeps its author hidden even once approved.
    let anonymous = feedback_service::create(
        &state,
        &dave,
        CreateFeedbackRequest {
            workshop_id,
            rating: 4,
            comment: "Prefer to stay unnamed".into(),
            categories: None,
            is_anonymous: Some(true),
        },
    )
    .await?
    .data
    .unwrap();
    feedback_service::approve(&state, &admin, anonymous.id).await?;
    // Approving twice is a harmless repeat.
    feedback_service::approve(&state, &admin, anonymous.id).await?;

    let public = feedback_service::workshop_feedback(&state, workshop_id).await?;
    let public = public.data.unwrap().items;
    assert_eq!(public.len(), 2);
    let hidden = public
        .iter()
        .find(|f| f.id == anonymous.id)
        .expect("anonymous entry is public once approved");
    assert!(hidden.is_anonymous);
    assert!(hidden.author.is_none());

    let foreign_delete = feedback_service::delete(&state, &dave, submitted.id)
        .await
        .expect_err("only the owner deletes");
    assert!(matches!(foreign_delete, AppError::Forbidden));

    feedback_service::delete(&state, &carol, submitted.id).await?;
    let public = feedback_service::workshop_feedback(&state, workshop_id).await?;
    assert_eq!(public.count, Some(1));

    // Admins can delete anyone's entry.
    feedback_service::delete(&state, &admin, anonymous.id).await?;
    let public = feedback_service::workshop_feedback(&state, workshop_id).await?;
    assert_eq!(public.count, Some(0));

    Ok(())
}

#[tokio::test]
async fn submissions_are_validated() -> anyhow::Result<()> {
    let state = match common::try_state().await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let instructor_id =
        common::create_user(&state, "instructor", &common::unique_email("fbv-instructor")).await?;
    let workshop_id =
        common::create_workshop(&state, instructor_id, "Validation Target", 10).await?;
    let student_id =
        common::create_user(&state, "student", &common::unique_email("fbv-student")).await?;
    let student = AuthUser {
        user_id: student_id,
        role: Role::Student,
    };

    let out_of_range = feedback_service::create(&state, &student, feedback_payload(workshop_id, 0))
        .await
        .expect_err("rating below 1 must be rejected");
    assert!(matches!(out_of_range, AppError::BadRequest(_)));

    let bad_category = feedback_service::create(
        &state,
        &student,
        CreateFeedbackRequest {
            workshop_id,
            rating: 4,
            comment: "Category score is off".into(),
            categories: Some(FeedbackCategories {
                content_quality: Some(4),
                instructor_quality: None,
                course_organization: Some(9),
                overall_experience: None,
            }),
            is_anonymous: None,
        },
    )
    .await
    .expect_err("category scores outside 1-5 must be rejected");
    match bad_category {
        AppError::BadRequest(message) => {
            assert!(message.contains("course_organization"))
        }
        other => panic!("expected BadRequest, got {other:?}"),
    }

    let missing = feedback_service::create(&state, &student, feedback_payload(Uuid::new_v4(), 4))
        .await
        .expect_err("unknown workshop is 404");
    assert!(matches!(missing, AppError::NotFound(_)));

    let missing_approve = feedback_service::approve(
        &state,
        &AuthUser {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
        },
        Uuid::new_v4(),
    )
    .await
    .expect_err("unknown feedback is 404");
    assert!(matches!(missing_approve, AppError::NotFound(_)));

    Ok(())
}
