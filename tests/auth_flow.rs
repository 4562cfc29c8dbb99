mod common;

use axum_workshop_api::{
    dto::auth::{LoginRequest, SignupRequest, UpdateProfileRequest},
    entity::users::{ActiveModel as UserActive, Entity as Users},
    error::AppError,
    services::auth_service,
};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

// Sign up, fail on duplicate email, log in, read and update the profile,
// then get locked out after deactivation.
#[tokio::test]
async fn signup_login_and_profile_flow() -> anyhow::Result<()> {
    let state = match common::try_state().await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let email = common::unique_email("signup");

    let signup = auth_service::signup(
        &state.pool,
        SignupRequest {
            full_name: "Ada Lovelace".into(),
            email: email.clone(),
            password: "password123".into(),
            phone: Some("555-0100".into()),
        },
    )
    .await?;
    let created = signup.data.unwrap();
    assert_eq!(created.role, "student");
    assert_eq!(created.email, email);

    let duplicate = auth_service::signup(
        &state.pool,
        SignupRequest {
            full_name: "Ada Again".into(),
            email: email.clone(),
            password: "password456".into(),
            phone: None,
        },
    )
    .await
    .expect_err("duplicate email must be rejected");
    assert!(matches!(duplicate, AppError::BadRequest(_)));

    let login = auth_service::login(
        &state.pool,
        LoginRequest {
            email: email.clone(),
            password: "password123".into(),
        },
    )
    .await?;
    let login = login.data.unwrap();
    assert!(login.token.starts_with("Bearer "));
    assert_eq!(login.user.id, created.id);

    let bad_password = auth_service::login(
        &state.pool,
        LoginRequest {
            email: email.clone(),
            password: "wrong".into(),
        },
    )
    .await
    .expect_err("wrong password must be rejected");
    assert!(matches!(bad_password, AppError::BadRequest(_)));

    let me = auth_service::me(&state.pool, created.id).await?;
    assert_eq!(me.data.unwrap().full_name, "Ada Lovelace");

    let updated = auth_service::update_profile(
        &state.pool,
        created.id,
        UpdateProfileRequest {
            full_name: Some("Ada King".into()),
            phone: None,
            bio: Some("Mathematician".into()),
            profile_image: None,
        },
    )
    .await?;
    let updated = updated.data.unwrap();
    assert_eq!(updated.full_name, "Ada King");
    assert_eq!(updated.bio.as_deref(), Some("Mathematician"));
    // Fields that were not supplied keep their previous values.
    assert_eq!(updated.phone.as_deref(), Some("555-0100"));

    let account = Users::find_by_id(created.id)
        .one(&state.orm)
        .await?
        .expect("account exists");
    let mut active: UserActive = account.into();
    active.is_active = Set(false);
    active.update(&state.orm).await?;

    let locked_out = auth_service::login(
        &state.pool,
        LoginRequest {
            email,
            password: "password123".into(),
        },
    )
    .await
    .expect_err("deactivated accounts cannot log in");
    assert!(matches!(locked_out, AppError::Forbidden));

    Ok(())
}

#[tokio::test]
async fn login_with_unknown_email_is_rejected() -> anyhow::Result<()> {
    let state = match common::try_state().await? {
        Some(state) => state,
        None => return Ok(()),
    };

    let err = auth_service::login(
        &state.pool,
        LoginRequest {
            email: common::unique_email("ghost"),
            password: "password123".into(),
        },
    )
    .await
    .expect_err("unknown email must be rejected");
    assert!(matches!(err, AppError::BadRequest(_)));

    Ok(())
}
