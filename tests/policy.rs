use axum_workshop_api::{
    error::AppError,
    middleware::auth::AuthUser,
    policy::{Action, Role, Scope, ensure},
};
use uuid::Uuid;

fn actor(role: Role) -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        role,
    }
}

#[test]
fn workshop_creation_is_for_instructors() {
    assert!(ensure(&actor(Role::Instructor), Action::CreateWorkshop, Scope::Any).is_ok());
    assert!(ensure(&actor(Role::Admin), Action::CreateWorkshop, Scope::Any).is_ok());

    let err = ensure(&actor(Role::Student), Action::CreateWorkshop, Scope::Any)
        .expect_err("students cannot create workshops");
    assert!(matches!(err, AppError::Forbidden));
}

#[test]
fn workshop_editing_requires_ownership() {
    let instructor = actor(Role::Instructor);

    assert!(ensure(&instructor, Action::EditWorkshop, Scope::Owned(instructor.user_id)).is_ok());
    assert!(ensure(&instructor, Action::EditWorkshop, Scope::Owned(Uuid::new_v4())).is_err());

    // Admins bypass ownership entirely.
    assert!(
        ensure(
            &actor(Role::Admin),
            Action::EditWorkshop,
            Scope::Owned(Uuid::new_v4())
        )
        .is_ok()
    );
}

#[test]
fn roster_visibility_matches_editing() {
    let instructor = actor(Role::Instructor);
    let student = actor(Role::Student);

    assert!(
        ensure(
            &instructor,
            Action::ViewWorkshopRoster,
            Scope::Owned(instructor.user_id)
        )
        .is_ok()
    );
    assert!(
        ensure(
            &instructor,
            Action::ViewWorkshopRoster,
            Scope::Owned(Uuid::new_v4())
        )
        .is_err()
    );
    assert!(ensure(&student, Action::ViewWorkshopRoster, Scope::Owned(student.user_id)).is_err());
}

#[test]
fn registration_status_is_instructor_territory() {
    assert!(ensure(&actor(Role::Instructor), Action::SetRegistrationStatus, Scope::Any).is_ok());
    assert!(ensure(&actor(Role::Admin), Action::SetRegistrationStatus, Scope::Any).is_ok());
    assert!(ensure(&actor(Role::Student), Action::SetRegistrationStatus, Scope::Any).is_err());
}

#[test]
fn every_role_can_register_review_and_submit_feedback() {
    for role in [Role::Student, Role::Instructor, Role::Admin] {
        assert!(ensure(&actor(role), Action::RegisterForWorkshop, Scope::Any).is_ok());
        assert!(ensure(&actor(role), Action::ReviewWorkshop, Scope::Any).is_ok());
        assert!(ensure(&actor(role), Action::SubmitFeedback, Scope::Any).is_ok());
    }
}

#[test]
fn cancellation_and_feedback_deletion_are_owner_only() {
    let student = actor(Role::Student);

    assert!(ensure(&student, Action::CancelRegistration, Scope::Owned(student.user_id)).is_ok());
    assert!(ensure(&student, Action::CancelRegistration, Scope::Owned(Uuid::new_v4())).is_err());

    assert!(ensure(&student, Action::DeleteFeedback, Scope::Owned(student.user_id)).is_ok());
    assert!(ensure(&student, Action::DeleteFeedback, Scope::Owned(Uuid::new_v4())).is_err());

    assert!(
        ensure(
            &actor(Role::Admin),
            Action::CancelRegistration,
            Scope::Owned(Uuid::new_v4())
        )
        .is_ok()
    );
}

#[test]
fn reporting_and_moderation_are_admin_only() {
    let admin_only = [
        Action::ViewAllFeedback,
        Action::ModerateFeedback,
        Action::ManageUsers,
        Action::ViewReports,
    ];

    for action in admin_only {
        assert!(ensure(&actor(Role::Admin), action, Scope::Any).is_ok());
        assert!(ensure(&actor(Role::Instructor), action, Scope::Any).is_err());
        assert!(ensure(&actor(Role::Student), action, Scope::Any).is_err());
    }
}

#[test]
fn role_strings_round_trip() {
    for role in [Role::Student, Role::Instructor, Role::Admin] {
        assert_eq!(Role::parse(role.as_str()), Some(role));
    }
    assert_eq!(Role::parse("superuser"), None);
}
