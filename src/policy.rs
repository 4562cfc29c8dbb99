use uuid::Uuid;

use crate::{error::AppError, middleware::auth::AuthUser};

pub const ROLES: [&str; 3] = ["student", "instructor", "admin"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "student" => Some(Role::Student),
            "instructor" => Some(Role::Instructor),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        }
    }
}

/// Every protected operation in the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateWorkshop,
    EditWorkshop,
    ReviewWorkshop,
    RegisterForWorkshop,
    CancelRegistration,
    ViewWorkshopRoster,
    SetRegistrationStatus,
    SubmitFeedback,
    ViewAllFeedback,
    ModerateFeedback,
    DeleteFeedback,
    ManageUsers,
    ViewReports,
}

/// Ownership dimension of a check: `Owned` carries the id of the user (or
/// instructor) the resource belongs to.
#[derive(Debug, Clone, Copy)]
pub enum Scope {
    Any,
    Owned(Uuid),
}

pub fn ensure(user: &AuthUser, action: Action, scope: Scope) -> Result<(), AppError> {
    if allows(user, action, scope) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// The whole authorization table. Admins pass every rule; everyone else is
/// matched against role and, where it applies, ownership.
fn allows(user: &AuthUser, action: Action, scope: Scope) -> bool {
    use Action::*;

    if user.role == Role::Admin {
        return true;
    }
    let owns = matches!(scope, Scope::Owned(owner) if owner == user.user_id);

    match action {
        CreateWorkshop => user.role == Role::Instructor,
        EditWorkshop | ViewWorkshopRoster => user.role == Role::Instructor && owns,
        SetRegistrationStatus => user.role == Role::Instructor,
        RegisterForWorkshop | ReviewWorkshop | SubmitFeedback => true,
        CancelRegistration | DeleteFeedback => owns,
        ViewAllFeedback | ModerateFeedback | ManageUsers | ViewReports => false,
    }
}
