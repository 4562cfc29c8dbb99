use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_or_warn,
    dto::registrations::{
        AttendeeBrief, RegisterRequest, RegistrationList, RegistrationWithWorkshop, RosterEntry,
        RosterList, UpdateRegistrationStatusRequest,
    },
    entity::{
        registrations::{
            ActiveModel as RegistrationActive, Column as RegCol, Entity as Registrations,
        },
        users::Entity as Users,
        workshops::{ActiveModel as WorkshopActive, Entity as Workshops},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{self, Registration},
    policy::{Action, Scope, ensure},
    response::ApiResponse,
    state::AppState,
};

/// Whether a cancelled registration frees the (user, workshop) pair for a
/// fresh sign-up. The stored behavior is that it does not: the pair is
/// consumed permanently, matching the unique index on (user_id, workshop_id).
/// Flipping this also requires relaxing that index to a partial one.
const REUSE_CANCELLED_SLOTS: bool = false;

/// Sign the caller up for a workshop. The workshop row is locked for the
/// whole check-insert-increment sequence, so concurrent registrations against
/// the same workshop serialize and can never overshoot capacity.
pub async fn register(
    state: &AppState,
    user: &AuthUser,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<Registration>> {
    ensure(user, Action::RegisterForWorkshop, Scope::Any)?;

    let txn = state.orm.begin().await?;

    let workshop = Workshops::find_by_id(payload.workshop_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let workshop = match workshop {
        Some(w) => w,
        None => return Err(AppError::NotFound("Workshop")),
    };

    let mut condition = Condition::all()
        .add(RegCol::UserId.eq(user.user_id))
        .add(RegCol::WorkshopId.eq(workshop.id));
    if REUSE_CANCELLED_SLOTS {
        condition = condition.add(RegCol::Status.ne("cancelled"));
    }
    let existing = Registrations::find().filter(condition).one(&txn).await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "Already registered for this workshop".into(),
        ));
    }

    if workshop.current_participants >= workshop.max_participants {
        return Err(AppError::Conflict("Workshop is full".into()));
    }

    let registration = RegistrationActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        workshop_id: Set(workshop.id),
        status: Set("registered".into()),
        payment_status: Set("pending".into()),
        payment_amount: Set(workshop.price),
        certificate_url: Set(None),
        attendance_record: Set(false),
        notes: Set(None),
        registered_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let occupancy = workshop.current_participants + 1;
    let mut active: WorkshopActive = workshop.into();
    active.current_participants = Set(occupancy);
    active.update(&txn).await?;

    txn.commit().await?;

    log_or_warn(
        &state.pool,
        Some(user.user_id),
        "registration_create",
        "registrations",
        serde_json::json!({ "registration_id": registration.id, "workshop_id": registration.workshop_id }),
    )
    .await;

    Ok(ApiResponse::data(registration.into()))
}

/// Cancel a registration. The status becomes terminal and the seat returns
/// to the workshop, but the (user, workshop) pair stays consumed.
pub async fn cancel(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let txn = state.orm.begin().await?;

    let registration = Registrations::find_by_id(id).one(&txn).await?;
    let registration = match registration {
        Some(r) => r,
        None => return Err(AppError::NotFound("Registration")),
    };

    ensure(
        user,
        Action::CancelRegistration,
        Scope::Owned(registration.user_id),
    )?;

    let workshop_id = registration.workshop_id;
    let mut active: RegistrationActive = registration.into();
    active.status = Set("cancelled".into());
    active.updated_at = Set(chrono::Utc::now().into());
    active.update(&txn).await?;

    // A missing parent workshop is tolerated; the floor guards against
    // occupancy drift.
    let workshop = Workshops::find_by_id(workshop_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    if let Some(workshop) = workshop {
        let occupancy = (workshop.current_participants - 1).max(0);
        let mut active: WorkshopActive = workshop.into();
        active.current_participants = Set(occupancy);
        active.update(&txn).await?;
    }

    txn.commit().await?;

    log_or_warn(
        &state.pool,
        Some(user.user_id),
        "registration_cancel",
        "registrations",
        serde_json::json!({ "registration_id": id }),
    )
    .await;

    Ok(ApiResponse::message("Registration cancelled"))
}

/// Set a registration status directly. Unlike `cancel`, this never touches
/// workshop occupancy, not even for transitions to or from "cancelled".
pub async fn update_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateRegistrationStatusRequest,
) -> AppResult<ApiResponse<Registration>> {
    ensure(user, Action::SetRegistrationStatus, Scope::Any)?;
    validate_registration_status(&payload.status)?;

    let registration = Registrations::find_by_id(id).one(&state.orm).await?;
    let registration = match registration {
        Some(r) => r,
        None => return Err(AppError::NotFound("Registration")),
    };

    let mut active: RegistrationActive = registration.into();
    active.status = Set(payload.status);
    active.updated_at = Set(chrono::Utc::now().into());
    let registration = active.update(&state.orm).await?;

    log_or_warn(
        &state.pool,
        Some(user.user_id),
        "registration_status_update",
        "registrations",
        serde_json::json!({ "registration_id": registration.id, "status": registration.status }),
    )
    .await;

    Ok(ApiResponse::data(registration.into()))
}

pub async fn list_for_user(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<RegistrationList>> {
    let rows = Registrations::find()
        .filter(RegCol::UserId.eq(user.user_id))
        .find_also_related(Workshops)
        .order_by_desc(RegCol::RegisteredAt)
        .all(&state.orm)
        .await?;

    let items: Vec<RegistrationWithWorkshop> = rows
        .into_iter()
        .map(|(registration, workshop)| RegistrationWithWorkshop {
            registration: registration.into(),
            workshop: workshop.map(models::Workshop::from),
        })
        .collect();

    let count = items.len() as i64;
    Ok(ApiResponse::list(RegistrationList { items }, count))
}

/// Roster for a workshop, visible to its instructor and to admins.
pub async fn list_for_workshop(
    state: &AppState,
    user: &AuthUser,
    workshop_id: Uuid,
) -> AppResult<ApiResponse<RosterList>> {
    let workshop = Workshops::find_by_id(workshop_id).one(&state.orm).await?;
    let workshop = match workshop {
        Some(w) => w,
        None => return Err(AppError::NotFound("Workshop")),
    };

    ensure(
        user,
        Action::ViewWorkshopRoster,
        Scope::Owned(workshop.instructor_id),
    )?;

    let rows = Registrations::find()
        .filter(RegCol::WorkshopId.eq(workshop.id))
        .find_also_related(Users)
        .order_by_desc(RegCol::RegisteredAt)
        .all(&state.orm)
        .await?;

    let items: Vec<RosterEntry> = rows
        .into_iter()
        .map(|(registration, attendee)| RosterEntry {
            registration: registration.into(),
            attendee: attendee.map(|u| AttendeeBrief {
                id: u.id,
                full_name: u.full_name,
                email: u.email,
                phone: u.phone,
            }),
        })
        .collect();

    let count = items.len() as i64;
    Ok(ApiResponse::list(RosterList { items }, count))
}

fn validate_registration_status(status: &str) -> Result<(), AppError> {
    if models::REGISTRATION_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid registration status".into()))
    }
}
