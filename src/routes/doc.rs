use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        admin::{
            Analytics, CategoryCount, DashboardStats, RatingCount, RecentRegistration, RoleCount,
            TopWorkshop, TrendPoint, UpdateUserRoleRequest, UpdateUserStatusRequest, UserList,
        },
        auth::{LoginRequest, LoginResponse, SignupRequest, UpdateProfileRequest},
        feedback::{
            AdminFeedbackEntry, AdminFeedbackList, CreateFeedbackRequest, FeedbackAuthor,
            PublicFeedback, PublicFeedbackList,
        },
        registrations::{
            AttendeeBrief, RegisterRequest, RegistrationList, RegistrationWithWorkshop,
            RosterEntry, RosterList, UpdateRegistrationStatusRequest,
        },
        workshops::{
            AddReviewRequest, CreateWorkshopRequest, InstructorBrief, InstructorDetail,
            ReviewAuthor, ReviewEntry, UpdateWorkshopRequest, WorkshopDetail, WorkshopList,
            WorkshopWithInstructor,
        },
    },
    entity::{feedback::FeedbackCategories, workshops::Material},
    models::{Feedback, Registration, User, Workshop},
    response::ApiResponse,
    routes::{admin, auth, feedback, health, registrations, workshops},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        auth::update_profile,
        workshops::list_workshops,
        workshops::get_workshop,
        workshops::create_workshop,
        workshops::update_workshop,
        workshops::delete_workshop,
        workshops::add_review,
        registrations::register,
        registrations::my_registrations,
        registrations::workshop_roster,
        registrations::cancel_registration,
        registrations::update_registration_status,
        feedback::submit_feedback,
        feedback::workshop_feedback,
        feedback::all_feedback,
        feedback::approve_feedback,
        feedback::delete_feedback,
        admin::dashboard,
        admin::analytics,
        admin::list_users,
        admin::update_user_status,
        admin::update_user_role,
        admin::delete_user
    ),
    components(
        schemas(
            User,
            Workshop,
            Registration,
            Feedback,
            Material,
            FeedbackCategories,
            SignupRequest,
            LoginRequest,
            LoginResponse,
            UpdateProfileRequest,
            CreateWorkshopRequest,
            UpdateWorkshopRequest,
            AddReviewRequest,
            InstructorBrief,
            InstructorDetail,
            ReviewAuthor,
            ReviewEntry,
            WorkshopWithInstructor,
            WorkshopList,
            WorkshopDetail,
            RegisterRequest,
            UpdateRegistrationStatusRequest,
            RegistrationWithWorkshop,
            RegistrationList,
            AttendeeBrief,
            RosterEntry,
            RosterList,
            CreateFeedbackRequest,
            FeedbackAuthor,
            PublicFeedback,
            PublicFeedbackList,
            AdminFeedbackEntry,
            AdminFeedbackList,
            RoleCount,
            CategoryCount,
            RecentRegistration,
            DashboardStats,
            TrendPoint,
            RatingCount,
            TopWorkshop,
            Analytics,
            UpdateUserStatusRequest,
            UpdateUserRoleRequest,
            UserList,
            health::HealthData,
            ApiResponse<health::HealthData>,
            ApiResponse<LoginResponse>,
            ApiResponse<User>,
            ApiResponse<Workshop>,
            ApiResponse<WorkshopList>,
            ApiResponse<WorkshopDetail>,
            ApiResponse<Registration>,
            ApiResponse<RegistrationList>,
            ApiResponse<RosterList>,
            ApiResponse<Feedback>,
            ApiResponse<PublicFeedbackList>,
            ApiResponse<AdminFeedbackList>,
            ApiResponse<DashboardStats>,
            ApiResponse<Analytics>,
            ApiResponse<UserList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication and profile endpoints"),
        (name = "Workshops", description = "Workshop catalog and reviews"),
        (name = "Registrations", description = "Workshop sign-ups and rosters"),
        (name = "Feedback", description = "Moderated workshop feedback"),
        (name = "Admin", description = "Reporting and user management"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
