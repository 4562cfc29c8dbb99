pub mod admin_service;
pub mod auth_service;
pub mod feedback_service;
pub mod registration_service;
pub mod workshop_service;
