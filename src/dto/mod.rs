pub mod admin;
pub mod auth;
pub mod feedback;
pub mod registrations;
pub mod workshops;
