pub mod audit_logs;
pub mod feedback;
pub mod registrations;
pub mod users;
pub mod workshops;

pub use audit_logs::Entity as AuditLogs;
pub use feedback::Entity as Feedback;
pub use registrations::Entity as Registrations;
pub use users::Entity as Users;
pub use workshops::Entity as Workshops;
