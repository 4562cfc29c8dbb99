use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Registration, Workshop};

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub workshop_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRegistrationStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationWithWorkshop {
    pub registration: Registration,
    pub workshop: Option<Workshop>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationList {
    pub items: Vec<RegistrationWithWorkshop>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendeeBrief {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RosterEntry {
    pub registration: Registration,
    pub attendee: Option<AttendeeBrief>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RosterList {
    pub items: Vec<RosterEntry>,
}
