use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::config::Config;
use crate::db;
use crate::models::contact::{Contact, InsertableContact};
use crate::services::ValidationError;

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub property_id: Option<Uuid>,
}

pub fn submit(config: &Arc<Config>, request: ContactRequest) -> Result<Contact> {
    if request.name.trim().is_empty() {
        return Err(ValidationError {
            field: "name",
            message: "name is required",
        }
        .into());
    }
    if request.email.trim().is_empty() || !request.email.contains('@') {
        return Err(ValidationError {
            field: "email",
            message: "a valid email is required",
        }
        .into());
    }

    db::contact::insert(
        config,
        InsertableContact {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            phone: request.phone.filter(|p| !p.trim().is_empty()),
            message: request.message.filter(|m| !m.trim().is_empty()),
            property_id: request.property_id,
            created_at: Utc::now().naive_utc(),
        },
    )
}
