pub mod contact;
pub mod external_construction;
pub mod property;
pub mod property_image;
pub mod schema;
pub mod user;

use std::sync::Arc;

use anyhow::{Context, Result};
use diesel::{Connection, PgConnection};

use crate::config::Config;

pub fn establish_connection(config: &Arc<Config>) -> Result<PgConnection> {
    PgConnection::establish(&config.db_path)
        .with_context(|| format!("error connecting to {}", config.db_path))
}
