use std::sync::Arc;

use anyhow::Result;
use diesel::prelude::*;

use super::{establish_connection, schema::contacts};
use crate::config::Config;
use crate::models::contact::{Contact, InsertableContact};

pub fn insert(config: &Arc<Config>, contact: InsertableContact) -> Result<Contact> {
    let connection = &mut establish_connection(config)?;

    let inserted: Contact = diesel::insert_into(contacts::table)
        .values(&contact)
        .get_result(connection)?;

    Ok(inserted)
}
