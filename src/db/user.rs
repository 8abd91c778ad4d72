use std::sync::Arc;

use anyhow::Result;
use diesel::prelude::*;
use uuid::Uuid;

use super::{establish_connection, schema::users, schema::users::dsl::*};
use crate::config::Config;
use crate::models::user::{InsertableUser, User};

pub fn insert(config: &Arc<Config>, user: InsertableUser) -> Result<User> {
    let connection = &mut establish_connection(config)?;

    let inserted: User = diesel::insert_into(users::table)
        .values(&user)
        .get_result(connection)?;

    Ok(inserted)
}

pub fn find_by_email(config: &Arc<Config>, target_email: &str) -> Result<Option<User>> {
    let connection = &mut establish_connection(config)?;

    let row = users
        .filter(email.eq(target_email))
        .select(User::as_select())
        .first(connection)
        .optional()?;

    Ok(row)
}

pub fn update_password(config: &Arc<Config>, target_id: Uuid, new_hash: &str) -> Result<usize> {
    let connection = &mut establish_connection(config)?;

    let updated = diesel::update(users.filter(id.eq(target_id)))
        .set(password_hash.eq(new_hash))
        .execute(connection)?;

    Ok(updated)
}
