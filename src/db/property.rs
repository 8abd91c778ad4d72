use std::sync::Arc;

use anyhow::Result;
use diesel::prelude::*;
use log::info;
use uuid::Uuid;

use super::{establish_connection, schema::properties, schema::properties::dsl::*};
use crate::config::Config;
use crate::models::property::{InsertableProperty, Property, PropertyChanges};

pub const STATUS_ACTIVE: &str = "active";

pub fn insert(config: &Arc<Config>, property: InsertableProperty) -> Result<Property> {
    let connection = &mut establish_connection(config)?;

    let inserted: Property = diesel::insert_into(properties::table)
        .values(&property)
        .get_result(connection)?;

    info!("Inserted property {}", inserted.id);
    Ok(inserted)
}

pub fn update(config: &Arc<Config>, target_id: Uuid, changes: &PropertyChanges) -> Result<Property> {
    let connection = &mut establish_connection(config)?;

    let updated: Property = diesel::update(properties.filter(id.eq(target_id)))
        .set(changes)
        .get_result(connection)?;

    Ok(updated)
}

pub fn set_coordinates(
    config: &Arc<Config>,
    target_id: Uuid,
    lat: f64,
    lng: f64,
) -> Result<()> {
    let connection = &mut establish_connection(config)?;

    diesel::update(properties.filter(id.eq(target_id)))
        .set((latitude.eq(Some(lat)), longitude.eq(Some(lng))))
        .execute(connection)?;

    Ok(())
}

pub fn delete(config: &Arc<Config>, target_id: Uuid) -> Result<usize> {
    let connection = &mut establish_connection(config)?;

    let deleted = diesel::delete(properties.filter(id.eq(target_id))).execute(connection)?;
    info!("Deleted {} row(s) from properties", deleted);
    Ok(deleted)
}

pub fn get_active(config: &Arc<Config>) -> Result<Vec<Property>> {
    let connection = &mut establish_connection(config)?;

    let rows = properties
        .filter(status.eq(STATUS_ACTIVE))
        .order(created_at.desc())
        .select(Property::as_select())
        .load(connection)?;

    Ok(rows)
}

pub fn get_all(config: &Arc<Config>) -> Result<Vec<Property>> {
    let connection = &mut establish_connection(config)?;

    let rows = properties
        .order(created_at.desc())
        .select(Property::as_select())
        .load(connection)?;

    Ok(rows)
}

pub fn get_by_id(config: &Arc<Config>, target_id: Uuid) -> Result<Option<Property>> {
    let connection = &mut establish_connection(config)?;

    let row = properties
        .filter(id.eq(target_id))
        .select(Property::as_select())
        .first(connection)
        .optional()?;

    Ok(row)
}
