use std::sync::Arc;

use anyhow::Result;
use diesel::dsl::max;
use diesel::prelude::*;
use uuid::Uuid;

use super::{establish_connection, schema::property_images, schema::property_images::dsl::*};
use crate::config::Config;
use crate::models::property_image::{InsertablePropertyImage, PropertyImage};

pub fn insert(config: &Arc<Config>, image: InsertablePropertyImage) -> Result<PropertyImage> {
    let connection = &mut establish_connection(config)?;

    let inserted: PropertyImage = diesel::insert_into(property_images::table)
        .values(&image)
        .get_result(connection)?;

    Ok(inserted)
}

pub fn get_for_property(config: &Arc<Config>, owner: Uuid) -> Result<Vec<PropertyImage>> {
    let connection = &mut establish_connection(config)?;

    let rows = property_images
        .filter(property_id.eq(owner))
        .order(display_order.asc())
        .select(PropertyImage::as_select())
        .load(connection)?;

    Ok(rows)
}

/// Highest display_order currently assigned for a property, if any image
/// exists. Appended images continue numbering from here.
pub fn max_display_order(config: &Arc<Config>, owner: Uuid) -> Result<Option<i32>> {
    let connection = &mut establish_connection(config)?;

    let current: Option<i32> = property_images
        .filter(property_id.eq(owner))
        .select(max(display_order))
        .first(connection)?;

    Ok(current)
}

pub fn delete_for_property(config: &Arc<Config>, owner: Uuid) -> Result<usize> {
    let connection = &mut establish_connection(config)?;

    let deleted =
        diesel::delete(property_images.filter(property_id.eq(owner))).execute(connection)?;
    Ok(deleted)
}
