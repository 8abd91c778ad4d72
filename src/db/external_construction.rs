use std::sync::Arc;

use anyhow::Result;
use diesel::prelude::*;
use log::info;
use uuid::Uuid;

use super::{
    establish_connection, schema::external_constructions,
    schema::external_constructions::dsl::*,
};
use crate::config::Config;
use crate::db::property::STATUS_ACTIVE;
use crate::models::external_construction::{ExternalConstruction, InsertableExternalConstruction};

pub fn insert(
    config: &Arc<Config>,
    construction: InsertableExternalConstruction,
) -> Result<ExternalConstruction> {
    let connection = &mut establish_connection(config)?;

    let inserted: ExternalConstruction = diesel::insert_into(external_constructions::table)
        .values(&construction)
        .get_result(connection)?;

    info!("Inserted external construction {}", inserted.id);
    Ok(inserted)
}

pub fn get_active(config: &Arc<Config>, limit: Option<i64>) -> Result<Vec<ExternalConstruction>> {
    let connection = &mut establish_connection(config)?;

    let query = external_constructions
        .filter(status.eq(STATUS_ACTIVE))
        .order(created_at.desc())
        .select(ExternalConstruction::as_select());

    let rows = match limit {
        Some(count) => query.limit(count).load(connection)?,
        None => query.load(connection)?,
    };

    Ok(rows)
}

pub fn delete(config: &Arc<Config>, target_id: Uuid) -> Result<usize> {
    let connection = &mut establish_connection(config)?;

    let deleted =
        diesel::delete(external_constructions.filter(id.eq(target_id))).execute(connection)?;
    info!("Deleted {} row(s) from external_constructions", deleted);
    Ok(deleted)
}
