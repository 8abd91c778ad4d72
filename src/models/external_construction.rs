use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Queryable, Selectable, Clone, Serialize)]
#[diesel(table_name = crate::db::schema::external_constructions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ExternalConstruction {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub address: String,
    pub external_url: String,
    pub image_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_construction: bool,
    pub is_investment: bool,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::db::schema::external_constructions)]
pub struct InsertableExternalConstruction {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub address: String,
    pub external_url: String,
    pub image_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_construction: bool,
    pub is_investment: bool,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
