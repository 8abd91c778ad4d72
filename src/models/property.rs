use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Queryable, Selectable, Clone, Serialize)]
#[diesel(table_name = crate::db::schema::properties)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Property {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub surface_area: f64,
    pub rooms: i32,
    pub floor: Option<i32>,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_construction: bool,
    pub is_investment: bool,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::db::schema::properties)]
pub struct InsertableProperty {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub surface_area: f64,
    pub rooms: i32,
    pub floor: Option<i32>,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_construction: bool,
    pub is_investment: bool,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Scalar fields an edit may change. Coordinates are set separately when the
/// address is re-geocoded.
#[derive(Debug, AsChangeset, Clone)]
#[diesel(table_name = crate::db::schema::properties)]
#[diesel(treat_none_as_null = true)]
pub struct PropertyChanges {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub surface_area: f64,
    pub rooms: i32,
    pub floor: Option<i32>,
    pub address: String,
    pub is_construction: bool,
    pub is_investment: bool,
    pub updated_at: NaiveDateTime,
}
