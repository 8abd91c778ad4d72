use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Queryable, Selectable, Clone, Serialize)]
#[diesel(table_name = crate::db::schema::property_images)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PropertyImage {
    pub id: Uuid,
    pub property_id: Uuid,
    pub image_url: String,
    pub display_order: i32,
    pub is_preview: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::db::schema::property_images)]
pub struct InsertablePropertyImage {
    pub id: Uuid,
    pub property_id: Uuid,
    pub image_url: String,
    pub display_order: i32,
    pub is_preview: bool,
    pub created_at: NaiveDateTime,
}
