use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_channel::Sender;
use chrono::Utc;
use log::{error, info};
use uuid::Uuid;

use crate::analytics::{self, Event};
use crate::config::Config;
use crate::db;
use crate::db::property::STATUS_ACTIVE;
use crate::geo::Geocoder;
use crate::models::external_construction::{ExternalConstruction, InsertableExternalConstruction};
use crate::models::property::{InsertableProperty, Property, PropertyChanges};
use crate::models::property_image::{InsertablePropertyImage, PropertyImage};
use crate::services::ValidationError;
use crate::storage::Storage;

/// Raw dashboard form fields, as submitted. Numeric fields arrive as strings
/// and default to zero when empty or unparsable.
#[derive(Debug, Default, Clone)]
pub struct ListingForm {
    pub title: String,
    pub description: String,
    pub price: String,
    pub surface_area: String,
    pub rooms: String,
    pub floor: String,
    pub address: String,
    pub is_construction: bool,
    pub is_investment: bool,
    pub external_url: String,
    pub image_url: String,
    pub preview_index: usize,
}

impl ListingForm {
    /// Bind one multipart text field by name. Unknown names are ignored.
    pub fn set_field(&mut self, name: &str, value: String) {
        match name {
            "title" => self.title = value,
            "description" => self.description = value,
            "price" => self.price = value,
            "surface_area" => self.surface_area = value,
            "rooms" => self.rooms = value,
            "floor" => self.floor = value,
            "address" => self.address = value,
            "is_construction" => self.is_construction = parse_flag(&value),
            "is_investment" => self.is_investment = parse_flag(&value),
            "external_url" => self.external_url = value,
            "image_url" => self.image_url = value,
            "preview_index" => self.preview_index = value.trim().parse().unwrap_or(0),
            _ => {}
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The two explicit shapes a submission can take. Presence of a non-empty
/// external_url switches the form into external-construction mode, which
/// relaxes the numeric-field requirements.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingDraft {
    Standard(StandardDraft),
    External(ExternalDraft),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandardDraft {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub surface_area: f64,
    pub rooms: i32,
    pub floor: Option<i32>,
    pub address: String,
    pub is_construction: bool,
    pub is_investment: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExternalDraft {
    pub title: String,
    pub description: String,
    pub address: String,
    pub external_url: String,
    pub image_url: Option<String>,
}

pub fn parse_form(form: &ListingForm) -> Result<ListingDraft, ValidationError> {
    if form.title.trim().is_empty() {
        return Err(ValidationError {
            field: "title",
            message: "title is required",
        });
    }
    if form.address.trim().is_empty() {
        return Err(ValidationError {
            field: "address",
            message: "address is required",
        });
    }

    if !form.external_url.trim().is_empty() {
        return Ok(ListingDraft::External(ExternalDraft {
            title: form.title.trim().to_string(),
            description: form.description.trim().to_string(),
            address: form.address.trim().to_string(),
            external_url: form.external_url.trim().to_string(),
            image_url: non_empty(&form.image_url),
        }));
    }

    if form.description.trim().is_empty() {
        return Err(ValidationError {
            field: "description",
            message: "description is required",
        });
    }

    Ok(ListingDraft::Standard(StandardDraft {
        title: form.title.trim().to_string(),
        description: form.description.trim().to_string(),
        price: parse_or_zero(&form.price),
        surface_area: parse_or_zero(&form.surface_area),
        rooms: parse_int_or_zero(&form.rooms),
        floor: form.floor.trim().parse().ok(),
        address: form.address.trim().to_string(),
        is_construction: form.is_construction,
        is_investment: form.is_investment,
    }))
}

pub fn parse_or_zero(value: &str) -> f64 {
    value.trim().parse().unwrap_or(0.0)
}

pub fn parse_int_or_zero(value: &str) -> i32 {
    value.trim().parse().unwrap_or(0)
}

pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "true" | "on" | "1")
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// One planned storage object for a selected image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePlan {
    pub object_name: String,
    pub display_order: i32,
    pub is_preview: bool,
}

/// Derive object names and gallery order for a batch of selected files.
/// Names carry the owning id, a timestamp and the sequence index so repeated
/// uploads never collide. `preview_index` is None when appending to an
/// existing gallery, which never re-flags a preview.
pub fn plan_images(
    property_id: Uuid,
    timestamp_ms: i64,
    start_order: i32,
    preview_index: Option<usize>,
    files: &[UploadedImage],
) -> Vec<ImagePlan> {
    files
        .iter()
        .enumerate()
        .map(|(i, file)| ImagePlan {
            object_name: format!(
                "{}-{}-{}.{}",
                property_id,
                timestamp_ms,
                i,
                file_extension(&file.file_name)
            ),
            display_order: start_order + i as i32,
            is_preview: preview_index == Some(i),
        })
        .collect()
}

fn file_extension(file_name: &str) -> &str {
    file_name.rsplit('.').next().filter(|ext| !ext.is_empty() && *ext != file_name).unwrap_or("jpg")
}

/// Image shown on a summary card: the flagged preview when present, else the
/// first of the gallery, else the site placeholder.
pub fn representative_image(images: &[PropertyImage], placeholder: &str) -> String {
    images
        .iter()
        .find(|image| image.is_preview)
        .or_else(|| images.first())
        .map(|image| image.image_url.clone())
        .unwrap_or_else(|| placeholder.to_string())
}

#[derive(Debug)]
pub enum CreatedListing {
    Property(Property),
    External(ExternalConstruction),
}

pub async fn create(
    config: &Arc<Config>,
    storage: &Storage,
    events: &Sender<Event>,
    form: ListingForm,
    files: Vec<UploadedImage>,
) -> Result<CreatedListing> {
    let draft = parse_form(&form)?;
    let now = Utc::now();

    match draft {
        ListingDraft::External(external) => {
            let inserted = db::external_construction::insert(
                config,
                InsertableExternalConstruction {
                    id: Uuid::new_v4(),
                    title: external.title.clone(),
                    description: external.description,
                    address: external.address,
                    external_url: external.external_url,
                    image_url: external.image_url,
                    latitude: None,
                    longitude: None,
                    is_construction: true,
                    is_investment: false,
                    status: STATUS_ACTIVE.to_string(),
                    created_at: now.naive_utc(),
                    updated_at: now.naive_utc(),
                },
            )?;

            analytics::track(
                events,
                Event::ListingUploaded {
                    title: inserted.title.clone(),
                    external: true,
                },
            );
            Ok(CreatedListing::External(inserted))
        }
        ListingDraft::Standard(standard) => {
            let property = db::property::insert(
                config,
                InsertableProperty {
                    id: Uuid::new_v4(),
                    title: standard.title,
                    description: standard.description,
                    price: standard.price,
                    surface_area: standard.surface_area,
                    rooms: standard.rooms,
                    floor: standard.floor,
                    address: standard.address,
                    latitude: None,
                    longitude: None,
                    is_construction: standard.is_construction,
                    is_investment: standard.is_investment,
                    status: STATUS_ACTIVE.to_string(),
                    created_at: now.naive_utc(),
                    updated_at: now.naive_utc(),
                },
            )?;

            let plans = plan_images(
                property.id,
                now.timestamp_millis(),
                0,
                Some(form.preview_index),
                &files,
            );
            store_images(config, storage, property.id, &plans, &files).await?;

            analytics::track(
                events,
                Event::ListingUploaded {
                    title: property.title.clone(),
                    external: false,
                },
            );
            Ok(CreatedListing::Property(property))
        }
    }
}

/// Uploads run one file at a time; a failure aborts the remainder and leaves
/// the already-stored images in place (no rollback, matching the store's
/// last-write-wins discipline).
async fn store_images(
    config: &Arc<Config>,
    storage: &Storage,
    property_id: Uuid,
    plans: &[ImagePlan],
    files: &[UploadedImage],
) -> Result<()> {
    for (plan, file) in plans.iter().zip(files) {
        storage.upload(&plan.object_name, &file.bytes).await?;
        let url = storage.public_url(&plan.object_name);

        db::property_image::insert(
            config,
            InsertablePropertyImage {
                id: Uuid::new_v4(),
                property_id,
                image_url: url,
                display_order: plan.display_order,
                is_preview: plan.is_preview,
                created_at: Utc::now().naive_utc(),
            },
        )?;
    }
    Ok(())
}

pub async fn update(
    config: &Arc<Config>,
    storage: &Storage,
    geocoder: Option<&Geocoder>,
    property_id: Uuid,
    form: ListingForm,
    files: Vec<UploadedImage>,
    regeocode: bool,
) -> Result<Property> {
    let standard = match parse_form(&form)? {
        ListingDraft::Standard(s) => s,
        ListingDraft::External(_) => {
            return Err(ValidationError {
                field: "external_url",
                message: "external constructions cannot be edited in place; delete and re-create",
            }
            .into())
        }
    };

    if db::property::get_by_id(config, property_id)?.is_none() {
        return Err(anyhow!("property {} not found", property_id));
    }

    let now = Utc::now();
    let updated = db::property::update(
        config,
        property_id,
        &PropertyChanges {
            title: standard.title,
            description: standard.description,
            price: standard.price,
            surface_area: standard.surface_area,
            rooms: standard.rooms,
            floor: standard.floor,
            address: standard.address.clone(),
            is_construction: standard.is_construction,
            is_investment: standard.is_investment,
            updated_at: now.naive_utc(),
        },
    )?;

    if regeocode {
        match geocoder {
            Some(geocoder) => {
                if let Some(coords) = geocoder.forward(&standard.address).await {
                    db::property::set_coordinates(
                        config,
                        property_id,
                        coords.latitude,
                        coords.longitude,
                    )?;
                    info!("Re-geocoded {} to {:?}", property_id, coords);
                }
            }
            None => info!("No geocoder configured, skipping re-geocode"),
        }
    }

    if !files.is_empty() {
        let start = db::property_image::max_display_order(config, property_id)?
            .map(|current| current + 1)
            .unwrap_or(0);
        let plans = plan_images(property_id, now.timestamp_millis(), start, None, &files);
        store_images(config, storage, property_id, &plans, &files).await?;
    }

    Ok(updated)
}

/// Irreversible. Image rows and their storage objects go first so a listing
/// delete leaves no orphaned objects behind; a storage miss is logged and
/// does not block the row delete.
pub async fn delete(config: &Arc<Config>, storage: &Storage, property_id: Uuid) -> Result<usize> {
    let images = db::property_image::get_for_property(config, property_id)?;
    for image in &images {
        if let Some(object_name) = storage.object_name_from_url(&image.image_url) {
            if let Err(e) = storage.delete(&object_name).await {
                error!("Failed to delete object {}: {}", object_name, e);
            }
        }
    }
    db::property_image::delete_for_property(config, property_id)?;
    db::property::delete(config, property_id)
}

pub fn delete_external(config: &Arc<Config>, construction_id: Uuid) -> Result<usize> {
    db::external_construction::delete(config, construction_id)
}
