use std::sync::Arc;

use anyhow::Result;
use futures::future::join_all;
use log::info;
use serde::Serialize;
use uuid::Uuid;

use crate::config::Config;
use crate::db;
use crate::geo::Geocoder;
use crate::models::listing::{Listing, ListingLink};

/// Default map view over Rome until fit-to-bounds kicks in.
pub const DEFAULT_CENTER: (f64, f64) = (41.9028, 12.4964);
pub const DEFAULT_ZOOM: u8 = 10;
pub const FIT_PADDING: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerCategory {
    Standard,
    Construction,
    Investment,
}

impl MarkerCategory {
    /// Construction wins over investment when both flags are set, matching
    /// the marker styling the public site always used.
    pub fn of(is_construction: bool, is_investment: bool) -> MarkerCategory {
        if is_construction {
            MarkerCategory::Construction
        } else if is_investment {
            MarkerCategory::Investment
        } else {
            MarkerCategory::Standard
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            MarkerCategory::Standard => "#ef4444",
            MarkerCategory::Construction => "#22c55e",
            MarkerCategory::Investment => "#3b82f6",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            MarkerCategory::Standard => "🏠",
            MarkerCategory::Construction => "🚧",
            MarkerCategory::Investment => "💼",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub property_id: Uuid,
    pub title: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: MarkerCategory,
    pub color: &'static str,
    pub glyph: &'static str,
    pub popup_html: String,
    pub link: ListingLink,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn of(latitude: f64, longitude: f64) -> Bounds {
        Bounds {
            south: latitude,
            west: longitude,
            north: latitude,
            east: longitude,
        }
    }

    pub fn extend(&mut self, latitude: f64, longitude: f64) {
        self.south = self.south.min(latitude);
        self.west = self.west.min(longitude);
        self.north = self.north.max(latitude);
        self.east = self.east.max(longitude);
    }
}

#[derive(Debug, Serialize)]
pub struct MapView {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub zoom: u8,
    pub padding: u32,
    pub markers: Vec<Marker>,
    /// Fit-to-bounds target; None when no marker was placed, in which case
    /// the view stays at its default center.
    pub bounds: Option<Bounds>,
}

/// Load every active listing, resolve missing coordinates concurrently and
/// assemble the marker set. Listings that cannot be geocoded are omitted; a
/// marker is never emitted without coordinates.
pub async fn build_map_view(config: &Arc<Config>, geocoder: &Geocoder) -> Result<MapView> {
    let mut listings: Vec<Listing> = Vec::new();
    listings.extend(db::property::get_active(config)?.into_iter().map(Listing::Property));
    listings.extend(
        db::external_construction::get_active(config, None)?
            .into_iter()
            .map(Listing::External),
    );

    let resolved = join_all(
        listings
            .into_iter()
            .map(|listing| resolve_coordinates(listing, geocoder)),
    )
    .await;

    let markers: Vec<Marker> = resolved
        .into_iter()
        .flatten()
        .filter_map(|listing| marker_for(&listing))
        .collect();

    info!("Map view assembled with {} markers", markers.len());
    Ok(assemble_view(markers))
}

pub fn assemble_view(markers: Vec<Marker>) -> MapView {
    let bounds = bounds_of(&markers);
    MapView {
        center_latitude: DEFAULT_CENTER.0,
        center_longitude: DEFAULT_CENTER.1,
        zoom: DEFAULT_ZOOM,
        padding: FIT_PADDING,
        markers,
        bounds,
    }
}

pub fn bounds_of(markers: &[Marker]) -> Option<Bounds> {
    let mut markers = markers.iter();
    let first = markers.next()?;
    let mut bounds = Bounds::of(first.latitude, first.longitude);
    for marker in markers {
        bounds.extend(marker.latitude, marker.longitude);
    }
    Some(bounds)
}

async fn resolve_coordinates(listing: Listing, geocoder: &Geocoder) -> Option<Listing> {
    if listing.coordinates().is_some() {
        return Some(listing);
    }
    let coords = geocoder.forward(listing.address()).await?;
    Some(listing.with_coordinates(coords.latitude, coords.longitude))
}

pub fn marker_for(listing: &Listing) -> Option<Marker> {
    let (latitude, longitude) = listing.coordinates()?;
    let category = MarkerCategory::of(listing.is_construction(), listing.is_investment());

    Some(Marker {
        property_id: listing.id(),
        title: listing.title().to_string(),
        latitude,
        longitude,
        category,
        color: category.color(),
        glyph: category.glyph(),
        popup_html: popup_html(listing),
        link: listing.link(),
    })
}

pub fn popup_html(listing: &Listing) -> String {
    let mut html = String::from("<div class=\"map-popup\">");
    html.push_str(&format!("<h3>{}</h3>", listing.title()));

    if listing.price() > 0.0 {
        html.push_str(&format!("<p>{}</p>", format_price(listing.price())));
    }
    if listing.surface_area() > 0.0 {
        html.push_str(&format!(
            "<p>{}m² • {} vani</p>",
            format_number(listing.surface_area()),
            listing.rooms()
        ));
    }
    html.push_str(&format!("<p>{}</p>", listing.address()));

    match listing.link() {
        ListingLink::External { url } => html.push_str(&format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">Visita il sito →</a>",
            url
        )),
        ListingLink::Detail { path } => {
            html.push_str(&format!("<a href=\"{}\">Scopri di più</a>", path))
        }
    }

    html.push_str("</div>");
    html
}

/// "€250,000" — rounded to whole euros, thousands grouped with commas.
pub fn format_price(price: f64) -> String {
    let cents_dropped = price.round() as i64;
    let digits = cents_dropped.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if cents_dropped < 0 {
        format!("€-{}", grouped)
    } else {
        format!("€{}", grouped)
    }
}

/// Render a stored numeric as the site shows it: no trailing ".0" for whole
/// values, one decimal otherwise.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}
