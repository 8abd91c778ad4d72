use serde::Serialize;
use uuid::Uuid;

use super::{external_construction::ExternalConstruction, property::Property};

/// A record shown to site visitors. The original store keeps agency-owned
/// properties and third-party construction projects in separate tables; the
/// distinction is an explicit variant here instead of an external_url sniff
/// at every render site.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Listing {
    Property(Property),
    External(ExternalConstruction),
}

impl Listing {
    pub fn id(&self) -> Uuid {
        match self {
            Listing::Property(p) => p.id,
            Listing::External(e) => e.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Listing::Property(p) => &p.title,
            Listing::External(e) => &e.title,
        }
    }

    pub fn address(&self) -> &str {
        match self {
            Listing::Property(p) => &p.address,
            Listing::External(e) => &e.address,
        }
    }

    pub fn price(&self) -> f64 {
        match self {
            Listing::Property(p) => p.price,
            Listing::External(_) => 0.0,
        }
    }

    pub fn surface_area(&self) -> f64 {
        match self {
            Listing::Property(p) => p.surface_area,
            Listing::External(_) => 0.0,
        }
    }

    pub fn rooms(&self) -> i32 {
        match self {
            Listing::Property(p) => p.rooms,
            Listing::External(_) => 0,
        }
    }

    pub fn is_construction(&self) -> bool {
        match self {
            Listing::Property(p) => p.is_construction,
            Listing::External(e) => e.is_construction,
        }
    }

    pub fn is_investment(&self) -> bool {
        match self {
            Listing::Property(p) => p.is_investment,
            Listing::External(e) => e.is_investment,
        }
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let (lat, lng) = match self {
            Listing::Property(p) => (p.latitude, p.longitude),
            Listing::External(e) => (e.latitude, e.longitude),
        };
        match (lat, lng) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        match &mut self {
            Listing::Property(p) => {
                p.latitude = Some(latitude);
                p.longitude = Some(longitude);
            }
            Listing::External(e) => {
                e.latitude = Some(latitude);
                e.longitude = Some(longitude);
            }
        }
        self
    }

    /// Where the marker popup or summary card should send the visitor.
    pub fn link(&self) -> ListingLink {
        match self {
            Listing::Property(p) => ListingLink::Detail {
                path: format!("/proprieta/{}", p.id),
            },
            Listing::External(e) => ListingLink::External {
                url: e.external_url.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum ListingLink {
    Detail { path: String },
    External { url: String },
}
