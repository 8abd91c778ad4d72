use log::{error, info};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    features: Vec<GeocodingFeature>,
}

#[derive(Debug, Deserialize)]
struct GeocodingFeature {
    // Mapbox returns [longitude, latitude]
    center: Vec<f64>,
}

/// Forward-geocoding client against the Mapbox places API.
#[derive(Debug, Clone)]
pub struct Geocoder {
    client: reqwest::Client,
    token: String,
}

impl Geocoder {
    pub fn new(token: String) -> Geocoder {
        Geocoder {
            client: reqwest::Client::new(),
            token,
        }
    }

    /// Resolve a free-text address to coordinates. Returns None when the
    /// service finds nothing or the call fails; one bad address must never
    /// block the rest of a map load.
    pub async fn forward(&self, address: &str) -> Option<Coordinates> {
        let url = format!(
            "https://api.mapbox.com/geocoding/v5/mapbox.places/{}.json",
            urlencoding::encode(address)
        );

        let response = self
            .client
            .get(&url)
            .query(&[("access_token", self.token.as_str()), ("limit", "1")])
            .send()
            .await;

        let body: GeocodingResponse = match response {
            Ok(r) => match r.json().await {
                Ok(b) => b,
                Err(e) => {
                    error!("Error decoding geocoding response for {:?}: {}", address, e);
                    return None;
                }
            },
            Err(e) => {
                error!("Error while geocoding {:?}: {}", address, e);
                return None;
            }
        };

        let feature = body.features.first()?;
        if feature.center.len() < 2 {
            info!("Geocoding returned no usable center for {:?}", address);
            return None;
        }

        Some(Coordinates {
            longitude: feature.center[0],
            latitude: feature.center[1],
        })
    }
}
