//! Google Maps Geocoding API client.
//!
//! The request contract is one free-text address plus an API key; the
//! first result's location is taken verbatim. Non-`OK` statuses
//! (`ZERO_RESULTS`, `OVER_QUERY_LIMIT`, ...) and empty result sets are
//! no-match answers, never errors and never retried.
//!
//! See <https://developers.google.com/maps/documentation/geocoding>

use async_trait::async_trait;
use blotter_incident_models::Coordinates;

use crate::{GeocodeError, GeocodeProvider};

/// Default endpoint of the geocoding API.
pub const DEFAULT_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Google Maps Geocoding API collaborator.
pub struct GoogleGeocoder {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GoogleGeocoder {
    /// Creates a client against [`DEFAULT_ENDPOINT`].
    #[must_use]
    pub fn new(client: reqwest::Client, api_key: &str) -> Self {
        Self::with_endpoint(client, DEFAULT_ENDPOINT, api_key)
    }

    /// Points the client at a non-default endpoint (tests, proxies).
    #[must_use]
    pub fn with_endpoint(client: reqwest::Client, endpoint: &str, api_key: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl GeocodeProvider for GoogleGeocoder {
    async fn lookup(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await?;

        if !resp.status().is_success() {
            log::warn!("geocoding API returned HTTP {}", resp.status());
            return Ok(None);
        }

        let body: serde_json::Value = resp.json().await?;
        parse_response(&body)
    }
}

/// Parses a geocoding API response body.
///
/// Returns `Ok(None)` for any non-`OK` status and for an empty result
/// set; a structurally broken body is a parse error.
fn parse_response(body: &serde_json::Value) -> Result<Option<Coordinates>, GeocodeError> {
    let status = body["status"].as_str().ok_or_else(|| GeocodeError::Parse {
        message: "missing status in geocoding response".to_string(),
    })?;

    if status != "OK" {
        return Ok(None);
    }

    let Some(first) = body["results"].get(0) else {
        return Ok(None);
    };

    let location = &first["geometry"]["location"];
    let lat = location["lat"].as_f64().ok_or_else(|| GeocodeError::Parse {
        message: "missing lat in geocoding result".to_string(),
    })?;
    let lng = location["lng"].as_f64().ok_or_else(|| GeocodeError::Parse {
        message: "missing lng in geocoding result".to_string(),
    })?;

    Ok(Some(Coordinates {
        latitude: lat,
        longitude: lng,
    }))
}
