#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Historical hourly weather lookup via the Open-Meteo archive API.
//!
//! Given resolved coordinates and a calendar date, fetches that day's
//! hourly WMO weather-code series and indexes it by hour of day. Weather
//! never aborts a batch: transport errors, short series, and out-of-range
//! hours all degrade to an absent code.
//!
//! See <https://open-meteo.com/en/docs/historical-weather-api>

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

/// Default endpoint of the archive API.
pub const DEFAULT_ENDPOINT: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Errors from weather provider calls.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}

/// A historical-weather collaborator returning one day's hourly series.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Returns the WMO weather code for each hour of `date` at the given
    /// point, in hour order. Hours the archive has no value for are
    /// `None`, keeping the series positionally indexable.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError`] if the request or response handling fails.
    async fn hourly_weather_codes(
        &self,
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
    ) -> Result<Vec<Option<i64>>, WeatherError>;
}

/// Open-Meteo archive API client.
pub struct OpenMeteoClient {
    client: reqwest::Client,
    endpoint: String,
}

impl OpenMeteoClient {
    /// Creates a client against [`DEFAULT_ENDPOINT`].
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_endpoint(client, DEFAULT_ENDPOINT)
    }

    /// Points the client at a non-default endpoint (tests, proxies).
    #[must_use]
    pub fn with_endpoint(client: reqwest::Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    async fn hourly_weather_codes(
        &self,
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
    ) -> Result<Vec<Option<i64>>, WeatherError> {
        let date_param = date.format("%Y-%m-%d").to_string();
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("start_date", date_param.clone()),
                ("end_date", date_param),
                ("hourly", "weather_code".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = resp.json().await?;
        parse_hourly_codes(&body)
    }
}

/// Extracts the `hourly.weather_code` series from a response body.
///
/// The archive reports codes as numbers; missing hours come back as JSON
/// `null` and stay `None` so positions still line up with hours.
#[allow(clippy::cast_possible_truncation)]
fn parse_hourly_codes(body: &serde_json::Value) -> Result<Vec<Option<i64>>, WeatherError> {
    let series = body["hourly"]["weather_code"]
        .as_array()
        .ok_or_else(|| WeatherError::Parse {
            message: "missing hourly.weather_code in archive response".to_string(),
        })?;

    Ok(series
        .iter()
        .map(|value| value.as_f64().map(|code| code as i64))
        .collect())
}

/// Looks up the weather code at `hour` on `date`.
///
/// Soft-fails to `None` on any provider error or a series that does not
/// cover the requested hour.
pub async fn weather_code_at<P: WeatherProvider + ?Sized>(
    provider: &P,
    latitude: f64,
    longitude: f64,
    date: NaiveDate,
    hour: u8,
) -> Option<i64> {
    match provider.hourly_weather_codes(latitude, longitude, date).await {
        Ok(series) => series.get(usize::from(hour)).copied().flatten(),
        Err(e) => {
            log::warn!("weather lookup failed for ({latitude}, {longitude}) on {date}: {e}");
            None
        }
    }
}
