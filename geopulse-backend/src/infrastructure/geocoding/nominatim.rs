// src/infrastructure/geocoding/nominatim.rs

use super::{
    build_http_client, non_blank, FormattableGeocodingResult, GeocodingError, GeocodingProvider,
    GeocodingResponseAdapter,
};
use crate::config::GeocodingConfig;
use crate::utils::geo::{BoundingBox, Coordinates};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

pub const PROVIDER_NAME: &str = "Nominatim";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimResponse {
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub lon: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub address: Option<NominatimAddress>,
    /// `[south, north, west, east]` as strings
    #[serde(default)]
    pub boundingbox: Option<Vec<String>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimAddress {
    #[serde(default)]
    pub house_number: Option<String>,
    #[serde(default)]
    pub road: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
    #[serde(default)]
    pub municipality: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl NominatimAddress {
    fn street(&self) -> Option<String> {
        let road = non_blank(self.road.as_deref())?;
        Some(match non_blank(self.house_number.as_deref()) {
            Some(number) => format!("{} {}", number, road),
            None => road.to_string(),
        })
    }

    fn city(&self) -> Option<String> {
        [&self.city, &self.town, &self.village, &self.municipality]
            .into_iter()
            .find_map(|value| non_blank(value.as_deref()))
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NominatimResponseAdapter;

impl GeocodingResponseAdapter<NominatimResponse> for NominatimResponseAdapter {
    fn adapt(
        &self,
        response: &NominatimResponse,
        request_point: Coordinates,
        provider_name: &str,
    ) -> Result<FormattableGeocodingResult, GeocodingError> {
        if let Some(error) = non_blank(response.error.as_deref()) {
            warn!(
                lon = request_point.longitude,
                lat = request_point.latitude,
                error,
                "Nominatim could not geocode coordinates"
            );
            return Err(GeocodingError::EmptyResponse(format!(
                "Nominatim returned an error: {}",
                error
            )));
        }

        let parse = |value: &Option<String>| value.as_deref().and_then(|v| v.trim().parse::<f64>().ok());
        let result_coordinates = match (parse(&response.lon), parse(&response.lat)) {
            (Some(lon), Some(lat)) => Coordinates::new(lon, lat),
            _ => request_point,
        };

        let bounding_box = response.boundingbox.as_ref().and_then(|values| {
            let parsed: Vec<f64> = values.iter().filter_map(|v| v.trim().parse().ok()).collect();
            match parsed.as_slice() {
                [south, north, west, east] => BoundingBox::new(*south, *north, *west, *east),
                _ => None,
            }
        });

        let street = response.address.as_ref().and_then(NominatimAddress::street);
        let formatted_display_name = match (non_blank(response.name.as_deref()), street) {
            (Some(name), Some(street)) => format!("{} ({})", name, street),
            (Some(name), None) => name.to_string(),
            (None, Some(street)) => street,
            (None, None) => non_blank(response.display_name.as_deref())
                .unwrap_or("Unknown location")
                .to_string(),
        };

        Ok(FormattableGeocodingResult {
            request_coordinates: request_point,
            result_coordinates,
            bounding_box,
            formatted_display_name,
            city: response.address.as_ref().and_then(NominatimAddress::city),
            country: response
                .address
                .as_ref()
                .and_then(|address| non_blank(address.country.as_deref()))
                .map(str::to_string),
            provider_name: provider_name.to_string(),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// OpenStreetMap Nominatim `/reverse` client
pub struct NominatimProvider {
    client: reqwest::Client,
    base_url: String,
    adapter: NominatimResponseAdapter,
}

impl NominatimProvider {
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeocodingError> {
        Ok(Self {
            client: build_http_client(config.request_timeout, &config.user_agent)?,
            base_url: config.nominatim_url.trim_end_matches('/').to_string(),
            adapter: NominatimResponseAdapter,
        })
    }
}

#[async_trait]
impl GeocodingProvider for NominatimProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn display_name(&self) -> &str {
        "Nominatim (OpenStreetMap)"
    }

    async fn reverse_geocode(
        &self,
        point: Coordinates,
    ) -> Result<FormattableGeocodingResult, GeocodingError> {
        let url = format!(
            "{}/reverse?format=jsonv2&addressdetails=1&lat={}&lon={}",
            self.base_url, point.latitude, point.longitude
        );
        debug!(lat = point.latitude, lon = point.longitude, "Querying Nominatim");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(GeocodingError::Unavailable(format!(
                "Nominatim returned {}",
                response.status()
            )));
        }

        let body: NominatimResponse = response
            .json()
            .await
            .map_err(|e| GeocodingError::Parse(e.to_string()))?;

        self.adapter.adapt(&body, point, PROVIDER_NAME)
    }
}
