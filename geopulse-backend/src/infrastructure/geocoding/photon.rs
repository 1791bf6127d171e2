// src/infrastructure/geocoding/photon.rs

use super::{
    build_http_client, non_blank, FormattableGeocodingResult, GeocodingError, GeocodingProvider,
    GeocodingResponseAdapter,
};
use crate::config::GeocodingConfig;
use crate::utils::geo::{BoundingBox, Coordinates};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

pub const PROVIDER_NAME: &str = "Photon";

/// GeoJSON feature collection returned by Photon
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotonResponse {
    #[serde(default)]
    pub features: Option<Vec<PhotonFeature>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotonFeature {
    #[serde(default)]
    pub geometry: Option<PhotonGeometry>,
    #[serde(default)]
    pub properties: PhotonProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotonGeometry {
    /// `[lon, lat]`
    #[serde(default)]
    pub coordinates: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotonProperties {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub housenumber: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// `[west, north, east, south]`
    #[serde(default)]
    pub extent: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PhotonResponseAdapter;

impl GeocodingResponseAdapter<PhotonResponse> for PhotonResponseAdapter {
    fn adapt(
        &self,
        response: &PhotonResponse,
        request_point: Coordinates,
        provider_name: &str,
    ) -> Result<FormattableGeocodingResult, GeocodingError> {
        let Some(feature) = response.features.as_ref().and_then(|f| f.first()) else {
            warn!(
                lon = request_point.longitude,
                lat = request_point.latitude,
                "Empty Photon response"
            );
            return Err(GeocodingError::EmptyResponse(
                "Photon returned no features".to_string(),
            ));
        };
        let props = &feature.properties;

        let result_coordinates = feature
            .geometry
            .as_ref()
            .and_then(|g| g.coordinates.as_deref())
            .and_then(|c| match c {
                [lon, lat, ..] => Some(Coordinates::new(*lon, *lat)),
                _ => None,
            })
            .unwrap_or(request_point);

        let bounding_box = props.extent.as_deref().and_then(|extent| match extent {
            [west, north, east, south] => BoundingBox::new(*south, *north, *west, *east),
            _ => None,
        });

        let street = non_blank(props.street.as_deref()).map(|street| {
            match non_blank(props.housenumber.as_deref()) {
                Some(number) => format!("{} {}", number, street),
                None => street.to_string(),
            }
        });

        let formatted_display_name = match (non_blank(props.name.as_deref()), street) {
            (Some(name), Some(street)) => format!("{} ({})", name, street),
            (Some(name), None) => name.to_string(),
            (None, Some(street)) => street,
            (None, None) => "Unknown location".to_string(),
        };

        Ok(FormattableGeocodingResult {
            request_coordinates: request_point,
            result_coordinates,
            bounding_box,
            formatted_display_name,
            city: non_blank(props.city.as_deref())
                .or_else(|| non_blank(props.district.as_deref()))
                .map(str::to_string),
            country: non_blank(props.country.as_deref()).map(str::to_string),
            provider_name: provider_name.to_string(),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Komoot Photon `/reverse` client
pub struct PhotonProvider {
    client: reqwest::Client,
    base_url: String,
    adapter: PhotonResponseAdapter,
}

impl PhotonProvider {
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeocodingError> {
        Ok(Self {
            client: build_http_client(config.request_timeout, &config.user_agent)?,
            base_url: config.photon_url.trim_end_matches('/').to_string(),
            adapter: PhotonResponseAdapter,
        })
    }
}

#[async_trait]
impl GeocodingProvider for PhotonProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn display_name(&self) -> &str {
        "Photon (Komoot)"
    }

    async fn reverse_geocode(
        &self,
        point: Coordinates,
    ) -> Result<FormattableGeocodingResult, GeocodingError> {
        let url = format!(
            "{}/reverse?lat={}&lon={}",
            self.base_url, point.latitude, point.longitude
        );
        debug!(lat = point.latitude, lon = point.longitude, "Querying Photon");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(GeocodingError::Unavailable(format!(
                "Photon returned {}",
                response.status()
            )));
        }

        let body: PhotonResponse = response
            .json()
            .await
            .map_err(|e| GeocodingError::Parse(e.to_string()))?;

        self.adapter.adapt(&body, point, PROVIDER_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_feature_is_normalized() {
        let response: PhotonResponse = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [13.4, 52.52] },
                "properties": {
                    "name": "Brandenburger Tor",
                    "housenumber": "1",
                    "street": "Pariser Platz",
                    "district": "Mitte",
                    "country": "Germany",
                    "extent": [13.37, 52.52, 13.38, 52.51]
                }
            }]
        }))
        .unwrap();

        let result = PhotonResponseAdapter
            .adapt(&response, Coordinates::new(13.0, 52.0), PROVIDER_NAME)
            .unwrap();

        assert_eq!(result.formatted_display_name, "Brandenburger Tor (1 Pariser Platz)");
        assert_eq!(result.city.as_deref(), Some("Mitte"));
        assert_eq!(result.result_coordinates, Coordinates::new(13.4, 52.52));
        let bbox = result.bounding_box.unwrap();
        assert_eq!((bbox.south, bbox.north, bbox.west, bbox.east), (52.51, 52.52, 13.37, 13.38));
    }

    #[test]
    fn test_no_features_is_an_error() {
        let response: PhotonResponse = serde_json::from_value(json!({ "features": [] })).unwrap();
        assert!(PhotonResponseAdapter
            .adapt(&response, Coordinates::new(0.0, 0.0), PROVIDER_NAME)
            .is_err());
    }
}
