// src/infrastructure/geocoding/registry.rs

use super::google_maps::GoogleMapsProvider;
use super::nominatim::NominatimProvider;
use super::photon::PhotonProvider;
use super::{FormattableGeocodingResult, GeocodingError, GeocodingProvider};
use crate::config::GeocodingConfig;
use crate::utils::geo::Coordinates;
use std::sync::Arc;
use tracing::{info, warn};

/// Enabled provider as presented to clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
    pub name: String,
    pub display_name: String,
    pub is_primary: bool,
    pub is_fallback: bool,
}

/// Enabled geocoding providers plus the primary/fallback choice.
#[derive(Clone)]
pub struct GeocodingProviderRegistry {
    providers: Vec<Arc<dyn GeocodingProvider>>,
    primary: String,
    fallback: Option<String>,
}

impl GeocodingProviderRegistry {
    pub fn new(
        providers: Vec<Arc<dyn GeocodingProvider>>,
        primary: impl Into<String>,
        fallback: Option<String>,
    ) -> Self {
        Self {
            providers,
            primary: primary.into(),
            fallback,
        }
    }

    pub fn from_config(config: &GeocodingConfig) -> Result<Self, GeocodingError> {
        let mut providers: Vec<Arc<dyn GeocodingProvider>> = Vec::new();

        if config.nominatim_enabled {
            providers.push(Arc::new(NominatimProvider::new(config)?));
        }
        if config.photon_enabled {
            providers.push(Arc::new(PhotonProvider::new(config)?));
        }
        if let Some(api_key) = &config.google_maps_api_key {
            providers.push(Arc::new(GoogleMapsProvider::new(config, api_key.clone())?));
        }

        let registry = Self::new(
            providers,
            config.primary_provider.clone(),
            config.fallback_provider.clone(),
        );

        if registry.primary().is_none() {
            warn!(
                primary = %config.primary_provider,
                "Configured primary geocoding provider is not enabled"
            );
        }
        info!(
            providers = ?registry.providers.iter().map(|p| p.name().to_string()).collect::<Vec<_>>(),
            "Geocoding providers enabled"
        );

        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn GeocodingProvider>, GeocodingError> {
        self.providers
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
            .cloned()
            .ok_or_else(|| GeocodingError::UnknownProvider(name.to_string()))
    }

    pub fn primary(&self) -> Option<Arc<dyn GeocodingProvider>> {
        self.get(&self.primary).ok()
    }

    pub fn fallback(&self) -> Option<Arc<dyn GeocodingProvider>> {
        let fallback = self.fallback.as_deref()?;
        if fallback.eq_ignore_ascii_case(&self.primary) {
            return None;
        }
        self.get(fallback).ok()
    }

    pub fn enabled_providers(&self) -> Vec<ProviderInfo> {
        self.providers
            .iter()
            .map(|provider| ProviderInfo {
                name: provider.name().to_string(),
                display_name: provider.display_name().to_string(),
                is_primary: provider.name().eq_ignore_ascii_case(&self.primary),
                is_fallback: self
                    .fallback
                    .as_deref()
                    .is_some_and(|f| provider.name().eq_ignore_ascii_case(f)),
            })
            .collect()
    }

    /// Asks the primary provider, then the fallback when the primary fails.
    pub async fn reverse_geocode(
        &self,
        point: Coordinates,
    ) -> Result<FormattableGeocodingResult, GeocodingError> {
        let primary = self.primary();
        let fallback = self.fallback();

        let primary_error = match &primary {
            Some(provider) => match provider.reverse_geocode(point).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "Primary geocoding provider failed");
                    Some(e)
                }
            },
            None => None,
        };

        match (fallback, primary_error) {
            (Some(provider), _) => provider.reverse_geocode(point).await,
            (None, Some(e)) => Err(e),
            (None, None) => Err(GeocodingError::NoProviderEnabled),
        }
    }
}
