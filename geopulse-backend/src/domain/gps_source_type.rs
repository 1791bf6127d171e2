// src/domain/gps_source_type.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tracking apps that can push points into GeoPulse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GpsSourceType {
    Owntracks,
    Overland,
}

impl GpsSourceType {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "OWNTRACKS" => Some(Self::Owntracks),
            "OVERLAND" => Some(Self::Overland),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owntracks => "OWNTRACKS",
            Self::Overland => "OVERLAND",
        }
    }
}

impl fmt::Display for GpsSourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_str() {
        assert_eq!(GpsSourceType::from_str("owntracks"), Some(GpsSourceType::Owntracks));
        assert_eq!(GpsSourceType::from_str("OVERLAND"), Some(GpsSourceType::Overland));
        assert_eq!(GpsSourceType::from_str("gpslogger"), None);
        assert_eq!(
            serde_json::to_string(&GpsSourceType::Owntracks).unwrap(),
            "\"OWNTRACKS\""
        );
    }
}
