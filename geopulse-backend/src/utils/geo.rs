// src/utils/geo.rs
//! Small spherical-geometry helpers shared by geocoding, favorites and insights.

use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn distance_meters(&self, other: &Coordinates) -> f64 {
        haversine_distance_meters(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Axis-aligned latitude/longitude box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Returns `None` when any bound is not a finite number or the box is inverted in latitude.
    pub fn new(south: f64, north: f64, west: f64, east: f64) -> Option<Self> {
        let all_finite = [south, north, west, east].iter().all(|v| v.is_finite());
        if !all_finite || south > north {
            return None;
        }
        Some(Self {
            south,
            north,
            west,
            east,
        })
    }

    /// Closed ring: SW, SE, NE, NW, SW, each as `[lon, lat]`
    pub fn to_polygon(&self) -> Vec<[f64; 2]> {
        vec![
            [self.west, self.south],
            [self.east, self.south],
            [self.east, self.north],
            [self.west, self.north],
            [self.west, self.south],
        ]
    }

    pub fn contains(&self, point: &Coordinates) -> bool {
        let within_latitude = point.latitude >= self.south && point.latitude <= self.north;
        let within_longitude = if self.west <= self.east {
            point.longitude >= self.west && point.longitude <= self.east
        } else {
            // box crosses the antimeridian
            point.longitude >= self.west || point.longitude <= self.east
        };
        within_latitude && within_longitude
    }
}

pub fn haversine_distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_METERS * c
}

/// Degrees of latitude/longitude spanning roughly `meters` around `latitude`.
pub fn degree_window(latitude: f64, meters: f64) -> (f64, f64) {
    let lat_delta = meters / 111_320.0;
    let cos_lat = latitude.to_radians().cos().abs().max(0.01);
    let lon_delta = meters / (111_320.0 * cos_lat);
    (lat_delta, lon_delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_known_distance() {
        // Kyiv to Lviv is roughly 468 km
        let distance = haversine_distance_meters(50.4501, 30.5234, 49.8397, 24.0297);
        assert!((distance / 1000.0 - 468.0).abs() < 5.0, "got {}", distance);
    }

    #[test]
    fn test_zero_distance() {
        let point = Coordinates::new(2.35, 48.85);
        assert_eq!(point.distance_meters(&point), 0.0);
    }

    #[test]
    fn test_bounding_box_polygon_is_closed() {
        let bbox = BoundingBox::new(10.0, 11.0, 20.0, 21.0).unwrap();
        let ring = bbox.to_polygon();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
        assert_eq!(ring[2], [21.0, 11.0]);
    }

    #[test]
    fn test_bounding_box_contains() {
        let bbox = BoundingBox::new(10.0, 11.0, 20.0, 21.0).unwrap();
        assert!(bbox.contains(&Coordinates::new(20.5, 10.5)));
        assert!(!bbox.contains(&Coordinates::new(22.0, 10.5)));

        let across = BoundingBox::new(-1.0, 1.0, 179.0, -179.0).unwrap();
        assert!(across.contains(&Coordinates::new(179.5, 0.0)));
        assert!(across.contains(&Coordinates::new(-179.5, 0.0)));
        assert!(!across.contains(&Coordinates::new(0.0, 0.0)));
    }

    #[test]
    fn test_inverted_box_is_rejected() {
        assert!(BoundingBox::new(11.0, 10.0, 20.0, 21.0).is_none());
        assert!(BoundingBox::new(f64::NAN, 10.0, 20.0, 21.0).is_none());
    }
}
