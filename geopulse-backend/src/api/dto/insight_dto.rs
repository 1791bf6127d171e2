// src/api/dto/insight_dto.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JourneyInsights {
    pub distance_traveled: DistanceTraveled,
    pub activity_patterns: ActivityPatterns,
    pub geographic: GeographicInsights,
    pub achievements: Vec<Achievement>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DistanceTraveled {
    pub total_km: f64,
    pub daily_average_km: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPatterns {
    pub active_days: u32,
    pub longest_streak_days: u32,
    pub current_streak_days: u32,
    pub most_active_weekday: Option<String>,
    pub first_tracked_at: Option<DateTime<Utc>>,
    pub last_tracked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GeographicInsights {
    pub places_visited: u32,
    pub cities: Vec<String>,
    pub countries: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub earned: bool,
    pub progress: f64,
    pub target: f64,
}
