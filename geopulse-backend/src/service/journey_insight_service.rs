// src/service/journey_insight_service.rs

use crate::api::dto::insight_dto::{
    Achievement, ActivityPatterns, DistanceTraveled, GeographicInsights, JourneyInsights,
};
use crate::db::DbPool;
use crate::domain::favorite_location_model;
use crate::domain::favorite_type::FavoriteType;
use crate::domain::gps_point_model;
use crate::error::AppResult;
use crate::repository::favorite_repository::FavoriteRepository;
use crate::repository::gps_point_repository::GpsPointRepository;
use crate::utils::geo::{degree_window, haversine_distance_meters, BoundingBox, Coordinates};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Segments implying a faster speed are treated as GPS glitches.
pub const MAX_PLAUSIBLE_SPEED_KMH: f64 = 1200.0;
/// A point favorite counts as visited when a point lies this close to it.
pub const FAVORITE_VISIT_RADIUS_METERS: f64 = 75.0;

const TRACK_BATCH_SIZE: u64 = 1000;
const VISIT_CANDIDATE_BATCH_SIZE: u64 = 200;

pub struct JourneyInsightService {
    point_repo: Arc<GpsPointRepository>,
    favorite_repo: Arc<FavoriteRepository>,
}

impl JourneyInsightService {
    pub fn new(db_pool: DbPool) -> Self {
        Self {
            point_repo: Arc::new(GpsPointRepository::new(db_pool.clone())),
            favorite_repo: Arc::new(FavoriteRepository::new(db_pool)),
        }
    }

    pub async fn get_journey_insights(&self, user_id: Uuid) -> AppResult<JourneyInsights> {
        let track = self.summarize_track(user_id).await?;

        let favorites = self.favorite_repo.find_all_for_user(user_id, None).await?;
        let mut visited = Vec::new();
        for favorite in &favorites {
            if self.was_visited(user_id, favorite).await? {
                visited.push(favorite);
            }
        }

        debug!(
            user_id = %user_id,
            points = track.point_count,
            favorites = favorites.len(),
            visited = visited.len(),
            "Computed journey insights"
        );

        Ok(build_insights(
            &track,
            geographic_insights(&visited),
            Utc::now().date_naive(),
        ))
    }

    /// Folds the whole track in time order, one batch in memory at a time.
    async fn summarize_track(&self, user_id: Uuid) -> AppResult<TrackSummary> {
        let mut summary = TrackSummary::default();
        let mut after = None;

        loop {
            let batch = self
                .point_repo
                .find_track_batch(user_id, None, after, TRACK_BATCH_SIZE)
                .await?;
            for point in &batch {
                summary.push(point);
            }
            match batch.last() {
                Some(last) if batch.len() as u64 == TRACK_BATCH_SIZE => after = Some(last.timestamp),
                _ => break,
            }
        }

        Ok(summary)
    }

    /// Only points inside the favorite's search box are loaded.
    async fn was_visited(
        &self,
        user_id: Uuid,
        favorite: &favorite_location_model::Model,
    ) -> AppResult<bool> {
        let Some(search_box) = visit_search_box(favorite) else {
            return Ok(false);
        };

        let mut after = None;
        loop {
            let candidates = self
                .point_repo
                .find_track_batch(user_id, Some(&search_box), after, VISIT_CANDIDATE_BATCH_SIZE)
                .await?;
            if candidates.iter().any(|point| is_visit(favorite, point)) {
                return Ok(true);
            }
            match candidates.last() {
                Some(last) if candidates.len() as u64 == VISIT_CANDIDATE_BATCH_SIZE => {
                    after = Some(last.timestamp)
                }
                _ => return Ok(false),
            }
        }
    }
}

/// Running totals over a time-ordered track
#[derive(Debug, Clone, Default)]
pub(crate) struct TrackSummary {
    point_count: usize,
    total_km: f64,
    previous: Option<(f64, f64, DateTime<Utc>)>,
    days: BTreeSet<NaiveDate>,
    weekday_counts: [usize; 7],
    first_tracked_at: Option<DateTime<Utc>>,
    last_tracked_at: Option<DateTime<Utc>>,
}

impl TrackSummary {
    /// Points must arrive oldest first.
    pub(crate) fn push(&mut self, point: &gps_point_model::Model) {
        if let Some((lat, lon, timestamp)) = self.previous {
            self.total_km += segment_km(lat, lon, timestamp, point);
        }
        self.previous = Some((point.latitude, point.longitude, point.timestamp));

        self.point_count += 1;
        self.days.insert(point.timestamp.date_naive());
        self.weekday_counts[point.timestamp.weekday().num_days_from_monday() as usize] += 1;
        self.first_tracked_at.get_or_insert(point.timestamp);
        self.last_tracked_at = Some(point.timestamp);
    }
}

/// Haversine length of one segment, zero for implausible jumps.
fn segment_km(lat: f64, lon: f64, timestamp: DateTime<Utc>, next: &gps_point_model::Model) -> f64 {
    let meters = haversine_distance_meters(lat, lon, next.latitude, next.longitude);
    let seconds = (next.timestamp - timestamp).num_milliseconds() as f64 / 1000.0;
    if seconds <= 0.0 {
        return 0.0;
    }
    let speed_kmh = (meters / 1000.0) / (seconds / 3600.0);
    if speed_kmh <= MAX_PLAUSIBLE_SPEED_KMH {
        meters / 1000.0
    } else {
        0.0
    }
}

pub(crate) fn build_insights(
    track: &TrackSummary,
    geographic: GeographicInsights,
    today: NaiveDate,
) -> JourneyInsights {
    let activity_patterns = activity_patterns(track, today);

    let daily_average_km = if activity_patterns.active_days > 0 {
        track.total_km / f64::from(activity_patterns.active_days)
    } else {
        0.0
    };

    let achievements = achievements(
        track.point_count,
        track.total_km,
        &activity_patterns,
        &geographic,
    );

    JourneyInsights {
        distance_traveled: DistanceTraveled {
            total_km: round2(track.total_km),
            daily_average_km: round2(daily_average_km),
        },
        activity_patterns,
        geographic,
        achievements,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn activity_patterns(track: &TrackSummary, today: NaiveDate) -> ActivityPatterns {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut previous: Option<NaiveDate> = None;
    for day in &track.days {
        run = match previous {
            Some(prev) if *day - prev == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(*day);
    }

    // a streak is still current if it ended today or yesterday
    let current = match previous {
        Some(last) if today - last <= Duration::days(1) => run,
        _ => 0,
    };

    // ties go to the earlier weekday
    let most_active_weekday = track
        .weekday_counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
        .map(|(day, _)| WEEKDAY_NAMES[day].to_string());

    ActivityPatterns {
        active_days: track.days.len() as u32,
        longest_streak_days: longest,
        current_streak_days: current,
        most_active_weekday,
        first_tracked_at: track.first_tracked_at,
        last_tracked_at: track.last_tracked_at,
    }
}

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Box that holds every point able to count as a visit of `favorite`.
pub(crate) fn visit_search_box(favorite: &favorite_location_model::Model) -> Option<BoundingBox> {
    match favorite.kind()? {
        FavoriteType::Area => favorite.area(),
        FavoriteType::Point => {
            let center = favorite.point()?;
            let (lat_delta, lon_delta) =
                degree_window(center.latitude, FAVORITE_VISIT_RADIUS_METERS);
            BoundingBox::new(
                (center.latitude - lat_delta).max(-90.0),
                (center.latitude + lat_delta).min(90.0),
                wrap_longitude(center.longitude - lon_delta),
                wrap_longitude(center.longitude + lon_delta),
            )
        }
    }
}

fn wrap_longitude(longitude: f64) -> f64 {
    if longitude > 180.0 {
        longitude - 360.0
    } else if longitude < -180.0 {
        longitude + 360.0
    } else {
        longitude
    }
}

pub(crate) fn is_visit(favorite: &favorite_location_model::Model, point: &gps_point_model::Model) -> bool {
    let position = Coordinates::new(point.longitude, point.latitude);
    match favorite.kind() {
        Some(FavoriteType::Point) => favorite
            .point()
            .is_some_and(|center| position.distance_meters(&center) <= FAVORITE_VISIT_RADIUS_METERS),
        Some(FavoriteType::Area) => favorite.area().is_some_and(|area| area.contains(&position)),
        None => false,
    }
}

pub(crate) fn geographic_insights(visited: &[&favorite_location_model::Model]) -> GeographicInsights {
    let cities: BTreeSet<String> = visited.iter().filter_map(|f| f.city.clone()).collect();
    let countries: BTreeSet<String> = visited.iter().filter_map(|f| f.country.clone()).collect();

    GeographicInsights {
        places_visited: visited.len() as u32,
        cities: cities.into_iter().collect(),
        countries: countries.into_iter().collect(),
    }
}

fn achievements(
    point_count: usize,
    total_km: f64,
    activity: &ActivityPatterns,
    geographic: &GeographicInsights,
) -> Vec<Achievement> {
    let achievement = |id: &str, title: &str, description: &str, value: f64, target: f64| {
        Achievement {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            earned: value >= target,
            progress: round2(value.min(target)),
            target,
        }
    };

    vec![
        achievement(
            "first_steps",
            "First Steps",
            "Record your first GPS point",
            point_count.min(1) as f64,
            1.0,
        ),
        achievement("century", "Century", "Travel 100 km", total_km, 100.0),
        achievement("explorer", "Explorer", "Travel 1,000 km", total_km, 1000.0),
        achievement(
            "week_streak",
            "Week Streak",
            "Track your location 7 days in a row",
            f64::from(activity.longest_streak_days),
            7.0,
        ),
        achievement(
            "regular",
            "Regular",
            "Visit 5 of your favorite places",
            f64::from(geographic.places_visited),
            5.0,
        ),
        achievement(
            "globetrotter",
            "Globetrotter",
            "Visit favorite places in 3 countries",
            geographic.countries.len() as f64,
            3.0,
        ),
    ]
}
