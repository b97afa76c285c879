//! Data transfer objects for web requests and responses.

use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::planner::WidenedSearch;

/// Query for `GET /find`.
#[derive(Debug, Deserialize)]
pub struct FindRequest {
    /// Source as `lat,lon`
    pub src: String,

    /// Destination as `lat,lon`
    pub dest: String,

    /// FARE, DISTANCE or TRANSFERS (defaults to FARE)
    pub priority: Option<String>,
}

/// Parses a `lat,lon` pair and checks it is a real coordinate.
pub fn parse_point(input: &str) -> Result<Point, String> {
    let (lat, lon) = input
        .split_once(',')
        .ok_or_else(|| format!("expected `lat,lon`, got `{input}`"))?;

    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate `{}`: {e}", part.trim()))
    };
    let point = Point::new(parse(lat)?, parse(lon)?);

    if !point.is_valid() {
        return Err(format!("coordinate {point} is out of range"));
    }
    Ok(point)
}

/// Walking radii used by the final search attempt.
#[derive(Debug, Clone, Serialize)]
pub struct RadiusDto {
    pub source: f64,
    pub destination: f64,
}

/// Response for `GET /find`.
#[derive(Debug, Clone, Serialize)]
pub struct FindResponse {
    /// Routes that could be boarded near the source
    pub source: Vec<String>,

    /// Routes that could be left near the destination
    pub destination: Vec<String>,

    pub radius: RadiusDto,

    /// Number of planner runs
    pub attempts: usize,

    /// One feature collection per trip, best first
    pub output: Vec<FeatureCollection>,
}

impl FindResponse {
    /// Create from a finished search.
    pub fn from_search(search: &WidenedSearch) -> Self {
        Self {
            source: search.result.source_routes.clone(),
            destination: search.result.destination_routes.clone(),
            radius: RadiusDto {
                source: search.source_radius_km,
                destination: search.destination_radius_km,
            },
            attempts: search.attempts,
            output: search
                .result
                .itineraries
                .iter()
                .map(|itinerary| itinerary.to_feature_collection())
                .collect(),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
