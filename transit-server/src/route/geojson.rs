//! Mapping between routes and GeoJSON features.
//!
//! Lines map to `LineString` features and zones to single-ring `Polygon`
//! features. GeoJSON positions are `[lon, lat]`; routes store `(lat, lon)`.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};

use crate::geometry::{GeometryError, Point};

use super::{Route, Shape};

/// Errors from importing GeoJSON features.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeoJsonError {
    /// Feature has no geometry
    #[error("feature {0:?} has no geometry")]
    MissingGeometry(String),

    /// Feature has no string `name` property
    #[error("feature has no name property")]
    MissingName,

    /// Geometry is neither a LineString nor a Polygon
    #[error("feature {name:?} has unsupported geometry type {kind}")]
    UnsupportedGeometry { name: String, kind: &'static str },

    /// Position with fewer than two coordinates
    #[error("feature {0:?} has a position with fewer than two coordinates")]
    MalformedPosition(String),

    /// Polygon ring is invalid
    #[error("feature {name:?} has an invalid ring: {source}")]
    InvalidRing {
        name: String,
        #[source]
        source: GeometryError,
    },
}

fn geometry_kind(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn to_points(name: &str, positions: &[Vec<f64>]) -> Result<Vec<Point>, GeoJsonError> {
    positions
        .iter()
        .map(|position| match position.as_slice() {
            [lon, lat, ..] => Ok(Point::new(*lat, *lon)),
            _ => Err(GeoJsonError::MalformedPosition(name.to_string())),
        })
        .collect()
}

fn to_positions(points: &[Point]) -> Vec<Vec<f64>> {
    points.iter().map(|p| vec![p.lon, p.lat]).collect()
}

impl Route {
    /// Builds a route from a GeoJSON feature.
    ///
    /// Only the outer ring of a polygon is used.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the feature lacks a name or geometry, uses another
    /// geometry type, or has an open polygon ring.
    pub fn from_feature(feature: &Feature) -> Result<Route, GeoJsonError> {
        let name = feature
            .properties
            .as_ref()
            .and_then(|props| props.get("name"))
            .and_then(JsonValue::as_str)
            .ok_or(GeoJsonError::MissingName)?
            .to_string();

        let geometry = feature
            .geometry
            .as_ref()
            .ok_or_else(|| GeoJsonError::MissingGeometry(name.clone()))?;

        match &geometry.value {
            Value::LineString(positions) => {
                let points = to_points(&name, positions)?;
                Ok(Route::line(name, points))
            }
            Value::Polygon(rings) => {
                let ring = rings.first().map(Vec::as_slice).unwrap_or_default();
                let points = to_points(&name, ring)?;
                Route::zone(name.clone(), points)
                    .map_err(|source| GeoJsonError::InvalidRing { name, source })
            }
            other => Err(GeoJsonError::UnsupportedGeometry {
                name,
                kind: geometry_kind(other),
            }),
        }
    }

    /// Converts this route into a GeoJSON feature with a `name` property.
    pub fn to_feature(&self) -> Feature {
        let value = match self.shape() {
            Shape::Line(points) => Value::LineString(to_positions(points)),
            Shape::Zone(ring) => Value::Polygon(vec![to_positions(ring)]),
        };

        let mut properties = JsonObject::new();
        properties.insert("name".to_string(), self.name().into());

        Feature {
            bbox: None,
            geometry: Some(Geometry::new(value)),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

/// Imports every feature of a collection as a route.
pub fn routes_from_collection(collection: &FeatureCollection) -> Result<Vec<Route>, GeoJsonError> {
    collection.features.iter().map(Route::from_feature).collect()
}

/// Wraps ordered routes (such as the legs of one itinerary) in a collection.
pub fn itinerary_collection(routes: &[Route]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: routes.iter().map(Route::to_feature).collect(),
        foreign_members: None,
    }
}
