//! Route geometries.
//!
//! A route is a named transit line (an ordered polyline) or a tricycle zone
//! (a closed polygon). Every transformation returns a fresh `Route` with its
//! own point vector, so shared network routes are never modified.

mod anchor;
mod geojson;
mod shape;

pub use anchor::{Anchor, Traversal};
pub use geojson::{GeoJsonError, itinerary_collection, routes_from_collection};
pub use shape::{Route, Shape};
