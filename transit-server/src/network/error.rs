//! Network error types.
//!
//! Apart from I/O, these all indicate a data-integrity defect in a network
//! model and are never swallowed.

use crate::geometry::GeometryError;
use crate::route::GeoJsonError;

/// Errors from building, loading or querying a network model.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// A node with this name already exists
    #[error("duplicate route name: {0}")]
    DuplicateNode(String),

    /// An edge or query refers to a route that is not a node
    #[error("unknown route: {0}")]
    UnknownNode(String),

    /// Node map is not a dense `0..n` index over the node list
    #[error("node map is inconsistent with the node list: {0}")]
    InconsistentNodeMap(String),

    /// Shortest-path tables do not match the node count
    #[error("{context} has {found} entries, expected {expected}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    /// Next-hop table refers to a node index out of range
    #[error("next-hop entry {from} -> {to} refers to node {hop}, but there are only {len} nodes")]
    InvalidNextHop {
        from: usize,
        to: usize,
        hop: usize,
        len: usize,
    },

    /// Path reconstruction hit a missing next hop part-way
    #[error("next-hop table has no entry from node {at} towards node {to}")]
    BrokenPath { at: usize, to: usize },

    /// Path reconstruction exceeded the node count (cyclic next-hop table)
    #[error("path from node {from} to node {to} exceeds {limit} steps")]
    PathTooLong { from: usize, to: usize, limit: usize },

    /// A route in the model has invalid geometry
    #[error("route {name:?} is invalid: {source}")]
    InvalidRoute {
        name: String,
        #[source]
        source: GeometryError,
    },

    /// Importing the network dataset failed
    #[error("failed to import network: {0}")]
    Import(#[from] GeoJsonError),

    /// Reading or writing a model file failed
    #[error("model file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Model file is not valid JSON for a network model
    #[error("model file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}
