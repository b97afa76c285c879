//! The transit network: route graph and shortest-path tables.
//!
//! The network is built once per dataset (offline), persisted, and loaded
//! read-only at query time. Requests borrow it immutably and only ever work
//! on owned copies of the routes they touch.

mod apsp;
mod error;
mod graph;
mod model;

pub use apsp::ShortestPaths;
pub use error::NetworkError;
pub use graph::{Edge, Graph, Weighting};
pub use model::NetworkModel;
