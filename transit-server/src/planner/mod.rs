//! Trip planner over a precomputed route network.
//!
//! This module answers: "I'm standing here - which jeepneys, and which
//! tricycle zones, get me there?"
//!
//! Candidate routes are picked around both endpoints, each candidate pair
//! is joined along its shortest path in the network, and the assembled
//! trips are ranked by fare, distance or number of transfers. When nothing
//! is found, the walking radii are widened step by step.

mod assemble;
mod config;
mod itinerary;
mod optimizer;
mod rank;
mod widen;


pub use assemble::{TripEnds, merge_routes};
pub use config::{CostModel, PlannerConfig};
pub use itinerary::Itinerary;
pub use optimizer::{PlanError, PlanRequest, PlanResult, Planner};
pub use rank::{Priority, deduplicate, rank_itineraries};
pub use widen::{WidenedSearch, search_with_widening};
