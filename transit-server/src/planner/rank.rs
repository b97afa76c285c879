//! Itinerary ranking.
//!
//! Ranks itineraries by the rider's chosen priority to present the most
//! useful options first.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

use super::config::PlannerConfig;
use super::itinerary::Itinerary;

/// What the rider wants to minimise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    /// Total fare
    #[default]
    Fare,
    /// Distance ridden and walked
    Distance,
    /// Number of legs
    Transfers,
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FARE" => Ok(Priority::Fare),
            "DISTANCE" => Ok(Priority::Distance),
            "TRANSFERS" => Ok(Priority::Transfers),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Priority::Fare => "FARE",
            Priority::Distance => "DISTANCE",
            Priority::Transfers => "TRANSFERS",
        })
    }
}

/// Precomputed sort key for one itinerary.
///
/// Compared field by field. `group` is the leg count for the transfers
/// priority and the near-tie group for the distance priority.
#[derive(Debug, Clone, Copy)]
struct RankKey {
    group: usize,
    primary: f64,
    legs: usize,
    secondary: f64,
}

impl RankKey {
    fn new(
        itinerary: &Itinerary,
        priority: Priority,
        source: Point,
        destination: Point,
        config: &PlannerConfig,
    ) -> Self {
        let legs = itinerary.leg_count();
        match priority {
            Priority::Fare => RankKey {
                group: 0,
                primary: itinerary.fare(config),
                legs,
                secondary: itinerary.ridden_km(),
            },
            Priority::Transfers => RankKey {
                group: legs,
                primary: 0.0,
                legs,
                secondary: itinerary.fare(config),
            },
            // Groups are assigned once every cost is known
            Priority::Distance => RankKey {
                group: 0,
                primary: 0.0,
                legs,
                secondary: itinerary.distance_cost(source, destination, config),
            },
        }
    }

    fn cmp(&self, other: &Self) -> Ordering {
        self.group
            .cmp(&other.group)
            .then_with(|| self.primary.total_cmp(&other.primary))
            .then_with(|| self.legs.cmp(&other.legs))
            .then_with(|| self.secondary.total_cmp(&other.secondary))
    }
}

/// Sorts by distance cost and starts a new group whenever a cost is at
/// least `tie_km` above the cheapest cost of the current group.
fn assign_near_tie_groups(keyed: &mut [(RankKey, Itinerary)], tie_km: f64) {
    keyed.sort_by(|a, b| a.0.secondary.total_cmp(&b.0.secondary));

    let mut group = 0;
    let mut cheapest = None;
    for (key, _) in keyed.iter_mut() {
        match cheapest {
            Some(c) if key.secondary - c < tie_km => {}
            Some(_) => {
                group += 1;
                cheapest = Some(key.secondary);
            }
            None => cheapest = Some(key.secondary),
        }
        key.group = group;
    }
}

/// Rank itineraries by preference.
///
/// - `Fare`: total fare, then fewer legs, then shorter ridden distance.
/// - `Transfers`: fewer legs, then total fare.
/// - `Distance`: total distance (walking included per the cost model).
///   Costs less than one walkable radius above the cheapest trip of their
///   group count as tied and are ordered by fewer legs, then distance.
///
/// The sort is stable: equal itineraries keep their input order.
pub fn rank_itineraries(
    itineraries: Vec<Itinerary>,
    priority: Priority,
    source: Point,
    destination: Point,
    config: &PlannerConfig,
) -> Vec<Itinerary> {
    let mut keyed: Vec<(RankKey, Itinerary)> = itineraries
        .into_iter()
        .map(|itinerary| {
            let key = RankKey::new(&itinerary, priority, source, destination, config);
            (key, itinerary)
        })
        .collect();

    if priority == Priority::Distance {
        assign_near_tie_groups(&mut keyed, config.max_walkable_km);
    }

    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, itinerary)| itinerary).collect()
}

/// Remove itineraries with the same legs, in the same order, with the same
/// geometry. Keeps the first occurrence.
pub fn deduplicate(itineraries: Vec<Itinerary>) -> Vec<Itinerary> {
    let mut result: Vec<Itinerary> = Vec::with_capacity(itineraries.len());
    for itinerary in itineraries {
        if !result.contains(&itinerary) {
            result.push(itinerary);
        }
    }
    result
}
