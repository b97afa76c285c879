//! Planner configuration: walking radii, fares and ranking cost model.

/// Which terms the distance cost of an itinerary includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostModel {
    /// Count the walk to the first leg, the walks between legs and the walk
    /// from the last leg as distance. When false only ridden kilometres are
    /// counted.
    pub include_walking_in_distance: bool,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            include_walking_in_distance: true,
        }
    }
}

/// Configuration parameters for trip planning.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Transfer and approach radius (km). Also the first radius tried when
    /// widening.
    pub max_walkable_km: f64,

    /// Largest radius the widening loop will try (km).
    pub max_allowable_km: f64,

    /// How much the widening loop grows a radius per attempt (km).
    pub radius_step_km: f64,

    /// Flat boarding fare for every line leg.
    pub base_fare: f64,

    /// Fare per ridden kilometre on a line leg.
    pub fare_per_km: f64,

    /// Flat fare for a tricycle zone leg.
    pub tricycle_fare: f64,

    /// Maximum number of itineraries to return.
    pub max_results: usize,

    pub cost_model: CostModel,
}

impl PlannerConfig {
    /// Create a new configuration with the given radii and fares.
    pub fn new(
        max_walkable_km: f64,
        max_allowable_km: f64,
        radius_step_km: f64,
        base_fare: f64,
        fare_per_km: f64,
        tricycle_fare: f64,
        max_results: usize,
    ) -> Self {
        Self {
            max_walkable_km,
            max_allowable_km,
            radius_step_km,
            base_fare,
            fare_per_km,
            tricycle_fare,
            max_results,
            cost_model: CostModel::default(),
        }
    }

    pub fn with_max_walkable_km(mut self, km: f64) -> Self {
        self.max_walkable_km = km;
        self
    }

    pub fn with_max_allowable_km(mut self, km: f64) -> Self {
        self.max_allowable_km = km;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_cost_model(mut self, cost_model: CostModel) -> Self {
        self.cost_model = cost_model;
        self
    }

    /// Fare for one line leg of the given ridden length.
    pub fn line_fare(&self, km: f64) -> f64 {
        self.base_fare + self.fare_per_km * km
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_walkable_km: 0.5,
            max_allowable_km: 2.0,
            radius_step_km: 0.2,
            base_fare: 12.0,
            fare_per_km: 1.5,
            tricycle_fare: 10.0,
            max_results: 10,
            cost_model: CostModel::default(),
        }
    }
}
