//! Route graph: one node per route, symmetric weighted edges between
//! routes a rider can transfer between on foot.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::planner::PlannerConfig;
use crate::route::Route;

use super::NetworkError;

/// A directed edge between two routes, by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub u: String,
    pub v: String,
    pub weight: f64,
}

/// How edges are weighted when a graph is built from routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weighting {
    /// Every walkable pair costs 1, so path cost counts transfers
    Walkability,
    /// Sum of each route's approach distance to the other
    #[default]
    Distance,
    /// Boarding fare plus the per-kilometre rate over the approach distance
    Fare,
}

impl FromStr for Weighting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "walkability" | "transfers" => Ok(Weighting::Walkability),
            "distance" => Ok(Weighting::Distance),
            "fare" => Ok(Weighting::Fare),
            other => Err(format!("unknown weighting: {other}")),
        }
    }
}

impl Weighting {
    /// Weight of the edge between two walkable routes.
    fn weight(self, a: &Route, b: &Route, config: &PlannerConfig) -> f64 {
        let approach = || a.approach_distance(b) + b.approach_distance(a);
        match self {
            Weighting::Walkability => 1.0,
            Weighting::Distance => approach(),
            Weighting::Fare => config.base_fare + config.fare_per_km * approach(),
        }
    }
}

/// Routes plus the walkable connections between them.
///
/// Node indices are dense `0..n` in insertion order and are the indices used
/// by the shortest-path tables. Every undirected connection is stored as two
/// directed edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    nodes: Vec<Route>,
    edges: Vec<Edge>,
    node_map: HashMap<String, usize>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph over `routes`, connecting every unordered pair of
    /// routes that are walkable to one another.
    ///
    /// # Errors
    ///
    /// Returns `Err` if two routes share a name.
    pub fn from_routes(
        routes: Vec<Route>,
        weighting: Weighting,
        config: &PlannerConfig,
    ) -> Result<Self, NetworkError> {
        let mut graph = Graph::new();
        for route in routes {
            graph.add_node(route)?;
        }

        let n = graph.nodes.len();
        let mut connections = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (&graph.nodes[i], &graph.nodes[j]);
                if a.is_walkable_to(b, config.max_walkable_km) {
                    connections.push((i, j, weighting.weight(a, b, config)));
                }
            }
            debug!(node = i, of = n, "connected node");
        }

        for (i, j, weight) in connections {
            graph.push_edge(i, j, weight);
        }

        info!(
            nodes = graph.len(),
            connections = graph.edges.len() / 2,
            ?weighting,
            "built route graph"
        );
        Ok(graph)
    }

    /// Appends a route and returns its index.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a route with the same name is already present.
    pub fn add_node(&mut self, route: Route) -> Result<usize, NetworkError> {
        if self.node_map.contains_key(route.name()) {
            return Err(NetworkError::DuplicateNode(route.name().to_string()));
        }
        let index = self.nodes.len();
        self.node_map.insert(route.name().to_string(), index);
        self.nodes.push(route);
        Ok(index)
    }

    /// Connects two routes in both directions.
    ///
    /// # Errors
    ///
    /// Returns `Err` if either route is not a node.
    pub fn add_edge(&mut self, a: &str, b: &str, weight: f64) -> Result<(), NetworkError> {
        let i = self.require(a)?;
        let j = self.require(b)?;
        self.push_edge(i, j, weight);
        Ok(())
    }

    fn push_edge(&mut self, i: usize, j: usize, weight: f64) {
        let (u, v) = (self.nodes[i].name().to_string(), self.nodes[j].name().to_string());
        self.edges.push(Edge {
            u: u.clone(),
            v: v.clone(),
            weight,
        });
        self.edges.push(Edge {
            u: v,
            v: u,
            weight,
        });
    }

    fn require(&self, name: &str) -> Result<usize, NetworkError> {
        self.index_of(name)
            .ok_or_else(|| NetworkError::UnknownNode(name.to_string()))
    }

    /// Routes connected to `name`, one per neighbour name.
    ///
    /// When several edges lead to the same neighbour, the neighbour is
    /// listed at the position of the last such edge.
    pub fn find_neighbors(&self, name: &str) -> Vec<&Route> {
        let mut neighbors: Vec<&str> = Vec::new();
        for edge in &self.edges {
            let other = if edge.u == name {
                &edge.v
            } else if edge.v == name {
                &edge.u
            } else {
                continue;
            };
            neighbors.retain(|n| n != other);
            neighbors.push(other);
        }

        neighbors
            .into_iter()
            .filter_map(|n| self.node_by_name(n))
            .collect()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.node_map.get(name).copied()
    }

    pub fn node(&self, index: usize) -> Option<&Route> {
        self.nodes.get(index)
    }

    pub fn node_by_name(&self, name: &str) -> Option<&Route> {
        self.index_of(name).and_then(|i| self.node(i))
    }

    pub fn nodes(&self) -> &[Route] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Checks the graph's integrity: a dense node map matching the node
    /// list, valid route geometry, and edges between known nodes.
    pub fn validate(&self) -> Result<(), NetworkError> {
        if self.node_map.len() != self.nodes.len() {
            return Err(NetworkError::InconsistentNodeMap(format!(
                "{} names for {} nodes",
                self.node_map.len(),
                self.nodes.len()
            )));
        }
        for (index, route) in self.nodes.iter().enumerate() {
            if self.index_of(route.name()) != Some(index) {
                return Err(NetworkError::InconsistentNodeMap(format!(
                    "{:?} is not mapped to index {index}",
                    route.name()
                )));
            }
            route
                .validate()
                .map_err(|source| NetworkError::InvalidRoute {
                    name: route.name().to_string(),
                    source,
                })?;
        }
        for edge in &self.edges {
            self.require(&edge.u)?;
            self.require(&edge.v)?;
        }
        Ok(())
    }
}
