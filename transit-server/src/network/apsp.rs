//! All-pairs shortest paths (Floyd–Warshall) with next-hop reconstruction.

use serde::{Deserialize, Serialize};

use super::{Graph, NetworkError};

/// Shortest-path costs and next hops between every pair of nodes.
///
/// `matrix[i][j]` is the cheapest path cost from `i` to `j` (infinite when
/// unreachable, zero on the diagonal). `next[i][j]` is the node to move to
/// immediately after `i` on that path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShortestPaths {
    #[serde(with = "infinite_as_null")]
    matrix: Vec<Vec<f64>>,
    next: Vec<Vec<Option<usize>>>,
}

impl ShortestPaths {
    /// Runs Floyd–Warshall over `graph`. `O(n³)` in the node count.
    ///
    /// Parallel edges keep the cheaper weight.
    pub fn compute(graph: &Graph) -> Self {
        let n = graph.len();
        let mut matrix = vec![vec![f64::INFINITY; n]; n];
        let mut next = vec![vec![None; n]; n];

        for edge in graph.edges() {
            let (Some(u), Some(v)) = (graph.index_of(&edge.u), graph.index_of(&edge.v)) else {
                continue;
            };
            if edge.weight < matrix[u][v] {
                matrix[u][v] = edge.weight;
                next[u][v] = Some(v);
            }
        }

        for i in 0..n {
            matrix[i][i] = 0.0;
            next[i][i] = Some(i);
        }

        for k in 0..n {
            let via_k = matrix[k].clone();
            for i in 0..n {
                let to_k = matrix[i][k];
                if to_k == f64::INFINITY {
                    continue;
                }
                for j in 0..n {
                    let candidate = to_k + via_k[j];
                    if candidate < matrix[i][j] {
                        matrix[i][j] = candidate;
                        next[i][j] = next[i][k];
                    }
                }
            }
        }

        Self { matrix, next }
    }

    /// Number of nodes the tables cover.
    pub fn len(&self) -> usize {
        self.matrix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    /// Shortest path cost, or `None` if either index is out of range.
    pub fn distance(&self, from: usize, to: usize) -> Option<f64> {
        self.matrix.get(from)?.get(to).copied()
    }

    /// Node indices along the shortest path from `from` to `to`, both
    /// included. Empty when `to` is unreachable.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the next-hop table is broken: a missing hop part-way
    /// along a path, or a path longer than the node count.
    pub fn path(&self, from: usize, to: usize) -> Result<Vec<usize>, NetworkError> {
        let limit = self.len();
        let hop = |at: usize| self.next.get(at).and_then(|row| row.get(to)).copied().flatten();

        if from >= limit || to >= limit {
            return Ok(Vec::new());
        }
        if hop(from).is_none() {
            return Ok(Vec::new());
        }

        let mut path = vec![from];
        let mut current = from;
        while current != to {
            if path.len() > limit {
                return Err(NetworkError::PathTooLong { from, to, limit });
            }
            current = hop(current).ok_or(NetworkError::BrokenPath { at: current, to })?;
            path.push(current);
        }
        Ok(path)
    }

    /// Checks that both tables are `n × n` and every next hop is a node.
    pub fn validate(&self, n: usize) -> Result<(), NetworkError> {
        check_square(self.matrix.iter().map(Vec::len), self.matrix.len(), n, "distance matrix")?;
        check_square(self.next.iter().map(Vec::len), self.next.len(), n, "next-hop table")?;

        for (from, row) in self.next.iter().enumerate() {
            for (to, hop) in row.iter().enumerate() {
                if let Some(hop) = hop.filter(|&hop| hop >= n) {
                    return Err(NetworkError::InvalidNextHop { from, to, hop, len: n });
                }
            }
        }
        Ok(())
    }
}

fn check_square(
    row_lens: impl Iterator<Item = usize>,
    rows: usize,
    n: usize,
    context: &'static str,
) -> Result<(), NetworkError> {
    if rows != n {
        return Err(NetworkError::DimensionMismatch {
            context,
            expected: n,
            found: rows,
        });
    }
    for found in row_lens {
        if found != n {
            return Err(NetworkError::DimensionMismatch {
                context,
                expected: n,
                found,
            });
        }
    }
    Ok(())
}

/// Serializes infinite costs as JSON `null`.
mod infinite_as_null {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(matrix: &[Vec<f64>], serializer: S) -> Result<S::Ok, S::Error> {
        let rows: Vec<Vec<Option<f64>>> = matrix
            .iter()
            .map(|row| row.iter().map(|&d| d.is_finite().then_some(d)).collect())
            .collect();
        rows.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<f64>>, D::Error> {
        let rows = Vec::<Vec<Option<f64>>>::deserialize(deserializer)?;
        Ok(rows
            .into_iter()
            .map(|row| row.into_iter().map(|d| d.unwrap_or(f64::INFINITY)).collect())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::route::Route;

    fn graph(names: &[&str], edges: &[(&str, &str, f64)]) -> Graph {
        let mut graph = Graph::new();
        for (i, name) in names.iter().enumerate() {
            let lat = i as f64;
            graph
                .add_node(Route::line(*name, vec![Point::new(lat, 0.0), Point::new(lat, 1.0)]))
                .unwrap();
        }
        for (a, b, w) in edges {
            graph.add_edge(a, b, *w).unwrap();
        }
        graph
    }

    #[test]
    fn chain_paths() {
        let g = graph(&["A", "B", "C"], &[("A", "B", 1.0), ("B", "C", 2.0)]);
        let paths = ShortestPaths::compute(&g);

        assert_eq!(paths.distance(0, 2), Some(3.0));
        assert_eq!(paths.distance(1, 1), Some(0.0));
        assert_eq!(paths.path(0, 2).unwrap(), vec![0, 1, 2]);
        assert_eq!(paths.path(2, 0).unwrap(), vec![2, 1, 0]);
        assert_eq!(paths.path(1, 1).unwrap(), vec![1]);
    }

    #[test]
    fn shortcut_beats_direct_edge() {
        let g = graph(
            &["A", "B", "C"],
            &[("A", "C", 10.0), ("A", "B", 1.0), ("B", "C", 1.0)],
        );
        let paths = ShortestPaths::compute(&g);
        assert_eq!(paths.distance(0, 2), Some(2.0));
        assert_eq!(paths.path(0, 2).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn parallel_edges_keep_cheapest() {
        let g = graph(&["A", "B"], &[("A", "B", 5.0), ("A", "B", 2.0), ("A", "B", 7.0)]);
        let paths = ShortestPaths::compute(&g);
        assert_eq!(paths.distance(0, 1), Some(2.0));
    }

    #[test]
    fn unreachable_pair_has_empty_path() {
        let g = graph(&["A", "B", "C"], &[("A", "B", 1.0)]);
        let paths = ShortestPaths::compute(&g);
        assert_eq!(paths.distance(0, 2), Some(f64::INFINITY));
        assert!(paths.path(0, 2).unwrap().is_empty());
        assert!(paths.path(0, 9).unwrap().is_empty());
    }

    #[test]
    fn cyclic_next_table_fails() {
        let paths = ShortestPaths {
            matrix: vec![vec![0.0, 1.0, 1.0]; 3],
            next: vec![
                vec![Some(0), Some(1), Some(1)],
                vec![Some(0), Some(1), Some(0)],
                vec![Some(0), Some(1), Some(2)],
            ],
        };
        assert!(matches!(
            paths.path(0, 2),
            Err(NetworkError::PathTooLong { from: 0, to: 2, limit: 3 })
        ));
    }

    #[test]
    fn broken_next_table_fails() {
        let paths = ShortestPaths {
            matrix: vec![vec![0.0; 3]; 3],
            next: vec![
                vec![Some(0), Some(1), Some(1)],
                vec![Some(0), Some(1), None],
                vec![Some(0), Some(1), Some(2)],
            ],
        };
        assert!(matches!(
            paths.path(0, 2),
            Err(NetworkError::BrokenPath { at: 1, to: 2 })
        ));
    }

    #[test]
    fn validate_checks_dimensions() {
        let g = graph(&["A", "B"], &[("A", "B", 1.0)]);
        let paths = ShortestPaths::compute(&g);
        assert!(paths.validate(2).is_ok());
        assert!(matches!(
            paths.validate(3),
            Err(NetworkError::DimensionMismatch { expected: 3, found: 2, .. })
        ));

        let mut ragged = paths.clone();
        ragged.next[1].pop();
        assert!(matches!(
            ragged.validate(2),
            Err(NetworkError::DimensionMismatch { context: "next-hop table", .. })
        ));

        let mut bad_hop = paths;
        bad_hop.next[0][1] = Some(7);
        assert!(matches!(
            bad_hop.validate(2),
            Err(NetworkError::InvalidNextHop { hop: 7, .. })
        ));
    }

    #[test]
    fn infinity_serializes_as_null() {
        let g = graph(&["A", "B"], &[]);
        let paths = ShortestPaths::compute(&g);

        let json = serde_json::to_value(&paths).unwrap();
        assert_eq!(json["matrix"][0][1], serde_json::Value::Null);
        assert_eq!(json["next"][0][1], serde_json::Value::Null);

        let back: ShortestPaths = serde_json::from_value(json).unwrap();
        assert_eq!(back, paths);
    }
}
