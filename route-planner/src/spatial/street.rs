//! Walkable street network.

use std::collections::BTreeMap;

use rstar::RTree;
use rstar::primitives::{GeomWithData, Line};

use crate::domain::GeoPoint;

use super::GeoDataError;
use super::index::feature_collection;

/// An edge leaving a street node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreetEdge {
    pub to: u64,
    pub length_m: f64,
}

/// Undirected street graph with nearest-node and nearest-edge lookup.
#[derive(Debug, Clone)]
pub struct StreetGraph {
    points: BTreeMap<u64, GeoPoint>,
    adjacency: BTreeMap<u64, Vec<StreetEdge>>,
    node_tree: RTree<GeomWithData<[f64; 2], u64>>,
    edge_tree: RTree<GeomWithData<Line<[f64; 2]>, (u64, u64)>>,
}

impl StreetGraph {
    /// Build a graph from nodes and undirected edges.
    ///
    /// Edges referencing unknown nodes, self-loops and zero-length edges
    /// are dropped. Lengths are great-circle distances.
    pub fn new(nodes: impl IntoIterator<Item = (u64, GeoPoint)>, edges: &[(u64, u64)]) -> Self {
        let points: BTreeMap<u64, GeoPoint> = nodes.into_iter().collect();
        let mut adjacency: BTreeMap<u64, Vec<StreetEdge>> = BTreeMap::new();
        let mut lines = Vec::new();

        for &(a, b) in edges {
            let (Some(pa), Some(pb)) = (points.get(&a), points.get(&b)) else {
                continue;
            };
            let length_m = pa.distance_m(pb);
            if a == b || length_m == 0.0 {
                continue;
            }
            adjacency.entry(a).or_default().push(StreetEdge { to: b, length_m });
            adjacency.entry(b).or_default().push(StreetEdge { to: a, length_m });
            lines.push(GeomWithData::new(Line::new(pa.as_xy(), pb.as_xy()), (a, b)));
        }

        // Only nodes that touch an edge are reachable, so only those are snapped to
        let node_tree = RTree::bulk_load(
            adjacency
                .keys()
                .map(|id| GeomWithData::new(points[id].as_xy(), *id))
                .collect(),
        );

        Self {
            points,
            adjacency,
            node_tree,
            edge_tree: RTree::bulk_load(lines),
        }
    }

    /// Parse a FeatureCollection of LineString / MultiLineString features.
    ///
    /// Each vertex becomes a node; vertices with identical coordinates are
    /// merged, so ways that share a vertex are connected. Node ids are
    /// assigned in order of first appearance.
    pub fn from_geojson_str(text: &str) -> Result<Self, GeoDataError> {
        let features = feature_collection(text)?;

        let mut ids: BTreeMap<(u64, u64), u64> = BTreeMap::new();
        let mut nodes = Vec::new();
        let mut edges = Vec::new();

        let mut node_id = |point: GeoPoint, nodes: &mut Vec<(u64, GeoPoint)>| -> u64 {
            let key = (point.lat().to_bits(), point.lon().to_bits());
            let next = ids.len() as u64;
            *ids.entry(key).or_insert_with(|| {
                nodes.push((next, point));
                next
            })
        };

        for feature in &features {
            let Some(geometry) = feature.geometry.as_ref() else {
                continue;
            };
            let lines: Vec<&Vec<Vec<f64>>> = match &geometry.value {
                geojson::Value::LineString(line) => vec![line],
                geojson::Value::MultiLineString(lines) => lines.iter().collect(),
                _ => continue,
            };

            for line in lines {
                let mut prev: Option<u64> = None;
                for pos in line {
                    if pos.len() < 2 {
                        continue;
                    }
                    let Ok(point) = GeoPoint::from_lon_lat(pos[0], pos[1]) else {
                        continue;
                    };
                    let id = node_id(point, &mut nodes);
                    if let Some(p) = prev {
                        edges.push((p, id));
                    }
                    prev = Some(id);
                }
            }
        }

        Ok(Self::new(nodes, &edges))
    }

    pub fn point(&self, id: u64) -> Option<GeoPoint> {
        self.points.get(&id).copied()
    }

    pub fn edges_from(&self, id: u64) -> &[StreetEdge] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of nodes with at least one edge.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Connected node closest to `point`.
    pub fn nearest_node(&self, point: &GeoPoint) -> Option<u64> {
        self.node_tree
            .nearest_neighbor(&point.as_xy())
            .map(|hit| hit.data)
    }

    /// Of the street edge closest to `point`, the endpoint nearer to it.
    pub fn nearest_edge_endpoint(&self, point: &GeoPoint) -> Option<u64> {
        let (a, b) = self.edge_tree.nearest_neighbor(&point.as_xy())?.data;
        let da = self.points[&a].distance_m(point);
        let db = self.points[&b].distance_m(point);
        Some(if da < db { a } else { b })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    /// An L-shaped street: 1 - 2 - 3 going north then east, plus an isolated node 9.
    fn l_shape() -> StreetGraph {
        StreetGraph::new(
            vec![
                (1, pt(1.400, 103.900)),
                (2, pt(1.401, 103.900)),
                (3, pt(1.401, 103.901)),
                (9, pt(1.500, 103.900)),
            ],
            &[(1, 2), (2, 3), (3, 3), (3, 42)],
        )
    }

    #[test]
    fn builds_symmetric_edges() {
        let g = l_shape();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edges_from(2).len(), 2);
        assert_eq!(g.edges_from(1)[0].to, 2);
        assert_eq!(g.edges_from(2)[0].to, 1);
        assert!(g.edges_from(9).is_empty());
    }

    #[test]
    fn edge_length_is_haversine() {
        let g = l_shape();
        let expected = pt(1.400, 103.900).distance_m(&pt(1.401, 103.900));
        assert!((g.edges_from(1)[0].length_m - expected).abs() < 1e-9);
    }

    #[test]
    fn nearest_node_ignores_isolated() {
        let g = l_shape();
        // Node 9 is closest but has no edges
        assert_eq!(g.nearest_node(&pt(1.499, 103.900)), Some(2));
    }

    #[test]
    fn nearest_edge_picks_closer_endpoint() {
        let g = l_shape();
        // Beside the 1-2 segment, closer to 1
        assert_eq!(g.nearest_edge_endpoint(&pt(1.4002, 103.9001)), Some(1));
        // Beside the 2-3 segment, closer to 3
        assert_eq!(g.nearest_edge_endpoint(&pt(1.4011, 103.9009)), Some(3));
    }

    #[test]
    fn empty_graph_lookups() {
        let g = StreetGraph::new(Vec::new(), &[]);
        assert!(g.is_empty());
        assert!(g.nearest_node(&pt(1.4, 103.9)).is_none());
        assert!(g.nearest_edge_endpoint(&pt(1.4, 103.9)).is_none());
    }

    #[test]
    fn parses_linestrings_sharing_vertices() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"highway": "footway"},
                 "geometry": {"type": "LineString", "coordinates": [[103.900, 1.400], [103.900, 1.401]]}},
                {"type": "Feature", "properties": {"highway": "footway"},
                 "geometry": {"type": "LineString", "coordinates": [[103.900, 1.401], [103.901, 1.401]]}}
            ]
        }"#;
        let g = StreetGraph::from_geojson_str(text).unwrap();

        assert_eq!(g.node_count(), 3);
        // The shared vertex is node 1 and connects both ways
        assert_eq!(g.edges_from(1).len(), 2);
        assert_eq!(g.point(0), Some(pt(1.400, 103.900)));
    }
}
