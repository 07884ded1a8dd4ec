//! Index of known geographic nodes.
//!
//! Nodes come from an OpenStreetMap extract (e.g. every `highway=bus_stop`
//! in the area). Some carry an `asset_ref` tag holding the operator's stop
//! code; those coordinates are preferred over the ones self-reported by the
//! per-line stop dumps.

use std::collections::BTreeMap;

use geojson::{Feature, GeoJson, JsonValue};
use rstar::RTree;
use rstar::primitives::GeomWithData;
use tracing::debug;

use crate::domain::{GeoPoint, StopCode};

use super::{GeoDataError, ServiceArea};

/// A known geographic node.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoNode {
    pub id: u64,
    pub point: GeoPoint,
    pub name: Option<String>,
    /// External stop-code cross-reference, exactly as tagged.
    pub stop_ref: Option<String>,
}

impl GeoNode {
    /// The cross-referenced stop code, if present and well formed.
    pub fn stop_code(&self) -> Option<StopCode> {
        self.stop_ref
            .as_deref()
            .and_then(|r| StopCode::parse(r).ok())
    }
}

/// Spatial index over a fixed set of nodes.
#[derive(Debug, Clone)]
pub struct GeoIndex {
    nodes: Vec<GeoNode>,
    tree: RTree<GeomWithData<[f64; 2], usize>>,
    by_stop: BTreeMap<StopCode, usize>,
}

impl Default for GeoIndex {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl GeoIndex {
    /// Build an index. When several nodes share a stop code the first wins.
    pub fn new(nodes: Vec<GeoNode>) -> Self {
        let tree = RTree::bulk_load(
            nodes
                .iter()
                .enumerate()
                .map(|(i, n)| GeomWithData::new(n.point.as_xy(), i))
                .collect(),
        );

        let mut by_stop = BTreeMap::new();
        for (i, node) in nodes.iter().enumerate() {
            if let Some(code) = node.stop_code() {
                by_stop.entry(code).or_insert(i);
            }
        }

        Self {
            nodes,
            tree,
            by_stop,
        }
    }

    /// Parse a FeatureCollection of Point features.
    ///
    /// Recognised properties: `osmid` (falls back to the feature id, then the
    /// feature position), `name`, `asset_ref`. Non-point features are skipped.
    pub fn from_geojson_str(text: &str) -> Result<Self, GeoDataError> {
        let features = feature_collection(text)?;
        let mut nodes = Vec::with_capacity(features.len());

        for (i, feature) in features.iter().enumerate() {
            let Some(point) = point_of(feature) else {
                debug!(feature = i, "skipping non-point node feature");
                continue;
            };
            let id = property_u64(feature, "osmid")
                .or_else(|| feature_id(feature))
                .unwrap_or(i as u64);

            nodes.push(GeoNode {
                id,
                point,
                name: property_string(feature, "name"),
                stop_ref: property_string(feature, "asset_ref"),
            });
        }

        Ok(Self::new(nodes))
    }

    /// Keep only nodes inside `area`.
    pub fn within(&self, area: &ServiceArea) -> Self {
        Self::new(
            self.nodes
                .iter()
                .filter(|n| area.contains(&n.point))
                .cloned()
                .collect(),
        )
    }

    pub fn nodes(&self) -> &[GeoNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node closest to `point` in planar lon/lat space.
    ///
    /// Over a city-sized area the planar nearest neighbour agrees with the
    /// great-circle one except for near-ties.
    pub fn nearest(&self, point: &GeoPoint) -> Option<&GeoNode> {
        self.tree
            .nearest_neighbor(&point.as_xy())
            .map(|hit| &self.nodes[hit.data])
    }

    /// Authoritative coordinate for a stop code.
    pub fn stop_point(&self, code: StopCode) -> Option<GeoPoint> {
        self.by_stop.get(&code).map(|&i| self.nodes[i].point)
    }
}

/// Read the features of a FeatureCollection.
pub(super) fn feature_collection(text: &str) -> Result<Vec<Feature>, GeoDataError> {
    match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(fc) => Ok(fc.features),
        _ => Err(GeoDataError::NotFeatureCollection),
    }
}

fn point_of(feature: &Feature) -> Option<GeoPoint> {
    match &feature.geometry.as_ref()?.value {
        geojson::Value::Point(pos) if pos.len() >= 2 => GeoPoint::from_lon_lat(pos[0], pos[1]).ok(),
        _ => None,
    }
}

fn feature_id(feature: &Feature) -> Option<u64> {
    match feature.id.as_ref()? {
        geojson::feature::Id::Number(n) => n.as_u64(),
        geojson::feature::Id::String(s) => s.parse().ok(),
    }
}

/// A property as a string; numbers are rendered in decimal.
pub(super) fn property_string(feature: &Feature, key: &str) -> Option<String> {
    match feature.property(key)? {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(super) fn property_u64(feature: &Feature, key: &str) -> Option<u64> {
    match feature.property(key)? {
        JsonValue::Number(n) => n.as_u64(),
        JsonValue::String(s) => s.parse().ok(),
        _ => None,
    }
}
