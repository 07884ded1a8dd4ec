//! Weighted stop graph for bus search.

mod adjacency;

pub use adjacency::{AdjacencyGraph, AdjacencyGraphBuilder, BusEdge};
