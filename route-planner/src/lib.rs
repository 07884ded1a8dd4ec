//! Multimodal route planner.
//!
//! Plans walk / bus / rail itineraries between two coordinates inside a
//! bounded service area, from per-line bus stop and route dumps, a set of
//! geographic stop nodes and a fixed rail topology.

pub mod domain;
pub mod graph;
pub mod network;
pub mod planner;
pub mod spatial;
pub mod web;
