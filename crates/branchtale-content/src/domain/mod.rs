//! Content domain model: catalog entries and story graphs.

pub mod catalog;
pub mod graph;
