//! Branchtale — story content context.
//!
//! Responsible for the catalog of available adventures, the immutable story
//! graph of each adventure, and loading both from disk.

pub mod application;
pub mod domain;
