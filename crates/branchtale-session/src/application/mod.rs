//! Session orchestration.

pub mod controller;
pub mod registry;
