//! Session domain: state machine, option visibility, rendering, timer.

pub mod commands;
pub mod render;
pub mod state;
pub mod timeout;
pub mod visibility;
