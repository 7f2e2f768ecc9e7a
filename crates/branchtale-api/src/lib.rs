//! Branchtale — HTTP host.
//!
//! Plays the part of the chat platform: rendered surfaces live on an
//! in-memory board, players react to them over HTTP, and the adventure
//! sessions run on their own tasks behind it.

pub mod board;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
