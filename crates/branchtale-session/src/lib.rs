//! Branchtale — adventure session context.
//!
//! Responsible for one player's live traversal of a story: where they are,
//! which options they may pick, how long they have to pick one, and the
//! ending, log and replay flow. Each live session is a single task that owns
//! its state, so input and timer expiry never race.

pub mod application;
pub mod domain;
