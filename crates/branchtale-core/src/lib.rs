//! Branchtale Core — shared abstractions.
//!
//! This crate defines the traits and types every adventure context depends
//! on: the error type, time, commands, and the two platform boundaries a
//! session talks to (where it renders, and where its input comes from). It
//! contains no platform code.

pub mod clock;
pub mod command;
pub mod error;
pub mod input;
pub mod presentation;
