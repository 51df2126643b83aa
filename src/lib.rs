//! `mtg-etl` library crate.
//!
//! The binary (`mtg-etl`) is a thin wrapper around this library so that:
//!
//! - every stage is testable without spawning processes or touching the network
//! - stages can be composed by other callers (e.g. a scheduler running only gold)

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
pub mod transform;
