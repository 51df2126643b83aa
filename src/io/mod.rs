//! Layer artifacts.
//!
//! - raw cards as JSON (`bronze`)
//! - refined cards as CSV (`silver`)
//! - SQLite dimension/fact tables (`warehouse`)

pub mod bronze;
pub mod silver;
pub mod warehouse;

pub use bronze::*;
pub use silver::*;
pub use warehouse::*;
