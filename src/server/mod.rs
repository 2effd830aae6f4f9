//! Hook server
//!
//! Wires the collaborators together, accepts write-hook connections and runs
//! the periodic sweep.

pub mod core;

pub use self::core::{Server, build_engine, spawn_sweeper};
