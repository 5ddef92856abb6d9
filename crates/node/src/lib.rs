//! chordsim-node
//! --------------
//! Command line harness of the Chord simulator.
//!
//! - [config](crate::config) loads the run parameters from YAML.
//! - [simulator](crate::simulator) builds the ring, assigns keys and runs the lookups.
//! - [report](crate::report) renders and writes the lookup results.
#![doc = include_str!("../README.md")]
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod simulator;
#[cfg(test)]
mod tests;
pub mod util;
