//! Spatial join of accessibility barriers onto transit stops.
//!
//! Barriers are bucketed into a fixed grid, each stop scans its 3x3 cell
//! block for barriers within a per-axis threshold, and the matches are folded
//! into per-stop profiles plus neighborhood and route rollups.

pub mod config;
pub mod error;
pub mod fetch;
pub mod grid;
pub mod join;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod rollup;
pub mod summarize;
pub mod types;
