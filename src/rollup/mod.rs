//! Neighborhood and route rollups over finished stop records.
//!
//! Both reducers only see stops with at least one barrier at or above the
//! configured minimum severity, accumulate in stop order, and sort with a
//! stable sort so equal keys keep first-appearance order.

pub mod neighborhood;
pub mod route;
pub mod utility;

pub use neighborhood::neighborhood_rollup;
pub use route::route_rollup;
