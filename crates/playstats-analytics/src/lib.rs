//! # Playstats Analytics
//!
//! Turns a raw listening-history export into dashboard-ready tables.
//!
//! Loading runs ingest, normalization and missing-value resolution once and
//! produces an immutable [`Dataset`]. Filters borrow from it; aggregators and
//! the report builder recompute on every selection.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregate;
pub mod cache;
pub mod export;
pub mod features;
pub mod filter;
pub mod ingest;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod render;
pub mod report;
pub mod resolve;
pub mod session;

pub use aggregate::*;
pub use cache::*;
pub use export::*;
pub use features::*;
pub use filter::*;
pub use loader::*;
pub use model::*;
pub use render::*;
pub use report::*;
pub use resolve::*;
pub use session::*;
