//! # Playstats CLI
//!
//! The `playstats` command: loads a streaming-history export, applies a
//! date and platform selection and prints the dashboard report, the filter
//! facets or an enriched CSV export.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod error;

pub use app::*;
pub use cli::*;
pub use error::*;
