//! # Playstats Config
//!
//! Typed configuration for playstats.
//!
//! This crate provides YAML loading, environment overrides and validation for
//! the analysis settings (time zone, report sizes), default filter selection,
//! logging and output options.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
pub use validator::*;
