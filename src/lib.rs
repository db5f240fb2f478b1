//! Turns the regulator's county loan-limit spreadsheet into a compact
//! JavaScript data file: a national baseline plus per-county overrides.

pub mod config;
pub mod error;
pub mod ingest;
pub mod lookup;
pub mod model;
pub mod pipeline;
pub mod process;
pub mod reader;
pub mod render;
pub mod report;
pub mod states;

pub use config::Config;
pub use error::LimitsError;
pub use model::{CountyRecord, LimitsDocument, StateEntry};
