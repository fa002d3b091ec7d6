//! Core domain layer for the fitness aggregator.
//!
//! Holds the record and dataset models shared by every pipeline stage, the
//! multi-format date normaliser, the error taxonomy and the CLI settings.

pub mod dates;
pub mod error;
pub mod models;
pub mod settings;
