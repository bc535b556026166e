//! Data layer for the security-investigation report generator.
//!
//! Loads the exported Trello board, normalises and filters its rows into
//! [`sirg_core::models::Ticket`]s, and derives the aggregates and table
//! projections the output layer renders.

pub mod aggregator;
pub mod normalizer;
pub mod projection;
pub mod reader;

pub use sirg_core as core;
