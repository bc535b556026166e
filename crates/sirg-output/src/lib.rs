//! Report emitters for the security-investigation report generator.
//!
//! Each emitter turns one aggregate or table into exactly one file: comma
//! separated distributions, `.xlsx` tables, a themed HTML page and SVG
//! charts, all named after the creation-date span of the reported tickets.

pub mod charts;
pub mod delimited;
pub mod html;
pub mod naming;
pub mod spreadsheet;
pub mod themes;

pub use sirg_core as core;
