//! Runtime layer for the security-investigation report generator.
//!
//! Wires the data and output layers into a single [`pipeline::ReportPipeline`]
//! run driven by the binary.

pub mod pipeline;

pub use sirg_core as core;
pub use sirg_data as data;
pub use sirg_output as output;
