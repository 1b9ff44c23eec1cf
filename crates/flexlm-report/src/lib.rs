//! Plot report generation for the FlexLM log analyser.
//!
//! Lays out `<name>_report/`, writes one gnuplot data table per license
//! feature plus the plot script, and runs the external `gnuplot` binary to
//! produce the PDF.

pub mod gnuplot;
pub mod layout;
pub mod report;

pub use flexlm_core as core;
pub use flexlm_data as data;
