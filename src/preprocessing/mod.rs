//! Image preprocessing applied before cropping and recognition.
//!
//! A fixed-order pipeline of independently selectable filters.

pub mod pipeline;
pub mod steps;

pub use pipeline::{FilterSelection, Pipeline, PreprocessResult};
