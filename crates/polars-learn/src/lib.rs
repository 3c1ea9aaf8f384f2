//! Move Polars tables into numeric runtimes and back, across a boundary that
//! must never unwind.
//!
//! - [`iterate`] visits columns value by value, null-aware and typed.
//! - [`matrix`] packs numeric columns into a dense row-major `f64` buffer
//!   with `NaN` for null, [`reconstruct`] goes the other way.
//! - [`one_hot`] encodes a string column into indicator columns.
//! - [`registry`] owns objects handed out as raw handles.
//! - [`boundary`] converts errors and panics into caller-visible messages.
//! - [`runtime`] forwards fit/score/predict to a foreign numeric library.
pub mod boundary;
pub mod config;
pub mod error;
pub mod iterate;
pub mod matrix;
pub mod one_hot;
pub mod prelude;
pub mod reconstruct;
pub mod registry;
pub mod runtime;
