//! Rendering of the live input line.

pub mod reconcile;

pub use reconcile::{padding_for, wrap_rows, RenderEngine};
