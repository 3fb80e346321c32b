//! Browser rendering module
//!
//! The cord's points and constraints are drawn on a Canvas2D surface; the
//! ribbon, plug, and card choreography are applied as inline styles.

pub mod canvas;
pub mod dom;

pub use canvas::CordCanvas;
pub use dom::DomRenderer;
