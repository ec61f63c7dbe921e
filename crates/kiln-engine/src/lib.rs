//! Kiln engine crate.
//!
//! Polygon bodies, their GPU mirrors, and the platform + GPU runtime that
//! views them (raster or compute ray-traced).

pub mod container;
pub mod math;
pub mod model;

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod camera;
pub mod render;
pub mod viewer;
