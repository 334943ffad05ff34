//! Sierpinski carpet rendering: validation, a shared-nothing parallel
//! generator over an RGB canvas, and image export.

pub mod canvas;
pub mod carpet;
pub mod config;
pub mod error;
pub mod export;
pub mod utils;
