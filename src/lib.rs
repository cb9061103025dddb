//! Heat-map rendering of 2D numeric text files.
//!
//! The pipeline is linear: parse options, load the matrix, optionally apply
//! a mask, optionally take the natural log, then draw and save one image.

pub mod cli;
pub mod color;
pub mod data;
pub mod render;
