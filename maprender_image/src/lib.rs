//! Turns the raw output of the rendering engine into a finished PNG tile.
//!
//! The engine hands back premultiplied RGBA pixels that still contain the render buffer around
//! the tile. [`finish_image`] undoes the premultiplication, crops the buffer, optionally resizes
//! and encodes the result.

mod finish;
pub use finish::*;

pub mod format;

mod raw_image;
pub use raw_image::*;
