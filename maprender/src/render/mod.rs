//! Rendering a style into a finished PNG tile.
//!
//! The rendering engine itself is an external component behind [`RenderEngine`]. This module
//! validates requests, plans the raster the engine has to produce, hands it the
//! [`Dispatcher`](crate::dispatcher::Dispatcher) for its resource requests and finishes the
//! result.

mod engine;
pub use engine::*;

mod params;
pub use params::*;

mod plan;
pub use plan::*;

mod renderer;
pub use renderer::*;
