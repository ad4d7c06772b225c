//! Resolves the resource requests of the rendering engine.
//!
//! Every request is classified into a [`Route`] first, then resolved against exactly one
//! backend. The engine-facing [`Dispatcher::request`] reports the outcome through a callback
//! that is called exactly once per valid request.

mod dispatch;
pub use dispatch::*;

mod kind;
pub use kind::*;

mod result;
pub use result::*;

mod route;
pub use route::*;
