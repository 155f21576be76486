//! HTTP middleware and extractors for request processing.
//!
//! Provides caller identification and observability middleware.

pub mod owner;
pub mod tracing;

pub use owner::Owner;
