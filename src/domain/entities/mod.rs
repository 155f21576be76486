//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`Link`] - A short code mapped to a target URL, with its click counter
//! - [`LinkSnapshot`] - The cacheable subset of a link used on the redirect path
//! - [`LinkPage`] - One page of an owner's links
//! - [`NewClick`] - A classified click event appended to the click log
//!
//! Entities follow the "New Type" pattern with separate structs for creation
//! (`NewLink`, `NewClick`).

pub mod click;
pub mod link;

pub use click::NewClick;
pub use link::{Link, LinkPage, LinkSnapshot, NewLink};
