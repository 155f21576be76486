//! HTTP request handlers for API endpoints.
//!
//! Handlers only translate HTTP to service calls; every decision lives in
//! [`crate::application::services`].

pub mod health;
pub mod hot;
pub mod links;
pub mod redirect;

pub use health::health_handler;
pub use hot::hot_handler;
pub use links::{create_link_handler, delete_link_handler, link_info_handler, list_links_handler};
pub use redirect::redirect_handler;
