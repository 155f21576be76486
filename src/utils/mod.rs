//! Utility functions for code generation and request classification.
//!
//! - [`code_generator`] - Random short codes and alias validation
//! - [`client_ip`] - Client IP extraction from HTTP headers
//! - [`geo`] - IP → country/city classification
//! - [`user_agent`] - User-Agent → device type, browser, OS

pub mod client_ip;
pub mod code_generator;
pub mod geo;
pub mod user_agent;
