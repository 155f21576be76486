//! Application layer services implementing the resolution pipeline.
//!
//! Services coordinate the collaborator traits from
//! [`crate::domain::repositories`] and expose the operations the HTTP
//! handlers and the admin tool call.
//!
//! # Available Services
//!
//! - [`services::RedirectPipeline`] - Cache-aside resolution and click dispatch
//! - [`services::ClickRecorder`] - Request classification and click queueing
//! - [`services::LinkService`] - Link creation, deletion and owner-scoped lookup
//! - [`services::CodeGenerator`] - Unique code generation and alias checks

pub mod services;
