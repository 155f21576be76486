//! Services for the resolution and link-management pipeline.

pub mod click_recorder;
pub mod code_generator;
pub mod link_service;
pub mod redirect_pipeline;

pub use click_recorder::ClickRecorder;
pub use code_generator::{AttemptBudget, CodeGenerator};
pub use link_service::{CreateLink, LinkService};
pub use redirect_pipeline::RedirectPipeline;
