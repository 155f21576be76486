//! Domain layer containing business entities and logic.
//!
//! This module defines entities, collaborator contracts and the background
//! click worker, independent of any storage technology.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Collaborator trait definitions
//! - [`click_event`] - Raw click metadata and its classification
//! - [`click_worker`] - Asynchronous click processing worker
//!
//! # Click Processing Flow
//!
//! 1. The redirect pipeline resolves a code and builds a [`click_event::ClickEvent`]
//! 2. The click recorder classifies it into a [`entities::NewClick`] and queues it
//! 3. [`click_worker::run_click_worker`] applies it to the counter, log and ranking

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
