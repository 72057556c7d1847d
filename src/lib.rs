//! Ripsort - disc rip organizing tool
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod organizer;

pub use organizer::{Organizer, OrganizerSettings, RunStatus, RunSummary, TitleInfo};
