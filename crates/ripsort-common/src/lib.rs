//! Ripsort-Common: Shared types, errors, and path utilities.
//!
//! This crate provides the vocabulary used by the organizer and the CLI:
//!
//! - **Core Types**: candidate files, media sets, and placement actions
//! - **Path Utilities**: container extension matching, destination folder
//!   naming, and collision-safe file name suffixing
//! - **Error Handling**: the organizing error taxonomy and result alias
//!
//! # Examples
//!
//! ```
//! use ripsort_common::paths::{folder_name, has_extension};
//! use std::path::Path;
//!
//! assert_eq!(folder_name("Heat", Some("1995")), "Heat (1995)");
//! assert!(has_extension(Path::new("title_t00.MKV"), "mkv"));
//! ```

pub mod error;
pub mod paths;
pub mod types;

pub use error::{Error, FileOp, Result};
pub use types::*;
