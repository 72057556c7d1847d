//! # ripsort-av
//!
//! Thin wrappers around the external tools of a disc-to-library pipeline.
//!
//! This crate provides functionality for:
//! - Locating the disc ripper (`makemkvcon`) and encoder (`HandBrakeCLI`)
//! - Ripping every title of a disc into a staging directory
//! - Transcoding a single file with an encoder preset
//! - Best-effort progress parsing of the tools' text output
//! - Pausing, resuming, and cancelling a running tool via [`ControlToken`]
//!
//! ## Features
//!
//! - `tracing` - Enable tracing support
//!
//! ## Example
//!
//! ```no_run
//! use ripsort_av::{transcode, ControlToken, TranscodeOptions};
//! use std::path::Path;
//!
//! let control = ControlToken::new();
//! transcode(
//!     Path::new("/library/Heat (1995)/Heat (1995).mkv"),
//!     Path::new("/library/Heat (1995)/compressed_Heat (1995).mkv"),
//!     &TranscodeOptions::default(),
//!     &control,
//!     Some(&|pct: f32| println!("{pct:.1}%")),
//! )?;
//! # Ok::<(), ripsort_av::Error>(())
//! ```

pub mod actions;
pub mod control;
mod error;
pub mod process;
pub mod progress;
pub mod tools;

// Re-exports
pub use actions::{rip_disc, transcode, RipOptions, TranscodeOptions};
pub use control::{ControlState, ControlToken};
pub use error::{Error, Result};
pub use tools::{check_tool, check_tools, require_tool, ToolInfo};

/// Callback receiving a completion percentage in `0.0..=100.0`.
pub type ProgressFn<'a> = &'a dyn Fn(f32);
