//! Invocations of the external ripper and encoder.

mod rip;
mod transcode;

pub use rip::{rip_command, rip_disc, RipOptions};
pub use transcode::{transcode, transcode_command, TranscodeOptions, DEFAULT_PRESET};
