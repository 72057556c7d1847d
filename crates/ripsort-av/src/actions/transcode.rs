//! Transcoding with HandBrakeCLI.

use crate::process::run_monitored;
use crate::progress::parse_handbrake;
use crate::tools::{get_tool_path, HANDBRAKE_CLI};
use crate::{ControlToken, Error, ProgressFn, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// HandBrake preset used when none is configured.
pub const DEFAULT_PRESET: &str = "Fast 1080p30";

/// Settings for a transcode.
#[derive(Debug, Clone)]
pub struct TranscodeOptions {
    /// HandBrake preset name.
    pub preset: String,
    /// Explicit HandBrakeCLI location; `PATH` is searched otherwise.
    pub handbrake: Option<PathBuf>,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            preset: DEFAULT_PRESET.to_string(),
            handbrake: None,
        }
    }
}

/// Build the HandBrakeCLI command line for one file.
pub fn transcode_command(program: &Path, input: &Path, output: &Path, preset: &str) -> Command {
    let mut cmd = Command::new(program);
    cmd.arg("-i")
        .arg(input)
        .arg("-o")
        .arg(output)
        .arg("--preset")
        .arg(preset);
    cmd
}

/// Transcode `input` into `output` with the configured preset.
pub fn transcode(
    input: &Path,
    output: &Path,
    options: &TranscodeOptions,
    control: &ControlToken,
    on_progress: Option<ProgressFn<'_>>,
) -> Result<()> {
    if !input.exists() {
        return Err(Error::file_not_found(input));
    }

    let program = get_tool_path(HANDBRAKE_CLI, options.handbrake.as_deref())?;

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    #[cfg(feature = "tracing")]
    tracing::info!(
        "Transcoding {:?} -> {:?} (preset {:?})",
        input,
        output,
        options.preset
    );

    run_monitored(
        HANDBRAKE_CLI,
        transcode_command(&program, input, output, &options.preset),
        control,
        parse_handbrake,
        on_progress,
    )?;

    #[cfg(feature = "tracing")]
    tracing::info!("Transcode complete: {:?}", output);

    Ok(())
}
