//! Disc ripping with makemkvcon.

use crate::process::run_monitored;
use crate::progress::parse_makemkv;
use crate::tools::{get_tool_path, MAKEMKVCON};
use crate::{ControlToken, ProgressFn, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Settings for a rip.
#[derive(Debug, Clone, Default)]
pub struct RipOptions {
    /// Drive index as understood by makemkvcon (`disc:N`).
    pub disc: u32,
    /// Explicit makemkvcon location; `PATH` is searched otherwise.
    pub makemkvcon: Option<PathBuf>,
}

/// Build the makemkvcon command line that rips every title of a disc.
///
/// Robot mode (`-r`) with `--progress=-same` makes makemkvcon emit
/// `PRGV` lines on stdout.
pub fn rip_command(program: &Path, disc: u32, output_dir: &Path) -> Command {
    let mut cmd = Command::new(program);
    cmd.arg("-r")
        .arg("--progress=-same")
        .arg("mkv")
        .arg(format!("disc:{}", disc))
        .arg("all")
        .arg(output_dir);
    cmd
}

/// Rip every title of the configured disc into `output_dir`.
///
/// The directory is created if needed. Returns once makemkvcon exits and all
/// files are closed.
pub fn rip_disc(
    output_dir: &Path,
    options: &RipOptions,
    control: &ControlToken,
    on_progress: Option<ProgressFn<'_>>,
) -> Result<()> {
    let program = get_tool_path(MAKEMKVCON, options.makemkvcon.as_deref())?;
    std::fs::create_dir_all(output_dir)?;

    #[cfg(feature = "tracing")]
    tracing::info!("Ripping disc:{} into {:?}", options.disc, output_dir);

    run_monitored(
        MAKEMKVCON,
        rip_command(&program, options.disc, output_dir),
        control,
        parse_makemkv,
        on_progress,
    )?;

    #[cfg(feature = "tracing")]
    tracing::info!("Rip complete: {:?}", output_dir);

    Ok(())
}
