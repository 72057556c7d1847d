//! External tool detection and management.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Executable name of the disc ripper.
pub const MAKEMKVCON: &str = "makemkvcon";

/// Executable name of the encoder.
pub const HANDBRAKE_CLI: &str = "HandBrakeCLI";

/// Information about an external tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

/// Check if a tool is available and get its information.
///
/// # Example
///
/// ```no_run
/// use ripsort_av::check_tool;
///
/// let info = check_tool("HandBrakeCLI");
/// if info.available {
///     println!("HandBrakeCLI version: {:?}", info.version);
/// }
/// ```
pub fn check_tool(name: &str) -> ToolInfo {
    check_tool_with_arg(name, Some("--version"))
}

/// Check if a tool is available, optionally asking it for a version.
///
/// Availability is decided by a `PATH` lookup; the version probe is only
/// informational since some tools (makemkvcon among them) have no version
/// flag and exit non-zero when called without a command.
pub fn check_tool_with_arg(name: &str, version_arg: Option<&str>) -> ToolInfo {
    let Ok(path) = which::which(name) else {
        return ToolInfo {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        };
    };

    let version = version_arg.and_then(|arg| {
        let output = Command::new(&path).arg(arg).output().ok()?;
        let text = if output.stdout.is_empty() {
            output.stderr
        } else {
            output.stdout
        };
        String::from_utf8_lossy(&text)
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(|s| s.to_string())
    });

    ToolInfo {
        name: name.to_string(),
        available: true,
        version,
        path: Some(path),
    }
}

/// Check the disc ripper and the encoder.
pub fn check_tools() -> Vec<ToolInfo> {
    vec![
        check_tool_with_arg(MAKEMKVCON, None),
        check_tool(HANDBRAKE_CLI),
    ]
}

/// Require that a tool is available, returning its path.
///
/// # Errors
///
/// Returns an error if the tool is not found.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// Get the path to a tool, preferring a configured path over PATH lookup.
pub fn get_tool_path(name: &str, config_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        #[cfg(feature = "tracing")]
        tracing::warn!(
            "Configured path for {} does not exist: {:?}; falling back to PATH",
            name,
            path
        );
    }

    require_tool(name)
}
