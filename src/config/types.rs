use crate::organizer::DEFAULT_TOLERANCE;
use ripsort_common::paths::DEFAULT_CONTAINER_EXTENSION;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub organize: OrganizeConfig,

    #[serde(default)]
    pub rip: RipConfig,

    #[serde(default)]
    pub transcode: TranscodeConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Directory the ripper writes into and the organizer reads from
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    /// Root under which "{Title} ({Year})" folders are created
    #[serde(default = "default_library_dir")]
    pub library_dir: PathBuf,
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from("./staging")
}

fn default_library_dir() -> PathBuf {
    PathBuf::from("./library")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            staging_dir: default_staging_dir(),
            library_dir: default_library_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrganizeConfig {
    /// Fractional size tolerance for near-duplicate copies of the main title (default: 0.05)
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Container extension to pick up, without the dot (default: "mkv")
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Folder under the title folder that receives extras (default: "Behind the Scenes")
    #[serde(default = "default_extras_dir_name")]
    pub extras_dir_name: String,

    /// Rename the main title to "{Title} ({Year}).ext" (default: true)
    #[serde(default = "default_rename_primary")]
    pub rename_primary: bool,

    /// Remove the source directory after a clean run if it is empty
    #[serde(default)]
    pub cleanup_source: bool,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_extension() -> String {
    DEFAULT_CONTAINER_EXTENSION.to_string()
}

fn default_extras_dir_name() -> String {
    "Behind the Scenes".to_string()
}

fn default_rename_primary() -> bool {
    true
}

impl Default for OrganizeConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            extension: default_extension(),
            extras_dir_name: default_extras_dir_name(),
            rename_primary: default_rename_primary(),
            cleanup_source: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RipConfig {
    /// Drive index passed to the ripper as `disc:N`
    #[serde(default)]
    pub disc: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscodeConfig {
    /// Encoder preset name (default: "Fast 1080p30")
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Prefix for transcoded output file names (default: "compressed_")
    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,

    /// Also hand extras to the encoder, not just the main title
    #[serde(default)]
    pub transcode_extras: bool,
}

fn default_preset() -> String {
    ripsort_av::actions::DEFAULT_PRESET.to_string()
}

fn default_output_prefix() -> String {
    "compressed_".to_string()
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            preset: default_preset(),
            output_prefix: default_output_prefix(),
            transcode_extras: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub makemkvcon_path: Option<PathBuf>,

    #[serde(default)]
    pub handbrake_path: Option<PathBuf>,
}
