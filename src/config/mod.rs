mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Component, Path};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./ripsort.toml",
        "./config.toml",
        "~/.config/ripsort/config.toml",
        "/etc/ripsort/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    let organize = &config.organize;

    validate_tolerance(organize.tolerance)?;

    if organize.extension.is_empty() || organize.extension.contains('.') {
        anyhow::bail!(
            "Container extension must be non-empty and given without a dot, got {:?}",
            organize.extension
        );
    }

    let mut components = Path::new(&organize.extras_dir_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => {}
        _ => anyhow::bail!(
            "Extras folder name must be a single folder name, got {:?}",
            organize.extras_dir_name
        ),
    }

    if config.transcode.preset.trim().is_empty() {
        anyhow::bail!("Transcode preset cannot be empty");
    }

    if config.transcode.output_prefix.contains(['/', '\\']) {
        anyhow::bail!(
            "Transcode output prefix cannot contain path separators, got {:?}",
            config.transcode.output_prefix
        );
    }

    for (name, path) in [
        ("makemkvcon", &config.tools.makemkvcon_path),
        ("HandBrakeCLI", &config.tools.handbrake_path),
    ] {
        if let Some(path) = path {
            if !path.exists() {
                tracing::warn!("Configured {} path does not exist: {:?}", name, path);
            }
        }
    }

    Ok(())
}

/// Check a duplicate tolerance, which may also come from the command line
pub fn validate_tolerance(tolerance: f64) -> Result<()> {
    crate::organizer::validate_tolerance(tolerance).context("Invalid duplicate tolerance")
}
