use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ripsort")]
#[command(author, version, about = "Disc rip organizing and transcoding tool")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Organize a directory of ripped files into the library
    Organize {
        /// Directory holding the ripped files
        #[arg(required = true)]
        source: PathBuf,

        /// Library root (defaults to paths.library_dir from the config)
        #[arg(short, long)]
        library: Option<PathBuf>,

        /// Resolved title (defaults to the main file's name)
        #[arg(short, long)]
        title: Option<String>,

        /// Release year
        #[arg(short, long)]
        year: Option<String>,

        /// Fractional size tolerance for duplicates of the main title
        #[arg(long)]
        tolerance: Option<f64>,

        /// Show what would be done without touching any file
        #[arg(long)]
        dry_run: bool,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rip every title of a disc into the staging directory
    Rip {
        /// Output directory (defaults to paths.staging_dir from the config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Drive index
        #[arg(long)]
        disc: Option<u32>,
    },

    /// Transcode a single file with the encoder
    Transcode {
        /// File to transcode
        #[arg(required = true)]
        input: PathBuf,

        /// Output file (defaults to the input name with the output prefix)
        output: Option<PathBuf>,

        /// Encoder preset
        #[arg(long)]
        preset: Option<String>,
    },

    /// Rip, organize, and transcode in one go
    Run {
        /// Resolved title (defaults to the main file's name)
        #[arg(short, long)]
        title: Option<String>,

        /// Release year
        #[arg(short, long)]
        year: Option<String>,

        /// Library root (defaults to paths.library_dir from the config)
        #[arg(short, long)]
        library: Option<PathBuf>,

        /// Fractional size tolerance for duplicates of the main title
        #[arg(long)]
        tolerance: Option<f64>,

        /// Organize what is already in the staging directory
        #[arg(long)]
        skip_rip: bool,

        /// Stop after organizing
        #[arg(long)]
        no_transcode: bool,

        /// Show what would be done without executing
        #[arg(long)]
        dry_run: bool,
    },

    /// Check that the ripper and encoder are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
