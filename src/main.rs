mod cli;

use ripsort::config::{self, Config};
use ripsort::organizer::{transcode_output, Organizer, OrganizerSettings, RunSummary, TitleInfo};
use ripsort::RunStatus;
use ripsort_av::{ControlState, ControlToken, RipOptions, TranscodeOptions};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::cell::Cell;
use std::io::{BufRead, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Exit code for a run that finished but recorded per-file errors.
const EXIT_COMPLETED_WITH_ERRORS: u8 = 2;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "ripsort=trace,ripsort_av=debug,ripsort_common=debug".to_string()
        } else {
            "ripsort=info,ripsort_av=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Organize {
            source,
            library,
            title,
            year,
            tolerance,
            dry_run,
            json,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let library = library.unwrap_or_else(|| config.paths.library_dir.clone());
            let title = TitleInfo { title, year };

            let Some(summary) =
                organize(&config, &source, &library, &title, tolerance, dry_run)?
            else {
                return Ok(ExitCode::SUCCESS);
            };
            print_summary(&summary, json)?;
            Ok(exit_code(&summary))
        }
        Commands::Rip { output, disc } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let output = output.unwrap_or_else(|| config.paths.staging_dir.clone());
            let control = control_token();
            rip(&config, &output, disc, &control)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Transcode {
            input,
            output,
            preset,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let output = output
                .unwrap_or_else(|| transcode_output(&input, &config.transcode.output_prefix));
            let control = control_token();
            transcode_file(&config, &input, &output, preset, &control)?;
            println!("Output: {}", output.display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run {
            title,
            year,
            library,
            tolerance,
            skip_rip,
            no_transcode,
            dry_run,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let library = library.unwrap_or_else(|| config.paths.library_dir.clone());
            let title = TitleInfo { title, year };
            run_pipeline(
                &config,
                &library,
                &title,
                tolerance,
                skip_rip,
                no_transcode,
                dry_run,
            )
        }
        Commands::CheckTools => check_tools(),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Version => {
            println!("ripsort {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Run the organizer, returning `None` when there was nothing to organize.
fn organize(
    config: &Config,
    source: &Path,
    library: &Path,
    title: &TitleInfo,
    tolerance: Option<f64>,
    dry_run: bool,
) -> Result<Option<RunSummary>> {
    let mut settings = OrganizerSettings::from_config(config);
    if let Some(tolerance) = tolerance {
        config::validate_tolerance(tolerance)?;
        settings.tolerance = tolerance;
    }
    settings.dry_run = dry_run;

    tracing::info!("Organizing {:?} into {:?}", source, library);

    match Organizer::new(settings).run(source, library, title) {
        Ok(summary) => Ok(Some(summary)),
        Err(ripsort_common::Error::EmptySet { path }) => {
            println!(
                "No .{} files found in {}; nothing to organize.",
                config.organize.extension,
                path.display()
            );
            Ok(None)
        }
        Err(e) => Err(e).context("Organizing failed"),
    }
}

fn rip(config: &Config, output: &Path, disc: Option<u32>, control: &ControlToken) -> Result<()> {
    let options = RipOptions {
        disc: disc.unwrap_or(config.rip.disc),
        makemkvcon: config.tools.makemkvcon_path.clone(),
    };

    println!("Ripping disc:{} into {}", options.disc, output.display());
    let progress = progress_logger("Ripping");
    ripsort_av::rip_disc(output, &options, control, Some(&progress))
        .with_context(|| format!("Ripping into {:?} failed", output))?;
    println!("Ripping complete.");

    Ok(())
}

fn transcode_file(
    config: &Config,
    input: &Path,
    output: &Path,
    preset: Option<String>,
    control: &ControlToken,
) -> Result<()> {
    let options = TranscodeOptions {
        preset: preset.unwrap_or_else(|| config.transcode.preset.clone()),
        handbrake: config.tools.handbrake_path.clone(),
    };

    println!("Transcoding {} ({})", input.display(), options.preset);
    let progress = progress_logger("Transcoding");
    ripsort_av::transcode(input, output, &options, control, Some(&progress))
        .with_context(|| format!("Transcoding {:?} failed", input))?;

    Ok(())
}

fn run_pipeline(
    config: &Config,
    library: &Path,
    title: &TitleInfo,
    tolerance: Option<f64>,
    skip_rip: bool,
    no_transcode: bool,
    dry_run: bool,
) -> Result<ExitCode> {
    let staging = config.paths.staging_dir.clone();
    let control = control_token();

    // Step 1: rip
    if skip_rip {
        tracing::info!("Skipping rip, using {:?}", staging);
    } else if dry_run {
        println!(
            "[DRY RUN] Would rip disc:{} into {}",
            config.rip.disc,
            staging.display()
        );
    } else {
        rip(config, &staging, None, &control)?;
    }

    // Step 2: organize
    let Some(summary) = organize(config, &staging, library, title, tolerance, dry_run)? else {
        return Ok(ExitCode::SUCCESS);
    };
    print_summary(&summary, false)?;

    // Step 3: transcode
    if no_transcode || summary.transcodes.is_empty() {
        return Ok(exit_code(&summary));
    }

    if dry_run {
        for job in &summary.transcodes {
            println!(
                "[DRY RUN] Would transcode {} -> {}",
                job.source.display(),
                job.output.display()
            );
        }
        return Ok(exit_code(&summary));
    }

    let mut failed: Vec<PathBuf> = Vec::new();
    for job in &summary.transcodes {
        if control.is_cancelled() {
            tracing::warn!("Cancelled; not transcoding {:?}", job.source);
            failed.push(job.source.clone());
            continue;
        }
        if let Err(e) = transcode_file(config, &job.source, &job.output, None, &control) {
            tracing::error!("{:#}", e);
            failed.push(job.source.clone());
        }
    }

    if !failed.is_empty() {
        println!("\nTranscode failed for {} file(s):", failed.len());
        for path in &failed {
            println!("  {}", path.display());
        }
        return Ok(ExitCode::from(EXIT_COMPLETED_WITH_ERRORS));
    }

    Ok(exit_code(&summary))
}

fn print_summary(summary: &RunSummary, json: bool) -> Result<()> {
    if json {
        let json_str = serde_json::to_string_pretty(summary)?;
        println!("{}", json_str);
    } else {
        println!("{}", summary);
    }
    Ok(())
}

fn exit_code(summary: &RunSummary) -> ExitCode {
    match summary.status {
        RunStatus::Completed => ExitCode::SUCCESS,
        RunStatus::CompletedWithErrors => ExitCode::from(EXIT_COMPLETED_WITH_ERRORS),
    }
}

/// Create a control token, wired to stdin when it is interactive.
fn control_token() -> ControlToken {
    let control = ControlToken::new();
    if !std::io::stdin().is_terminal() {
        return control;
    }

    println!("Type 'p' + Enter to pause or resume, 'q' + Enter to cancel.");
    let remote = control.clone();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match line.trim() {
                "p" => match remote.toggle_pause() {
                    ControlState::Paused => println!("Pausing... type 'p' to resume."),
                    ControlState::Running => println!("Resuming..."),
                    ControlState::Cancelled => break,
                },
                "q" => {
                    println!("Cancelling...");
                    remote.cancel();
                    break;
                }
                _ => {}
            }
        }
    });

    control
}

/// Log progress in 5% steps.
fn progress_logger(label: &'static str) -> impl Fn(f32) {
    let last_step = Cell::new(-1i32);
    move |pct| {
        let step = (pct / 5.0).floor() as i32;
        if step > last_step.get() {
            last_step.set(step);
            tracing::info!("[{:.0}%] {}", pct, label);
        }
    }
}

fn check_tools() -> Result<ExitCode> {
    println!("Checking external tools...\n");

    let tools = ripsort_av::check_tools();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install them or set their paths under [tools].");
    }

    Ok(ExitCode::SUCCESS)
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Staging dir: {}", config.paths.staging_dir.display());
    println!("  Library dir: {}", config.paths.library_dir.display());
    println!("  Tolerance: {}", config.organize.tolerance);
    println!("  Extension: .{}", config.organize.extension);
    println!("  Extras folder: {}", config.organize.extras_dir_name);
    println!("  Transcode preset: {}", config.transcode.preset);

    Ok(())
}
