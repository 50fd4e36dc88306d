//! Hangeuldown - A terminal markdown editor with live preview.
//!
//! # Usage
//!
//! ```bash
//! hangeuldown
//! hangeuldown 메모.md
//! hangeuldown --theme dark --output-dir ~/Documents
//! ```

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hangeuldown::app::App;
use hangeuldown::config::{
    ConfigFlags, ThemeMode, clear_config_flags, default_storage_path, global_config_path,
    load_config_flags, local_override_path, parse_flag_tokens, save_config_flags,
};
use hangeuldown::perf;

/// A terminal markdown editor with live preview
#[derive(Parser, Debug)]
#[command(name = "hangeuldown", version, about, long_about = None)]
struct Cli {
    /// Markdown file to open instead of the stored document
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Start in light or dark mode (and remember it)
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Directory for saved markdown and exported HTML
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Key-value store file holding the autosaved document and theme
    #[arg(long, value_name = "PATH")]
    storage: Option<PathBuf>,

    /// Enable startup performance logging
    #[arg(long)]
    perf: bool,

    /// Write detailed render debug events to a file
    #[arg(long, value_name = "PATH")]
    render_debug_log: Option<PathBuf>,

    /// Write tracing output to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_logging(log_file: Option<&PathBuf>, perf_enabled: bool) -> Result<()> {
    let mut filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    if perf_enabled {
        filter = filter.add_directive("perf=info".parse()?);
    }
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();

    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);
    init_logging(cli.log_file.as_ref(), effective.perf)?;

    perf::set_enabled(effective.perf);
    let render_debug_log_path = effective
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os(perf::RENDER_DEBUG_LOG_ENV).map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(render_debug_log_path.as_deref()) {
        tracing::warn!(
            path = ?render_debug_log_path,
            error = %err,
            "failed to initialize render debug log"
        );
    }

    if let Some(path) = &cli.file
        && !path.exists()
    {
        anyhow::bail!("File not found: {}", path.display());
    }

    let storage = effective.storage.unwrap_or_else(default_storage_path);
    let output_dir = effective.output_dir.unwrap_or_else(|| PathBuf::from("."));
    tracing::debug!(
        storage = %storage.display(),
        output_dir = %output_dir.display(),
        "starting"
    );

    let mut app = App::new(storage)
        .with_file(cli.file)
        .with_output_dir(output_dir)
        .with_theme(effective.theme)
        .with_config_paths(
            Some(global_path),
            if local_path.exists() {
                Some(local_path)
            } else {
                None
            },
        );

    app.run().context("Application error")
}
