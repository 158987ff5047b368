//! CLI entry point for subgrab.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;
use subgrab_core::{
    ContentType, DEFAULT_SUB_NUM, HttpSettings, Resolution, SiteConfig, SubhdSource,
    SubtitleSource, VideoQuery,
};
use tracing::{debug, info, warn};

mod app_config;
mod cli;
mod output;
mod progress;

use app_config::{FileConfig, load_default_file_config};
use cli::Args;
use progress::BarProgress;

/// Printed when the source produced nothing usable.
const NOT_FOUND_MESSAGE: &str = "no subtitle found via subhd";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    let loaded = load_default_file_config()?;
    let file_config = loaded.config.clone().unwrap_or_default();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > config verbosity > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => file_config
                .verbosity
                .map_or("info", app_config::VerbositySetting::log_level),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, config_path = ?loaded.path, "CLI arguments parsed");

    run(args, &file_config).await
}

async fn run(args: Args, file_config: &FileConfig) -> Result<ExitCode> {
    let site = match args.base_url.as_deref().or(file_config.base_url.as_deref()) {
        Some(base_url) => SiteConfig::with_base_url(base_url),
        None => SiteConfig::new(),
    };
    let settings = http_settings(file_config);
    let sub_num = args
        .count
        .or(file_config.sub_num)
        .map_or(DEFAULT_SUB_NUM, usize::from);
    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| file_config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let content_type = if args.movie {
        ContentType::Movie
    } else {
        ContentType::Other
    };
    let video = VideoQuery::new(args.keywords, content_type);
    let source = SubhdSource::new(site, settings)?;

    let candidates = match source.search(&video, sub_num).await {
        Ok(candidates) => candidates,
        Err(error) => {
            warn!(source = source.name(), error = %error, "search failed");
            eprintln!("{NOT_FOUND_MESSAGE}");
            return Ok(ExitCode::FAILURE);
        }
    };
    if candidates.is_empty() {
        eprintln!("{NOT_FOUND_MESSAGE}");
        return Ok(ExitCode::FAILURE);
    }

    for (index, name) in candidates.names().enumerate() {
        println!("{:>2}. {name}", index + 1);
    }
    if args.list {
        return Ok(ExitCode::SUCCESS);
    }

    let pick = usize::from(args.pick.unwrap_or(1));
    let Some(candidate) = candidates.get_index(pick - 1) else {
        bail!(
            "--pick {pick} is out of range: only {} candidates were found",
            candidates.len()
        );
    };
    info!(candidate = %candidate.display_name, "Downloading");

    let mut progress = BarProgress::new(!args.quiet);
    let resolution = match source
        .download(candidate, &candidate.display_name, &mut progress)
        .await
    {
        Ok(resolution) => resolution,
        Err(error) => {
            warn!(source = source.name(), error = %error, "download failed");
            eprintln!("{NOT_FOUND_MESSAGE}");
            return Ok(ExitCode::FAILURE);
        }
    };

    if resolution.is_timeout() {
        warn!("download timed out");
        eprintln!("download timed out, please change to other downloaders");
        return Ok(ExitCode::FAILURE);
    }

    match resolution {
        Resolution::Bytes { archive, payload } => {
            let file_name = output::archive_file_name(&candidate.display_name, archive);
            let path = output::write_archive(&output_dir, &file_name, &payload).await?;
            info!(
                path = %path.display(),
                bytes = payload.len(),
                archive = %archive,
                "Saved subtitle archive"
            );
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Resolution::Empty => {
            warn!("downloaded archive was empty");
            eprintln!("{NOT_FOUND_MESSAGE}");
            Ok(ExitCode::FAILURE)
        }
        Resolution::Failure(message) => {
            eprintln!("{message}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn http_settings(file_config: &FileConfig) -> HttpSettings {
    let defaults = HttpSettings::default();
    HttpSettings {
        connect_timeout: file_config
            .connect_timeout_secs
            .map_or(defaults.connect_timeout, Duration::from_secs),
        search_timeout: file_config
            .search_timeout_secs
            .map_or(defaults.search_timeout, Duration::from_secs),
        fetch_timeout: file_config
            .fetch_timeout_secs
            .map_or(defaults.fetch_timeout, Duration::from_secs),
    }
}
