mod models;
mod service;
mod utils;

use crate::models::backup_status::Integrity;
use crate::models::config::{save_config, setup_config, Config, Theme};
use crate::models::config_validator::validate_config;
use crate::service::backup::BackupStore;
use crate::service::locator::{find_audio_dir, find_games_dir, find_install_dir};
use crate::service::replace::replace_resource;
use crate::service::resources::{describe_resource, list_audio_files, list_resources};
use crate::utils::activity_log::LogFacade;
use crate::utils::progress::{create_progress_bar, format_bytes};
use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

type Store = BackupStore<LogFacade>;

#[derive(Parser)]
#[command(name = "RustyBgmSwap")]
#[command(about = "Swap EasiNote 5 background music with one-time backups", long_about = None)]
struct Cli {
    #[arg(
        short = 'c',
        long = "config",
        default_value = "config.json",
        env = "RUSTYBGMSWAP_CONFIG"
    )]
    config_file: String,

    /// Overrides the log_level from the config file
    #[arg(short = 'l', long = "log-level", env = "LOG_LEVEL")]
    log_level: Option<String>,

    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    #[arg(short = 'v', long = "validate-only")]
    validate_only: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the detected install, audio and games directories
    Detect,
    /// List replaceable resources and their backup status
    List {
        /// List mini-game packages instead of activity audio
        #[arg(long)]
        games: bool,
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Show size, modification time and backup status of a resource
    Info { file: PathBuf },
    /// Take the one-time backup of a resource
    Backup(Target),
    /// Replace an audio resource, backing up the original first
    Replace {
        target: PathBuf,
        replacement: PathBuf,
    },
    /// Restore a resource from its backup
    Restore(Target),
    /// Check whether a resource still matches its backup
    Verify(Target),
    /// Show or edit the configuration file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args)]
struct Target {
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    file: Option<PathBuf>,
    /// Every audio resource in the audio directory
    #[arg(long)]
    all: bool,
    /// Audio directory to use instead of the detected one
    #[arg(long, requires = "all")]
    dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum ConfigCommand {
    Show,
    SetPath { path: String },
    SetTheme { theme: Theme },
    SetBackupDir { path: String },
    /// Window size as WIDTHxHEIGHT
    SetWindow { size: String },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    let config_path = PathBuf::from(
        args.config_file
            .trim_matches(|c| c == '"' || c == '\''),
    );

    // Loaded before logging starts so the configured level can apply
    let config = setup_config(&config_path);
    let log_level = args
        .log_level
        .clone()
        .or_else(|| config.as_ref().ok().map(|c| c.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    init_logging(&log_level);

    info!("RustyBgmSwap starting...");
    let config: Config = config.context("Failed to load configuration")?;
    debug!("Loaded config: {:?}", &config);

    if args.validate_only {
        info!("Configuration is valid. Exiting (--validate-only mode).");
        return Ok(());
    }

    let store = open_store(&config)?;

    match args.command.unwrap_or(Command::Detect) {
        Command::Detect => detect(&store, &config),
        Command::List { games, dir } => list(&store, &config, games, dir),
        Command::Info { file } => show_info(&store, &config, &file),
        Command::Backup(target) => backup(&store, &config, target, args.quiet),
        Command::Replace {
            target,
            replacement,
        } => replace(&store, &config, &target, &replacement),
        Command::Restore(target) => restore(&store, &config, target, args.quiet),
        Command::Verify(target) => verify(&store, &config, target),
        Command::Config(command) => edit_config(config, &config_path, command),
    }
}

fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp_secs()
        .init();
}

fn open_store(config: &Config) -> Result<Store> {
    let exe = std::env::current_exe().context("Failed to locate the running executable")?;
    let base = exe
        .parent()
        .ok_or_else(|| anyhow!("Executable has no parent directory: {}", exe.display()))?;
    let backup_dir = config.resolved_backup_dir(base);
    debug!("Using backup directory: {}", backup_dir.display());
    Ok(BackupStore::new(backup_dir, LogFacade::default()))
}

fn audio_dir(config: &Config, dir: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = dir {
        return Ok(dir);
    }
    let install = find_install_dir(config).context("Set the path with `config set-path <DIR>`")?;
    Ok(find_audio_dir(&install)?)
}

/// Paths that do not exist as given are looked up in the audio directory,
/// so a bare file name like `bgm01.mp3` works.
fn resolve_resource(config: &Config, file: &Path) -> PathBuf {
    if file.exists() || file.components().count() > 1 {
        return file.to_path_buf();
    }
    match audio_dir(config, None) {
        Ok(dir) if dir.join(file).exists() => dir.join(file),
        _ => file.to_path_buf(),
    }
}

fn detect(store: &Store, config: &Config) -> Result<()> {
    println!("Backup directory:  {}", store.backup_dir().display());

    let install = find_install_dir(config).context("Set the path with `config set-path <DIR>`")?;
    println!("Install directory: {}", install.display());

    match find_audio_dir(&install) {
        Ok(dir) => println!("Audio directory:   {}", dir.display()),
        Err(e) => println!("Audio directory:   not found ({})", e),
    }
    match find_games_dir(config, &install) {
        Ok(dir) => println!("Games directory:   {}", dir.display()),
        Err(e) => println!("Games directory:   not found ({})", e),
    }
    Ok(())
}

fn list(store: &Store, config: &Config, games: bool, dir: Option<PathBuf>) -> Result<()> {
    let dir = match (dir, games) {
        (Some(dir), _) => dir,
        (None, true) => find_games_dir(config, &find_install_dir(config)?)?,
        (None, false) => audio_dir(config, None)?,
    };

    let resources = list_resources(store, &dir, &config.audio_formats)
        .with_context(|| format!("Failed to list resources in {}", dir.display()))?;

    if resources.is_empty() {
        warn!("No resources found in {}", dir.display());
        return Ok(());
    }

    println!("{} resources in {}", resources.len(), dir.display());
    for resource in &resources {
        println!(
            "{:<40} {:<8} {:>12}  {:<19}  {}",
            resource.file_name,
            resource.kind,
            format_bytes(resource.size),
            resource
                .last_modified
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
            resource.backup_status
        );
    }
    Ok(())
}

fn show_info(store: &Store, config: &Config, file: &Path) -> Result<()> {
    let path = resolve_resource(config, file);
    let resource = describe_resource(store, &path, &config.audio_formats)?;

    println!("File name:      {}", resource.file_name);
    println!("Path:           {}", resource.path.display());
    println!("Kind:           {}", resource.kind);
    println!("Size:           {}", format_bytes(resource.size));
    if let Some(modified) = resource.last_modified {
        println!("Modified:       {}", modified.format("%Y-%m-%d %H:%M:%S"));
    }
    println!("Backup:         {}", resource.backup_status);
    if resource.backup_status.has_backup() {
        let record = store.record_for(&path)?;
        println!("Backup file:    {}", record.backup_path.display());
    }
    Ok(())
}

fn backup(store: &Store, config: &Config, target: Target, quiet: bool) -> Result<()> {
    if let Some(file) = target.file {
        let path = resolve_resource(config, &file);
        let backup_path = store.ensure_backup(&path)?;
        println!("Backup: {}", backup_path.display());
        return Ok(());
    }

    let dir = audio_dir(config, target.dir)?;
    let files = list_audio_files(&dir, &config.audio_formats)?;
    run_batch(&files, "Backing up", quiet, |path| {
        store.ensure_backup(path).map(|_| ())
    })
}

fn replace(store: &Store, config: &Config, target: &Path, replacement: &Path) -> Result<()> {
    let target = resolve_resource(config, target);
    let outcome = replace_resource(store, &target, replacement, &config.audio_formats)
        .with_context(|| format!("Failed to replace {}", target.display()))?;

    println!(
        "Replaced {} ({}). Original kept at {}",
        target.display(),
        format_bytes(outcome.bytes_written),
        outcome.backup_path.display()
    );
    Ok(())
}

fn restore(store: &Store, config: &Config, target: Target, quiet: bool) -> Result<()> {
    if let Some(file) = target.file {
        let path = resolve_resource(config, &file);
        store.restore(&path)?;
        println!("Restored {}", path.display());
        return Ok(());
    }

    let dir = audio_dir(config, target.dir)?;
    let files: Vec<PathBuf> = list_audio_files(&dir, &config.audio_formats)?
        .into_iter()
        .filter(|path| matches!(store.status(path), Ok(status) if status.has_backup()))
        .collect();
    run_batch(&files, "Restoring", quiet, |path| store.restore(path))
}

fn verify(store: &Store, config: &Config, target: Target) -> Result<()> {
    if let Some(file) = target.file {
        let path = resolve_resource(config, &file);
        println!("{}: {}", path.display(), store.verify(&path)?);
        return Ok(());
    }

    let dir = audio_dir(config, target.dir)?;
    let files = list_audio_files(&dir, &config.audio_formats)?;

    // Each task only reads its own path
    let results: Vec<_> = files
        .par_iter()
        .map(|path| (path, store.verify(path)))
        .collect();

    let mut failed = 0;
    let mut modified = 0;
    for (path, result) in results {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        match result {
            Ok(integrity) => {
                if integrity == Integrity::Modified {
                    modified += 1;
                }
                println!("{:<40} {}", name, integrity);
            }
            Err(e) => {
                failed += 1;
                warn!("Failed to verify {}: {}", path.display(), e);
            }
        }
    }

    info!("{} of {} resources modified", modified, files.len());
    if failed > 0 {
        bail!("{} of {} resources could not be verified", failed, files.len());
    }
    Ok(())
}

/// Apply `op` to each file independently; one failure never stops the rest.
fn run_batch<F>(files: &[PathBuf], label: &str, quiet: bool, op: F) -> Result<()>
where
    F: Fn(&Path) -> crate::models::error::Result<()>,
{
    if files.is_empty() {
        warn!("No audio resources to process");
        return Ok(());
    }

    let progress = (!quiet).then(|| create_progress_bar(files.len() as u64, label));
    let mut failed = 0;

    for path in files {
        if let Some(bar) = &progress {
            bar.set_message(
                path.file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string(),
            );
        }
        if let Err(e) = op(path) {
            failed += 1;
            warn!("{} {} failed: {}", label, path.display(), e);
        }
        if let Some(bar) = &progress {
            bar.inc(1);
        }
    }

    if let Some(bar) = progress {
        bar.finish_with_message("done");
    }

    info!(
        "{}: {} succeeded, {} failed",
        label,
        files.len() - failed,
        failed
    );
    if failed > 0 {
        bail!("{} of {} resources failed", failed, files.len());
    }
    Ok(())
}

fn edit_config(mut config: Config, config_path: &Path, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            println!("=== {} ===", config_path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
            return Ok(());
        }
        ConfigCommand::SetPath { path } => config.install_path = path,
        ConfigCommand::SetTheme { theme } => config.theme = theme,
        ConfigCommand::SetBackupDir { path } => config.backup_dir = Some(path),
        ConfigCommand::SetWindow { size } => {
            let (width, height) = parse_window_size(&size)?;
            config.window_width = width;
            config.window_height = height;
        }
    }

    validate_config(&config).context("Refusing to save an invalid configuration")?;
    save_config(&config, config_path)?;
    println!("Saved {}", config_path.display());
    Ok(())
}

fn parse_window_size(size: &str) -> Result<(u32, u32)> {
    let (width, height) = size
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow!("Window size must look like 1280x720, got '{}'", size))?;
    let width = width.trim().parse().context("Invalid window width")?;
    let height = height.trim().parse().context("Invalid window height")?;
    Ok((width, height))
}
