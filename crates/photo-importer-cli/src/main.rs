use clap::{Parser, Subcommand};
use log::{info, warn, LevelFilter};
use photo_importer_core::{logging, Config, ImageImporter, LogLevel, SqliteIndex};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "photo-importer")]
#[command(about = "Image rename and move tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process all files for import
    Import {
        /// Location to import from
        #[arg(short, long)]
        from: Option<PathBuf>,

        /// Location to put imported files to
        #[arg(short, long)]
        to: Option<PathBuf>,

        /// Location of the database
        #[arg(short, long)]
        db: Option<PathBuf>,

        /// Delete original files once they are imported
        #[arg(long)]
        delete: bool,

        /// Force import even if already processed
        #[arg(short = 'i', long = "force-import")]
        force: bool,

        /// Report where files would go without copying anything
        #[arg(long)]
        dry_run: bool,

        /// Skip files whose path contains this substring
        #[arg(short, long)]
        exclude: Option<String>,

        /// Maximum directory depth for scanning
        #[arg(long)]
        max_depth: Option<usize>,

        /// Worker threads (0 = one per CPU)
        #[arg(long)]
        threads: Option<usize>,

        /// Write a rotating log file into this directory
        #[arg(long)]
        log_dir: Option<PathBuf>,

        /// Verbosity level
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate default configuration file
    GenerateConfig {
        /// Path to save configuration file
        #[arg(default_value = "photo-importer.json")]
        path: PathBuf,
    },
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            from,
            to,
            db,
            delete,
            force,
            dry_run,
            exclude,
            max_depth,
            threads,
            log_dir,
            verbose,
            config: config_path,
        } => {
            // Set up configuration
            let from_file = config_path.is_some();
            let mut config = match config_path {
                Some(path) => Config::from_file(&path)?,
                None => Config::default(),
            };

            // Override config with command line arguments
            if let Some(from) = from {
                config.source = from;
            }
            if let Some(to) = to {
                config.destination = to;
            }
            if let Some(db) = db {
                config.database_path = db;
            }
            config.delete_source |= delete;
            config.force |= force;
            config.dry_run |= dry_run;
            if exclude.is_some() {
                config.exclude = exclude;
            }
            if max_depth.is_some() {
                config.max_depth = max_depth;
            }
            if let Some(threads) = threads {
                config.threads = threads;
            }
            config.show_progress =
                show_progress(from_file.then_some(config.show_progress), log_dir.is_some());

            // Set log level based on verbosity
            config.log_level = match verbose {
                0 => config.log_level,
                1 => LogLevel::Debug,
                _ => LogLevel::Trace,
            };

            init_logging(log_dir, config.log_level, !config.show_progress)?;

            config.validate()?;

            // The run cannot guarantee deduplication without its index
            let index = Arc::new(SqliteIndex::open(&config.database_path)?);
            let importer = ImageImporter::new(config, index);

            let shutdown = importer.shutdown_handle();
            ctrlc::set_handler(move || {
                warn!("Stop requested, finishing files in progress");
                shutdown.store(true, Ordering::SeqCst);
            })?;

            info!("Starting import...");
            let summary = importer.run()?;
            summary.log_report();
            info!("Import complete");

            Ok(())
        }

        Commands::GenerateConfig { path } => {
            let config = Config::default();
            config.save_to_file(&path)?;
            println!("Configuration file generated at: {}", path.display());
            Ok(())
        }
    }
}

/// Draw the bar unless a config file turned it off; never while logs go to stderr only
fn show_progress(from_config_file: Option<bool>, logs_to_file: bool) -> bool {
    from_config_file.unwrap_or(true) && logs_to_file
}

fn init_logging(
    log_dir: Option<PathBuf>,
    level: LogLevel,
    console: bool,
) -> Result<(), anyhow::Error> {
    let level = LevelFilter::from(level);
    match log_dir {
        Some(dir) => logging::init_logger(&dir, level, console)?,
        None => env_logger::Builder::new()
            .filter_level(level)
            .parse_env("IMPORT_LOG")
            .init(),
    }
    Ok(())
}
