use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use pulse_settings::{
    CheckpointScheme, CheckpointStore, HistoryLog, RunConfig, Settings, CHECKPOINT_FILE,
    CHECKPOINT_SUBFOLDER, LOCAL_CHECKPOINT_FILENAME, LOG_FILENAME,
};

#[derive(Parser)]
#[command(author, version, about = "Inspect and prepare pulse RNN run directories", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every fixed name and resolved path
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the checkpoint path for an epoch
    Checkpoint {
        epoch: u32,

        #[arg(short, long, default_value_t = CheckpointScheme::Local)]
        scheme: CheckpointScheme,

        /// Run name (defaults to the one in config.json)
        #[arg(short, long)]
        run: Option<String>,
    },
    /// Print the newest checkpoint on disk
    Latest {
        #[arg(short, long, default_value_t = CheckpointScheme::Local)]
        scheme: CheckpointScheme,

        #[arg(short, long)]
        run: Option<String>,
    },
    /// Create the run directories and a default config.json if missing
    Init {
        #[arg(short, long)]
        run: Option<String>,
    },
    /// Print the run history
    History {
        #[arg(short, long)]
        run: Option<String>,
    },
}

#[derive(Serialize)]
struct Layout {
    working_dir: PathBuf,
    config_file: PathBuf,
    saved_runs_dir: PathBuf,
    drive_dir: PathBuf,
    drive_history_log: PathBuf,
    log_filename: &'static str,
    checkpoint_file: &'static str,
    local_checkpoint_filename: &'static str,
    checkpoint_subfolder: &'static str,
}

fn resolve_run(settings: &Settings, run: Option<String>) -> Result<String> {
    match run {
        Some(run) => Ok(run),
        None => {
            let config_path = settings.run_paths().config_file();
            let config = RunConfig::load_or_default(&config_path)
                .with_context(|| format!("Failed to read {:?}", config_path))?;
            Ok(config.run_name)
        }
    }
}

fn checkpoint_store(settings: &Settings, scheme: CheckpointScheme, run: &str) -> CheckpointStore {
    match scheme {
        CheckpointScheme::Drive => CheckpointStore::new(settings.drive_dir.clone(), scheme.template()),
        CheckpointScheme::Local => {
            CheckpointStore::new(settings.run_paths().checkpoint_dir(run), scheme.template())
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let settings = Settings::from_env();

    match cli.command {
        Commands::Show { json } => {
            let run_paths = settings.run_paths();
            let layout = Layout {
                working_dir: run_paths.working_dir().to_path_buf(),
                config_file: run_paths.config_file(),
                saved_runs_dir: run_paths.saved_runs_dir(),
                drive_dir: settings.drive_dir.clone(),
                drive_history_log: settings.drive_paths().history_log(),
                log_filename: LOG_FILENAME,
                checkpoint_file: CHECKPOINT_FILE,
                local_checkpoint_filename: LOCAL_CHECKPOINT_FILENAME,
                checkpoint_subfolder: CHECKPOINT_SUBFOLDER,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&layout)?);
            } else {
                println!("working_dir               {}", layout.working_dir.display());
                println!("config_file               {}", layout.config_file.display());
                println!("saved_runs_dir            {}", layout.saved_runs_dir.display());
                println!("drive_dir                 {}", layout.drive_dir.display());
                println!("drive_history_log         {}", layout.drive_history_log.display());
                println!("log_filename              {}", layout.log_filename);
                println!("checkpoint_file           {}", layout.checkpoint_file);
                println!("local_checkpoint_filename {}", layout.local_checkpoint_filename);
                println!("checkpoint_subfolder      {}", layout.checkpoint_subfolder);
            }
        }
        Commands::Checkpoint { epoch, scheme, run } => {
            let run = resolve_run(&settings, run)?;
            let store = checkpoint_store(&settings, scheme, &run);
            println!("{}", store.path_for(epoch).display());
        }
        Commands::Latest { scheme, run } => {
            let run = resolve_run(&settings, run)?;
            let store = checkpoint_store(&settings, scheme, &run);
            let latest = store
                .latest()
                .with_context(|| format!("Failed to scan {:?}", store.dir()))?;
            match latest {
                Some(checkpoint) => {
                    println!("{}\t{}", checkpoint.epoch, checkpoint.path.display());
                }
                None => {
                    eprintln!("No checkpoints found under {:?}", store.dir());
                    std::process::exit(1);
                }
            }
        }
        Commands::Init { run } => {
            let run_paths = settings.run_paths();
            let config_path = run_paths.config_file();
            let mut config = RunConfig::load_or_default(&config_path)
                .with_context(|| format!("Failed to read {:?}", config_path))?;
            if let Some(run) = run {
                config.run_name = run;
            }
            if !config_path.exists() {
                config.save(&config_path).context("Failed to write config.json")?;
                log::info!("Wrote default config to {:?}", config_path);
            }
            let run_dir = run_paths
                .ensure_run_dirs(&config.run_name)
                .context("Failed to create run directories")?;
            println!("Run '{}' ready at {}", config.run_name, run_dir.display());
        }
        Commands::History { run } => {
            let run = resolve_run(&settings, run)?;
            let log = HistoryLog::at(settings.run_paths().history_log(&run));
            let records = log
                .read()
                .with_context(|| format!("Failed to read {:?}", log.path()))?;
            if records.is_empty() {
                println!("No history recorded for run '{}'", run);
            }
            for record in records {
                let metrics: Vec<String> = record
                    .metrics
                    .iter()
                    .map(|(name, value)| format!("{}={:.4}", name, value))
                    .collect();
                println!("Epoch {} | {}", record.epoch, metrics.join(" | "));
            }
        }
    }

    Ok(())
}
