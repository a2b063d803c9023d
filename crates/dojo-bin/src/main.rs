//! vimdojo entrypoint: a headless host for the tutorial core.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use core_config::{Config, load_from};
use core_lesson::Catalog;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

mod replay;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "vimdojo", version, about = "Modal editing tutorial")]
struct Args {
    /// Optional configuration file path (overrides discovery of `vimdojo.toml`).
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every lesson in the catalog.
    List,
    /// Print one lesson as JSON.
    Show { id: u32 },
    /// Replay a key script against a lesson and print the outcome as JSON.
    Play {
        id: u32,
        /// Key script, e.g. `jjdd` or `ihello<Esc>`.
        #[arg(long)]
        keys: String,
    },
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("vimdojo.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, "vimdojo.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global tracing subscriber already installed; drop guard so writer shuts down.
            }
        }

        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

fn load_catalog(config: &Config) -> Result<Catalog> {
    match config.catalog_path() {
        Some(path) => Catalog::load_from_path(path)
            .with_context(|| format!("loading lesson catalog {}", path.display())),
        None => Catalog::builtin().context("loading built-in lesson catalog"),
    }
}

fn run(args: Args, out: &mut impl Write) -> Result<()> {
    let config = load_from(args.config.clone())?;
    let catalog = load_catalog(&config)?;
    info!(
        target: "runtime.startup",
        lessons = catalog.len(),
        config_override = args.config.is_some(),
        history_depth = config.effective_history_depth,
        "bootstrap_complete"
    );

    match args.command {
        Command::List => {
            for lesson in catalog.lessons() {
                writeln!(out, "{:>3}  {}", lesson.id, lesson.title)?;
            }
        }
        Command::Show { id } => {
            let lesson = catalog.get(id)?;
            writeln!(out, "{}", serde_json::to_string_pretty(lesson)?)?;
        }
        Command::Play { id, keys } => {
            let lesson = catalog.get(id)?;
            let report = replay::play(lesson, config.effective_history_depth, &keys)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let stdout = std::io::stdout();
    run(args, &mut stdout.lock())
}
