//! PromptSnap - batch image-to-prompt generation
//!
//! Main entry point for the PromptSnap CLI.

use std::path::Path;

use clap::Parser;
use tracing::warn;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use promptsnap_config::{ConfigLoader, ConfigValidator, LoggingSettings};

mod cli;
mod cmd_batch;

use cli::{Cli, Commands};
use cmd_batch::{handle_estimate, handle_run, handle_styles, RunOptions};

fn init_tracing(logging: &LoggingSettings) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .ok()
        .or_else(|| EnvFilter::try_new(&logging.level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    // Console goes to stderr so results on stdout stay machine-readable
    let console = fmt::layer()
        .with_target(true)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .boxed();

    let file = match &logging.directory {
        Some(dir) => {
            let log_dir = ConfigLoader::expand_path(dir);
            std::fs::create_dir_all(&log_dir)?;

            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("promptsnap")
                .filename_suffix("log")
                .max_log_files(30)
                .build(Path::new(&log_dir))?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Keep the writer alive for the program duration
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false).boxed())
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = ConfigLoader::load_or_default(&cli.config)?;
    init_tracing(&config.logging)?;

    for warning in ConfigValidator::validate(&config).into_result()? {
        warn!("Config {}: {}", warning.path, warning.message);
    }

    match cli.command {
        Commands::Run {
            items,
            style,
            output,
            max_concurrent,
            delay_ms,
            retries,
        } => {
            let options = RunOptions {
                items,
                style,
                output,
                max_concurrent,
                delay_ms,
                retries,
            };
            handle_run(&config, options).await
        }
        Commands::Estimate { count, max_concurrent } => {
            handle_estimate(count, max_concurrent.unwrap_or(config.batch.max_concurrent));
            Ok(())
        }
        Commands::Styles => {
            handle_styles(&config.gemini.default_style);
            Ok(())
        }
    }
}
