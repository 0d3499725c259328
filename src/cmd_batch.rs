//! Batch subcommand handlers for PromptSnap.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use promptsnap_batch::{
    estimate_processing_time, BatchConfig, BatchProcessor, BatchResult, CancellationToken, WorkItem,
};
use promptsnap_config::{BatchSettings, Config, GeminiSettings};
use promptsnap_provider_gemini::{
    GeminiAnalyzer, GeminiClient, GenerationConfig, KeyPool, PromptStyle,
};

/// Arguments of `promptsnap run` that override the config file.
pub(crate) struct RunOptions {
    pub items: PathBuf,
    pub style: Option<String>,
    pub output: Option<PathBuf>,
    pub max_concurrent: Option<usize>,
    pub delay_ms: Option<u64>,
    pub retries: Option<u32>,
}

/// Run a batch and write the results as JSON.
pub(crate) async fn handle_run(
    config: &Config,
    options: RunOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let items = read_items(&options.items)?;
    if items.is_empty() {
        println!("No items found in {}.", options.items.display());
        return Ok(());
    }

    let style = match options.style.as_deref() {
        Some(name) => name.parse::<PromptStyle>()?,
        None => PromptStyle::parse_lossy(&config.gemini.default_style),
    };

    let batch_config = batch_config(&config.batch, &options);
    let analyzer = build_analyzer(&config.gemini)?;

    let estimate = estimate_processing_time(items.len(), batch_config.max_concurrent);
    info!(
        "Analyzing {} images (style={}, estimated {}m {}s)",
        items.len(),
        style,
        estimate.minutes,
        estimate.seconds
    );

    let processor = BatchProcessor::new(batch_config)
        .on_progress(|completed, total, label| {
            info!("[{}/{}] {}", completed, total, label);
        })
        .on_error(|message, item_id| {
            error!("{} failed: {}", item_id, message);
        });

    let cancel = CancellationToken::new();
    let ctrl_c = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if let Ok(()) = tokio::signal::ctrl_c().await {
                warn!("Received Ctrl-C, cancelling batch");
                cancel.cancel();
            }
        }
    });

    let results = processor
        .process_images_with_cancel(&analyzer, &items, style.as_str(), &cancel)
        .await;
    ctrl_c.abort();
    let results = results?;

    let json = serde_json::to_string_pretty(&results)?;
    match &options.output {
        Some(path) => {
            std::fs::write(path, json)?;
            info!("Results written to {}", path.display());
        }
        None => println!("{}", json),
    }

    print_summary(&results);

    for key in analyzer.keys().snapshot() {
        info!("{} ({}): {} requests", key.name, key.masked(), key.request_count);
    }

    Ok(())
}

/// Print the estimate for `count` items.
pub(crate) fn handle_estimate(count: usize, max_concurrent: usize) {
    let estimate = estimate_processing_time(count, max_concurrent);
    println!("Images:         {}", count);
    println!("Max concurrent: {}", max_concurrent.max(1));
    println!("Chunks:         {}", estimate.chunks);
    println!("Estimated time: {}m {}s", estimate.minutes, estimate.seconds);
}

/// List prompt styles.
pub(crate) fn handle_styles(default_style: &str) {
    let default = PromptStyle::parse_lossy(default_style);
    println!("{:<12} {}", "STYLE", "DESCRIPTION");
    println!("{}", "-".repeat(80));
    for style in PromptStyle::all() {
        let marker = if style == default { " (default)" } else { "" };
        println!("{:<12} {}{}", style.as_str(), style.description(), marker);
    }
}

/// Read work items from a JSON array or a list of image references.
fn read_items(path: &Path) -> Result<Vec<WorkItem>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_items(&content)?)
}

/// Parse a JSON array of items; anything else is one URL or path per line with `#`
/// comments and blank lines skipped.
fn parse_items(content: &str) -> Result<Vec<WorkItem>, serde_json::Error> {
    if content.trim_start().starts_with('[') {
        return serde_json::from_str(content);
    }

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(WorkItem::from_url)
        .collect())
}

fn batch_config(settings: &BatchSettings, options: &RunOptions) -> BatchConfig {
    BatchConfig::default()
        .with_max_concurrent(options.max_concurrent.unwrap_or(settings.max_concurrent))
        .with_delay_between_batches(Duration::from_millis(
            options.delay_ms.unwrap_or(settings.delay_between_batches_ms),
        ))
        .with_retry_attempts(options.retries.unwrap_or(settings.retry_attempts))
}

fn build_analyzer(settings: &GeminiSettings) -> Result<GeminiAnalyzer, Box<dyn std::error::Error>> {
    let keys = settings.resolved_api_keys();
    if keys.is_empty() {
        return Err("No Gemini API key configured (set gemini.api_keys or GEMINI_API_KEY)".into());
    }

    let client = GeminiClient::with_base_url(
        &settings.base_url,
        Duration::from_secs(settings.timeout_seconds),
        Duration::from_secs(settings.connect_timeout_seconds),
    )?;

    let generation = GenerationConfig {
        temperature: Some(settings.temperature),
        top_p: Some(settings.top_p),
        top_k: Some(settings.top_k),
        max_output_tokens: Some(settings.max_output_tokens),
    };

    Ok(GeminiAnalyzer::new(client, Arc::new(KeyPool::new(keys)))
        .with_model(&settings.model)
        .with_generation_config(generation))
}

/// `(item_id, error)` of every failed result, in input order.
fn failures(results: &[BatchResult]) -> Vec<(&str, &str)> {
    results
        .iter()
        .filter_map(|r| r.outcome().err().map(|e| (r.item_id.as_str(), e)))
        .collect()
}

fn print_summary(results: &[BatchResult]) {
    let failed = failures(results);
    eprintln!(
        "Processed {} images: {} succeeded, {} failed",
        results.len(),
        results.len() - failed.len(),
        failed.len()
    );
    for (item_id, message) in failed {
        eprintln!("  {}: {}", item_id, message);
    }
}
