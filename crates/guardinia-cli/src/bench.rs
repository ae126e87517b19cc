//! Benchmark pipeline: load the dataset, replay it against the webhook, write reports.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::{Local, Utc};
use guardinia_bench::report::progress_bar;
use guardinia_bench::{
    BenchReport, ReportMeta, compute_metrics, load_dataset, render_report, run_benchmark,
    write_report,
};
use guardinia_client::{ClientConfig, WebhookClient};

const PROGRESS_WIDTH: usize = 40;
const PREVIEW_CHARS: usize = 30;

pub struct BenchSettings {
    pub dataset: PathBuf,
    pub limit: Option<usize>,
    pub delay: Duration,
    pub output_dir: PathBuf,
}

pub struct BenchStats {
    pub total_messages: usize,
    pub elapsed_secs: f64,
    pub json_path: PathBuf,
    pub txt_path: PathBuf,
}

/// Run the full benchmark: read dataset → submit each message → score → write reports.
pub async fn run_bench_pipeline(
    config: ClientConfig,
    settings: &BenchSettings,
) -> anyhow::Result<BenchStats> {
    eprintln!("  Endpoint : {}", config.endpoint);
    eprintln!("  Dataset  : {}", settings.dataset.display());
    eprintln!("  Delay    : {} ms between requests", settings.delay.as_millis());

    // 1. Load dataset.
    let items = load_dataset(&settings.dataset, settings.limit)
        .with_context(|| format!("loading dataset {}", settings.dataset.display()))?;
    let total = items.len();
    eprintln!("  Loaded {total} messages\n");

    // 2. Replay every message.
    let client = WebhookClient::new(config).context("building webhook client")?;
    let start = Instant::now();
    let results = run_benchmark(&client, &items, settings.delay, |done, total, item| {
        let preview: String = item
            .message
            .chars()
            .take(PREVIEW_CHARS)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        eprint!(
            "\r  {}  {preview:<width$}",
            progress_bar(done, total, PROGRESS_WIDTH),
            width = PREVIEW_CHARS
        );
    })
    .await;
    eprintln!();
    let elapsed_secs = start.elapsed().as_secs_f64();

    // 3. Score and report.
    let metrics = compute_metrics(&results);
    let meta = ReportMeta::new(Utc::now(), client.endpoint(), total, elapsed_secs);
    let text = render_report(&metrics, &meta);
    println!("{text}");

    let report = BenchReport {
        meta,
        metrics,
        results,
    };
    let (json_path, txt_path) = write_report(
        &settings.output_dir,
        Local::now().naive_local(),
        &report,
        &text,
    )
    .context("writing benchmark report")?;

    Ok(BenchStats {
        total_messages: total,
        elapsed_secs,
        json_path,
        txt_path,
    })
}
