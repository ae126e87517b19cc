mod bench;
mod display;

use std::io::Read as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use guardinia_client::{ClientConfig, WebhookClient};
use guardinia_core::{DEFAULT_ENDPOINT, DEFAULT_ORIGIN, ImageFile, InputMode};
use guardinia_ui::{Controller, SubmitOutcome};
use tracing_subscriber::EnvFilter;

use crate::display::TerminalView;

#[derive(Parser)]
#[command(name = "guardinia", version, about = "Check messages and screenshots for scams")]
struct Cli {
    /// Analysis webhook URL.
    #[arg(long, env = "GUARDINIA_ENDPOINT", default_value = DEFAULT_ENDPOINT, global = true)]
    endpoint: String,

    /// Origin tag sent with every request.
    #[arg(long, env = "GUARDINIA_ORIGIN", default_value = DEFAULT_ORIGIN, global = true)]
    origin: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyse a text message. Reads stdin when MESSAGE is omitted.
    AnalyzeText {
        message: Option<String>,

        /// Also write the rendered result panel to this HTML file.
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Analyse a screenshot (PNG, JPEG or WEBP, at most 5 MB).
    AnalyzeImage {
        path: PathBuf,

        /// MIME type, guessed from the extension when omitted.
        #[arg(long)]
        mime: Option<String>,

        /// Also write the rendered result panel to this HTML file.
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Replay a labelled dataset against the webhook and report accuracy.
    Bench {
        #[arg(long, env = "GUARDINIA_DATASET", default_value = "guardinia_dataset.json")]
        dataset: PathBuf,

        /// Only test the first N messages.
        #[arg(long, env = "LIMIT")]
        limit: Option<usize>,

        /// Pause between requests.
        #[arg(long, env = "REQUEST_DELAY_MS", default_value_t = 300)]
        delay_ms: u64,

        /// Per-request timeout.
        #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 15)]
        timeout_secs: u64,

        /// Where the JSON and text reports are written.
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    tracing::debug!("guardinia v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::AnalyzeText { message, html } => {
            let message = match message {
                Some(message) => message,
                None => read_stdin().context("reading message from stdin")?,
            };
            let client = WebhookClient::new(client_config(&cli.endpoint, &cli.origin, None))?;
            let controller = Controller::new(client, TerminalView::default());
            controller.set_message(&message);
            run_submission(&controller, html.as_deref()).await
        }
        Command::AnalyzeImage { path, mime, html } => {
            let file = load_image(&path, mime)?;
            let client = WebhookClient::new(client_config(&cli.endpoint, &cli.origin, None))?;
            let controller = Controller::new(client, TerminalView::default());
            controller.select_mode(InputMode::Image);
            // The rejection was already shown through the view.
            if controller.attach_image(file).is_err() {
                bail!("{} was rejected", path.display());
            }
            run_submission(&controller, html.as_deref()).await
        }
        Command::Bench {
            dataset,
            limit,
            delay_ms,
            timeout_secs,
            output_dir,
        } => {
            let config = client_config(
                &cli.endpoint,
                &cli.origin,
                Some(Duration::from_secs(timeout_secs)),
            );
            let settings = bench::BenchSettings {
                dataset,
                limit,
                delay: Duration::from_millis(delay_ms),
                output_dir,
            };
            let stats = bench::run_bench_pipeline(config, &settings).await?;
            eprintln!(
                "\n  Done: {} messages in {:.1}s",
                stats.total_messages, stats.elapsed_secs
            );
            eprintln!("  JSON report: {}", stats.json_path.display());
            eprintln!("  Text report: {}", stats.txt_path.display());
            Ok(())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn client_config(endpoint: &str, origin: &str, timeout: Option<Duration>) -> ClientConfig {
    ClientConfig {
        endpoint: endpoint.to_string(),
        origin: Some(origin.to_string()).filter(|o| !o.is_empty()),
        timeout,
    }
}

/// Submit whatever the controller holds, print the card, and optionally save the panel.
async fn run_submission(
    controller: &Controller<WebhookClient, TerminalView>,
    html: Option<&Path>,
) -> anyhow::Result<()> {
    let mode = controller.mode();
    let Ok(outcome) = controller.submit().await else {
        bail!("nothing to analyse");
    };

    if let Some(path) = html {
        let panel = controller
            .view()
            .last_panel()
            .context("no result panel was rendered")?;
        std::fs::write(path, display::panel_document(&panel))
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "saved result panel");
    }

    match outcome {
        SubmitOutcome::Completed(result) => {
            display::print_result_card(&result, mode);
            Ok(())
        }
        SubmitOutcome::Failed(err) => {
            display::print_connection_error(mode);
            Err(anyhow::Error::new(err).context("analysis request failed"))
        }
        SubmitOutcome::Superseded => bail!("submission was superseded"),
    }
}

fn load_image(path: &Path, mime: Option<String>) -> anyhow::Result<ImageFile> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let mime = mime.unwrap_or_else(|| guess_mime(path));
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(ImageFile::new(name, mime, bytes))
}

fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string()
}

fn read_stdin() -> std::io::Result<String> {
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
