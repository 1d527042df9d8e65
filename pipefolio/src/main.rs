use anyhow::Context;
use clap::Parser;
use pipefolio::app::{App, AppDeps, Phase};
use pipefolio::config::{ContactConfig, SiteConfig};
use pipefolio::contact::{JsonFileStore, MessageSender, SystemClock, UnconfiguredSender};
use pipefolio::events::{self, LoggingEventSink};
use pipefolio::observability::{self, LogFormat};
use pipefolio::render::TextRenderer;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, Instrument};

/// Upper bound on flushing queued output after the visit ends.
const RENDER_DRAIN: Duration = Duration::from_secs(2);

#[derive(Parser)]
#[command(name = "pipefolio")]
#[command(about = "A portfolio walkthrough staged as a DevOps pipeline")]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Local store file, overriding the configured one
    #[arg(short, long)]
    storage: Option<PathBuf>,

    /// Log format on stderr (pretty or json)
    #[arg(long, default_value = "pretty")]
    log_format: LogFormat,

    /// Disable ANSI colours
    #[arg(long)]
    no_color: bool,
}

#[cfg(feature = "emailjs")]
fn build_sender(config: &ContactConfig) -> Arc<dyn MessageSender> {
    match pipefolio::contact::EmailJsSender::from_config(config) {
        Ok(sender) => Arc::new(sender),
        Err(err) => {
            tracing::warn!(error = %err, "Mail service disabled");
            Arc::new(UnconfiguredSender::new(err.to_string()))
        }
    }
}

#[cfg(not(feature = "emailjs"))]
fn build_sender(_config: &ContactConfig) -> Arc<dyn MessageSender> {
    Arc::new(UnconfiguredSender::new("built without mail support"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    observability::init(cli.log_format, observability::DEFAULT_FILTER);

    let mut config = SiteConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(path) = cli.storage {
        config.storage_path = path;
    }

    let store = JsonFileStore::open(config.storage_path.clone())
        .with_context(|| format!("opening {}", config.storage_path.display()))?;
    events::set_event_sink(Arc::new(LoggingEventSink::default()));
    let deps = AppDeps::new(
        Arc::new(store),
        build_sender(&config.contact),
        Arc::new(SystemClock),
    );

    let (tx, rx) = mpsc::unbounded_channel();
    let renderer = tokio::spawn(TextRenderer::new(!cli.no_color).run(rx, std::io::stdout()));

    let visit = observability::visit_span();
    async move {
        let mut app = App::new(config, deps, tx);
        app.start();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("reading input")? else {
                        app.shutdown();
                        break;
                    };
                    if app.handle_input(&line).await == Phase::Exited {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    app.shutdown();
                    break;
                }
            }
        }
        // Releases the app's output sender so the renderer sees the end of the queue.
        drop(app);
        info!("Visit ended");
        anyhow::Ok(())
    }
    .instrument(visit)
    .await?;

    match tokio::time::timeout(RENDER_DRAIN, renderer).await {
        Ok(joined) => joined.context("renderer task")?.context("writing output")?,
        Err(_) => tracing::warn!("Output still queued after the visit ended"),
    }
    Ok(())
}
