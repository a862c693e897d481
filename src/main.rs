//! Command-line entrypoint: loads named sources from a YAML file, starts a
//! crawl, and waits for completion or a Ctrl-C shutdown signal.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crawlcore::{
    Article, Crawler, Handler, InMemoryIndexStore, JobService, SignalHandler, Sources, Supervisor,
    TokenSignalHandler, YamlSources,
};

#[derive(Parser)]
#[command(name = "crawlcore", about = "Configurable web-content crawling engine")]
struct Cli {
    /// Name of the source to crawl, as declared in the sources file.
    source_name: String,

    /// Path to a YAML file of source definitions.
    #[arg(long, default_value = "sources.yaml")]
    config: String,

    /// Enable debug-level logging.
    #[arg(long)]
    debug: bool,
}

/// Logs every event verb at a level appropriate to its severity.
struct LoggingHandler;

impl Handler for LoggingHandler {
    fn handle_article(&self, article: &Article) -> crawlcore::CrawlResult<()> {
        tracing::info!(url = %article.canonical_url, title = %article.title, "article extracted");
        Ok(())
    }

    fn handle_error(&self, source: &str, message: &str) -> crawlcore::CrawlResult<()> {
        tracing::warn!(source, message, "crawl error");
        Ok(())
    }

    fn handle_start(&self, source: &str) -> crawlcore::CrawlResult<()> {
        tracing::info!(source, "crawl started");
        Ok(())
    }

    fn handle_stop(&self, source: &str) -> crawlcore::CrawlResult<()> {
        tracing::info!(source, "crawl stopped");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "crawl failed");
            ExitCode::FAILURE
        }
    }
}

/// Strip one layer of matching leading/trailing quotes (`"` or `'`) from a
/// source name, so a shell that preserved literal quotes around the
/// positional argument doesn't produce an unmatchable name.
fn strip_quotes(name: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(stripped) = name.strip_prefix(quote).and_then(|s| s.strip_suffix(quote)) {
            return stripped;
        }
    }
    name
}

async fn run(cli: Cli) -> crawlcore::CrawlResult<()> {
    let sources: Arc<dyn Sources> = Arc::new(YamlSources::load(&cli.config)?);
    let store = Arc::new(InMemoryIndexStore::new());

    let source_name = strip_quotes(&cli.source_name);
    let Some(source) = sources.get(source_name) else {
        return Err(crawlcore::CrawlCoreError::SourceNotFound(source_name.to_string()));
    };
    store.create_index(source.article_index());
    store.create_index(source.page_index());

    let crawler = Arc::new(Crawler::new(sources, store));
    crawler.subscribe(Arc::new(LoggingHandler));

    let job = Arc::new(JobService::new(crawler.clone(), source.name().to_string()));
    job.start().await?;

    let handler = TokenSignalHandler::new();
    let cancel_on_signal = handler.request_shutdown();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_on_signal.cancel();
        }
    });

    let supervisor = Supervisor::new(job.clone());
    tokio::select! {
        () = crawler.wait() => {}
        result = supervisor.run(&handler) => { result?; }
    }

    Ok(())
}
