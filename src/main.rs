use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use ragx_api::generation::{DEFAULT_MODEL, DEFAULT_OLLAMA_URL};
use ragx_api::{AnswerConfig, AnswerService, OllamaClient, RestApi};
use ragx_core::DEFAULT_TOP_K;
use ragx_storage::{global_cache, IndexStore};

/// Ask questions against a local document index
#[derive(Parser, Debug)]
#[command(name = "ragx")]
#[command(about = "Local retrieval-augmented question answering", long_about = None)]
struct Args {
    /// Directory holding vectorizer.bin, index.bin and docs.json
    #[arg(short, long, global = true, env = "RAGX_DB_PATH", default_value = "rag_db")]
    db_path: PathBuf,

    /// Ollama base URL
    #[arg(long, global = true, env = "OLLAMA_HOST", default_value = DEFAULT_OLLAMA_URL)]
    ollama_url: String,

    /// Model used for answer generation
    #[arg(long, global = true, env = "RAGX_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Timeout for one generation request, in seconds
    #[arg(long, global = true, default_value_t = 120)]
    timeout_secs: u64,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the web front end
    Serve {
        /// HTTP port
        #[arg(long, default_value_t = 8501)]
        http_port: u16,
    },
    /// Answer one question and exit
    Ask {
        question: String,
    },
    /// Print the passages retrieved for a query
    Search {
        query: String,

        /// Number of passages to retrieve
        #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting ragx v{}", env!("CARGO_PKG_VERSION"));
    info!("Index directory: {:?}", args.db_path);

    // Fail fast: a broken index directory is fatal before anything is served
    let store = global_cache().get_or_load(&args.db_path)?;

    match args.command {
        Command::Search { query, top_k } => {
            let hits = store.search_scored(&query, top_k)?;
            if hits.is_empty() {
                println!("No passages found.");
            }
            for (rank, hit) in hits.iter().enumerate() {
                println!("{}. [#{} distance {:.4}] {}", rank + 1, hit.position, hit.distance, hit.text);
            }
        }
        Command::Ask { question } => {
            let service = answer_service(&args.ollama_url, &args.model, args.timeout_secs, store)?;
            let answer = service.answer(&question).await;
            println!("{}", answer.answer);
        }
        Command::Serve { http_port } => {
            let service = Arc::new(answer_service(
                &args.ollama_url,
                &args.model,
                args.timeout_secs,
                store,
            )?);
            serve(service, http_port).await;
        }
    }

    Ok(())
}

fn answer_service(
    ollama_url: &str,
    model: &str,
    timeout_secs: u64,
    store: Arc<IndexStore>,
) -> anyhow::Result<AnswerService> {
    let client = OllamaClient::new(ollama_url, Duration::from_secs(timeout_secs))?;
    info!("Generation service: {} (model {})", client.base_url(), model);
    let config = AnswerConfig {
        model: model.to_string(),
        top_k: DEFAULT_TOP_K,
    };
    Ok(AnswerService::new(store, Arc::new(client), config))
}

async fn serve(service: Arc<AnswerService>, http_port: u16) {
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(service, http_port).await {
                error!("HTTP server error: {}", e);
            }
        })
    });

    info!("ragx started successfully");
    info!("Web front end: http://localhost:{}/", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
}
