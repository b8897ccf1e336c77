use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Use the library instead of redeclaring modules
use manga_ocr_server::{
    config::Config,
    ocr::{CommandOcrEngine, DetectOnlyEngine, OcrEngine},
    ocr_cache::{OcrCacheService, OcrCacheStorage},
    web::WebServer,
};

#[derive(Parser)]
#[command(name = "manga-ocr-server")]
#[command(version = "0.1.0")]
#[command(about = "A caching OCR server for manga pages")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Cache directory (overrides config file)
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<std::path::PathBuf>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = if cli.log_level == "trace" {
        format!("manga_ocr_server={},tower_http=trace", cli.log_level)
    } else {
        format!("manga_ocr_server={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting manga OCR server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration from specified file
    std::env::set_var("CONFIG_FILE", &cli.config);
    let mut config = Config::load()?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(cache_dir) = cli.cache_dir {
        config.storage.cache_path = cache_dir;
    }

    info!("Using cache directory: {}", config.storage.cache_path.display());

    // Select the OCR engine: an external command when configured,
    // otherwise decode-only (dimensions, no text recognition)
    let engine: Box<dyn OcrEngine> = match &config.ocr.command {
        Some(command) => {
            info!("OCR engine: external command '{}'", command);
            Box::new(CommandOcrEngine::new(
                command.clone(),
                config.ocr.command_args.clone(),
            ))
        }
        None => {
            info!("OCR engine: detect-only (no recognition command configured)");
            Box::new(DetectOnlyEngine)
        }
    };

    let storage = OcrCacheStorage::new(config.storage.cache_path.clone());
    let ocr_service = OcrCacheService::new(storage, engine);

    let server = WebServer::new(&config, ocr_service)?;
    info!("Web server listening on {}:{}", server.host(), server.port());
    server.serve().await
}
