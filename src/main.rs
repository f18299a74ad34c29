use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod crop;
mod engine;
mod engines;
mod error;
mod format;
mod preprocessing;
mod server;

#[derive(Parser, Debug)]
#[command(name = "croptext-server")]
#[command(about = "Crop-and-OCR backend with HTML output")]
#[command(version)]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "CROPTEXT_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "CROPTEXT_PORT", default_value = "8070")]
    pub port: u16,

    /// Maximum upload size in bytes (default: 20MB)
    #[arg(long, env = "CROPTEXT_MAX_UPLOAD", default_value = "20971520")]
    pub max_upload_size: usize,

    /// Tesseract executable to use (overrides platform discovery)
    #[arg(long, env = "TESSERACT_CMD")]
    pub tesseract_cmd: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from(args);

    tracing::info!("Starting croptext-server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Binding to {}:{}", config.host, config.port);

    server::run(config).await
}
