//! Ensemble HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use ensemble::config::Config;
use ensemble::gateway::{GatewayState, create_router_with_state};
use ensemble::images::FsImageLoader;
use ensemble::pipeline::{PipelineConfig, RecommendationOrchestrator};
use ensemble::similarity::RetrievalParams;
use ensemble::store::JsonlStore;
use ensemble::vision::OpenAiVision;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        catalog = %config.catalog_path.display(),
        "Ensemble starting"
    );

    if config.api_key.is_empty() {
        tracing::warn!(
            "No API key configured (ENSEMBLE_API_KEY / OPENAI_API_KEY); upstream calls will fail"
        );
    }

    let catalog = ensemble::catalog::load_catalog(&config.catalog_path).await?;

    let vision = OpenAiVision::new(
        &config.api_base,
        &config.api_key,
        &config.embed_model,
        &config.vision_model,
        Duration::from_secs(config.request_timeout_secs),
    )?;

    let images = FsImageLoader::new(config.image_root.clone());
    let store = Arc::new(JsonlStore::new(config.store_path.clone()));

    let orchestrator = Arc::new(RecommendationOrchestrator::new(
        catalog,
        vision,
        images,
        PipelineConfig {
            retrieval: RetrievalParams {
                threshold: config.threshold,
                top_k: config.top_k,
            },
            max_retries: config.max_retries,
        },
    ));

    let state = GatewayState::new(orchestrator, store);
    let app = create_router_with_state(state, &config.static_dir);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Ensemble shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("ENSEMBLE_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(_) => return 1,
    };

    rt.block_on(async {
        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        {
            Ok(client) => client,
            Err(_) => return 1,
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_err() {
            tracing::error!("Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(_) => {
                tracing::error!("Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
