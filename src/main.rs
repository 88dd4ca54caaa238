use dotenv::dotenv;
use eliza_responder::api::{build_router, AppState};
use eliza_responder::config::Config;
use eliza_responder::file_logger::FileLogger;
use eliza_responder::service::SessionStore;
use eliza_responder::RuleTable;
use std::error::Error as StdError;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        error!("ELIZA stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn StdError>> {
    let config = Config::from_env()?;
    let table = Arc::new(RuleTable::builtin()?);

    let mut sessions = SessionStore::new(table)
        .with_max_sessions(config.max_sessions)
        .with_idle_timeout(config.session_idle);
    if let Some(seed) = config.seed {
        sessions = sessions.with_seed(seed);
    }
    if let Some(path) = &config.transcript_path {
        sessions = sessions.with_transcript(Arc::new(FileLogger::new(path)?));
        info!("Writing transcript to {}", path);
    }

    let app = build_router(AppState {
        sessions: Arc::new(sessions),
        reply_delay: config.reply_delay,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("ELIZA is listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
