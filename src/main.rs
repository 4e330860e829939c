mod batch;
mod config;
mod error;
mod handlers;
mod mask;
mod send_log;
mod smtp;
mod template;
mod types;

use std::sync::Arc;

use anyhow::Context;
use log::{error, info};

use config::Config;
use handlers::AppState;
use send_log::FileSendLog;
use smtp::SmtpMailer;

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown requested");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_timed();

    let config = Config::from_env();
    info!("Send log: {}", config.log_file.display());

    let send_log = Arc::new(
        FileSendLog::open(&config.log_file)
            .with_context(|| format!("opening send log {}", config.log_file.display()))?,
    );

    let state = Arc::new(AppState {
        mailer: Arc::new(SmtpMailer),
        send_log: send_log.clone(),
    });
    let app = handlers::router(state);

    let addr = config.bind_address();
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    send_log.close().context("closing send log")?;
    info!("Server stopped");

    Ok(())
}
