use std::sync::Arc;

use anyhow::Context;

use pretotype_survey::config::{API_BASE_URL_ENV, SurveyConfig};
use pretotype_survey::forwarder::Forwarder;
use pretotype_survey::server;
use pretotype_survey::survey::mindfulness_questions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = SurveyConfig::from_env().context("reading configuration")?;
    let addr = config.socket_addr()?;

    let forwarder = Arc::new(Forwarder::new(config.api_base_url.clone()));
    let questions = Arc::new(mindfulness_questions());

    eprintln!("📝 Pretotype Survey v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Submit API: http://{}/api/survey", addr);
    eprintln!("   Questions:  http://{}/api/survey/questions", addr);
    eprintln!("   Session WS: ws://{}/ws/survey", addr);
    match forwarder.upstream_url() {
        Some(url) => eprintln!("   Upstream:   {}\n", url),
        None => {
            eprintln!("   Upstream:   (not configured)\n");
            tracing::warn!("{API_BASE_URL_ENV} not set; every submission will fail");
        }
    }

    let app = server::app(questions, forwarder);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "Survey server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await
        .context("serving HTTP")?;

    Ok(())
}
