use std::process::ExitCode;

use sentimeter_core::DashboardConfig;
use sentimeter_web::{create_app, AppState, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("sentimeter_core=info,sentimeter_web=info,tower_http=info")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match serve().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "server stopped");
            ExitCode::FAILURE
        }
    }
}

async fn serve() -> Result<(), Box<dyn std::error::Error>> {
    let config = DashboardConfig::from_env()?;
    let server = ServerConfig::from_env();
    let addr = server.socket_addr()?;

    tracing::info!(
        %addr,
        mock = config.mock,
        model = %config.sentiment_model,
        "starting sentimeter web dashboard"
    );

    let app = create_app(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
