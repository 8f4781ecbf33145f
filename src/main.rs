use tokio::net::TcpListener;
use tracing::info;
use seo_analyzer::{
    AppState,
    api::routes::create_router,
    config::Config,
    telemetry,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    let config = Config::load()?;
    let server_addr = config.server_addr;
    info!(
        %server_addr,
        fetch_timeout_secs = config.fetch.timeout.as_secs(),
        min_word_len = config.analysis.min_word_len,
        "starting server"
    );

    let app_state = AppState::new(config)?;
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    info!("listening on http://{}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
