use anyhow::Result;
use helpdesk_api::{build_app_with_config, ApiConfig};
use helpdesk_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("helpdesk_api");

    let config = ApiConfig::from_env();
    let app = build_app_with_config(&config)?;

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!(
        bind = %config.bind,
        kb_root = %config.kb_root.display(),
        "campus helpdesk api started"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
